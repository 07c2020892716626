//! 시퀀스 검사 에러 타입
//!
//! gap 탐지기 자체에는 에러 경로가 없으며, 추출 패턴 구성 단계에서만
//! [`SequenceError`]가 발생합니다.

use loggen_core::error::LoggenError;

/// 시퀀스 검사 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    /// 추출 패턴 컴파일 실패
    #[error("invalid sequence pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// 입력 패턴
        pattern: String,
        /// 실패 사유
        reason: String,
    },

    /// 캡처 그룹이 정확히 하나가 아님
    #[error("sequence pattern '{pattern}' must have exactly one capture group, found {groups}")]
    GroupCount {
        /// 입력 패턴
        pattern: String,
        /// 발견된 캡처 그룹 수
        groups: usize,
    },
}

impl From<SequenceError> for LoggenError {
    fn from(err: SequenceError) -> Self {
        LoggenError::Sequence(err.to_string())
    }
}
