//! 템플릿 엔진 에러 타입
//!
//! [`TemplateError`]는 치환 호출 전체에 치명적입니다. 부분 결과는 반환되지 않습니다.
//! `From<TemplateError> for LoggenError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use loggen_core::error::LoggenError;

/// 템플릿 치환 에러
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// 태그 문법 위반 (구분자 누락, 숫자가 아닌 필드, 잘못된 문자 클래스, 괄호 불일치 등)
    #[error("malformed tag '{tag}': {detail}")]
    MalformedTag {
        /// 문제가 된 태그 원문 (또는 `template`)
        tag: String,
        /// 실패 사유
        detail: String,
    },

    /// `{oneFromFile:...}`가 가리키는 파일이 없음
    #[error("file not found: {path}")]
    FileNotFound {
        /// 요청한 파일 경로
        path: String,
    },

    /// 내장 인자 문법 정규식 컴파일 실패
    #[error("invalid tag grammar: {reason}")]
    Grammar {
        /// 정규식 컴파일 에러
        reason: String,
    },

    /// 파일 읽기 실패
    #[error("io error reading '{path}': {source}")]
    Io {
        /// 요청한 파일 경로
        path: String,
        /// 원인 에러
        #[source]
        source: std::io::Error,
    },
}

impl TemplateError {
    /// `MalformedTag` 에러를 생성합니다.
    pub fn malformed(tag: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MalformedTag {
            tag: tag.into(),
            detail: detail.into(),
        }
    }

    /// 메트릭 레이블용 에러 종류 이름
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedTag { .. } => "malformed_tag",
            Self::FileNotFound { .. } => "file_not_found",
            Self::Grammar { .. } => "grammar",
            Self::Io { .. } => "io",
        }
    }
}

impl From<TemplateError> for LoggenError {
    fn from(err: TemplateError) -> Self {
        LoggenError::Template(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_tag_display() {
        let err = TemplateError::malformed("{date:}", "empty pattern");
        let msg = err.to_string();
        assert!(msg.contains("{date:}"));
        assert!(msg.contains("empty pattern"));
    }

    #[test]
    fn converts_to_loggen_error() {
        let err = TemplateError::FileNotFound {
            path: "/tmp/missing.txt".to_owned(),
        };
        let loggen_err: LoggenError = err.into();
        assert!(matches!(loggen_err, LoggenError::Template(_)));
        assert!(loggen_err.to_string().contains("missing.txt"));
    }
}
