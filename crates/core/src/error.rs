//! 에러 타입 -- 설정, 템플릿, 시퀀스 에러를 하나로 묶는 최상위 에러

/// loggen 최상위 에러 타입
///
/// 각 도메인 크레이트의 에러(`TemplateError`, `SequenceError`)는
/// `From` 구현을 통해 이 타입으로 변환되어 바이너리까지 전파됩니다.
#[derive(Debug, thiserror::Error)]
pub enum LoggenError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 템플릿 치환 에러
    #[error("template error: {0}")]
    Template(String),

    /// 시퀀스 검사 에러
    #[error("sequence error: {0}")]
    Sequence(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_to_loggen_error() {
        let err: LoggenError = ConfigError::ParseFailed {
            reason: "bad toml".to_owned(),
        }
        .into();
        assert!(matches!(err, LoggenError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn invalid_value_display_names_field() {
        let err = ConfigError::InvalidValue {
            field: "generator.count".to_owned(),
            reason: "must be greater than 0".to_owned(),
        };
        assert!(err.to_string().contains("generator.count"));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: LoggenError = io.into();
        assert!(matches!(err, LoggenError::Io(_)));
    }
}
