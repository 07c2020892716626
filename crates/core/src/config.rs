//! loggen.toml 로딩 -- 파일, 환경변수 오버라이드, 검증
//!
//! [`LoggenConfig`]는 모든 구성 요소의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOGGEN_GENERATOR_COUNT=1000` 형식)
//! 3. 설정 파일 (`loggen.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), loggen_core::error::LoggenError> {
//! use loggen_core::config::LoggenConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LoggenConfig::load("loggen.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LoggenConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, LoggenError};

/// 기본 템플릿: syslog 형태의 한 줄에 순번 카운터를 포함합니다.
pub const DEFAULT_TEMPLATE: &str = "<{pri:}>{date:%b %e %H:%M:%S} {oneOf:web-01,web-02,db-01} \
app[{random:1000-10000}]: seq={counter:seq:1} user={string:a-z/8} src={ipv4:10.0.0.0/16}";

/// 기본 시퀀스 추출 패턴 (그룹 1이 순번)
pub const DEFAULT_GAP_PATTERN: &str = r"seq=(\d+)";

/// loggen 통합 설정
///
/// `loggen.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggenConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 템플릿 생성기 설정
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// 시퀀스 gap 검사 설정
    #[serde(default)]
    pub gap: GapConfig,
}

impl LoggenConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LoggenError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LoggenError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LoggenError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LoggenError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LoggenError> {
        toml::from_str(toml_str).map_err(|e| {
            LoggenError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGGEN_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "LOGGEN_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGGEN_GENERAL_LOG_FORMAT");

        // Generator
        override_string(&mut self.generator.template, "LOGGEN_GENERATOR_TEMPLATE");
        override_string(
            &mut self.generator.template_file,
            "LOGGEN_GENERATOR_TEMPLATE_FILE",
        );
        override_u64(&mut self.generator.count, "LOGGEN_GENERATOR_COUNT");
        override_u64(
            &mut self.generator.rate_per_sec,
            "LOGGEN_GENERATOR_RATE_PER_SEC",
        );
        override_usize(&mut self.generator.max_passes, "LOGGEN_GENERATOR_MAX_PASSES");
        override_usize(&mut self.generator.max_depth, "LOGGEN_GENERATOR_MAX_DEPTH");

        // Gap
        override_bool(&mut self.gap.enabled, "LOGGEN_GAP_ENABLED");
        override_string(&mut self.gap.pattern, "LOGGEN_GAP_PATTERN");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LoggenError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.generator.template.is_empty() && self.generator.template_file.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "generator.template".to_owned(),
                reason: "either template or template_file must be set".to_owned(),
            }
            .into());
        }

        if self.generator.max_passes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "generator.max_passes".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.generator.max_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "generator.max_depth".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.gap.enabled && self.gap.pattern.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "gap.pattern".to_owned(),
                reason: "pattern must not be empty when gap checking is enabled".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 템플릿 생성기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// 인라인 템플릿 (template_file이 지정되면 무시)
    pub template: String,
    /// 템플릿 파일 경로 (비어 있으면 사용하지 않음)
    pub template_file: String,
    /// 생성할 라인 수 (0 = 무제한)
    pub count: u64,
    /// 초당 생성 라인 수 (0 = 제한 없음)
    pub rate_per_sec: u64,
    /// 고정점 루프 최대 패스 수
    pub max_passes: usize,
    /// 재귀 평가 최대 깊이
    pub max_depth: usize,
    /// `{key}` 형태의 단순 치환 맵
    pub translations: BTreeMap<String, String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_owned(),
            template_file: String::new(),
            count: 10,
            rate_per_sec: 0,
            max_passes: 10_000,
            max_depth: 64,
            translations: BTreeMap::new(),
        }
    }
}

impl GeneratorConfig {
    /// 실제로 사용할 템플릿 본문을 반환합니다.
    ///
    /// `template_file`이 지정되어 있으면 파일 내용을(끝의 개행 제거),
    /// 아니면 인라인 `template`을 반환합니다.
    pub async fn resolve_template(&self) -> Result<String, LoggenError> {
        if self.template_file.is_empty() {
            return Ok(self.template.clone());
        }

        let content = tokio::fs::read_to_string(&self.template_file)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    LoggenError::Config(ConfigError::FileNotFound {
                        path: self.template_file.clone(),
                    })
                } else {
                    LoggenError::Io(e)
                }
            })?;
        Ok(content.trim_end_matches(['\r', '\n']).to_owned())
    }
}

/// 시퀀스 gap 검사 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GapConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 순번 추출 정규식 (캡처 그룹 정확히 1개)
    pub pattern: String,
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            pattern: DEFAULT_GAP_PATTERN.to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
