#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`scanner`]: 중첩 `{...}` 구간의 끝을 찾는 괄호 깊이 스캐너
//! - [`generator`]: 태그 키워드별 생성기 디스패치 테이블
//! - [`engine`]: 번역 맵 적용 후 고정점까지 생성기를 반복 실행하는 드라이버
//! - [`state`]: 카운터, 메모리, 파일 라인 캐시 (호출 간 공유 상태)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! template -> translations -> [repeat, oneOf, prob, ms, date, ... , oneFromFile]* -> line
//!                                 |                                      |
//!                            scanner::scan                      GenerationContext
//! ```

pub mod engine;
pub mod error;
pub mod generator;
pub mod scanner;
pub mod state;

// --- 주요 타입 re-export ---

// 엔진
pub use engine::{
    EngineConfig, TemplateEngine, Translations, apply_translations, substitute, substitute_with,
};

// 생성기
pub use generator::{GeneratorKind, REGISTRY};

// 상태
pub use state::GenerationContext;

// 에러
pub use error::TemplateError;
