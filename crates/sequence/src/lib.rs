#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`detector`]: 누락 번호 구간을 추적하는 상태 기계
//! - [`filter`]: 라인에서 순번을 추출해 탐지기에 전달하는 통과형 필터
//! - [`error`]: 도메인 에러 타입

pub mod detector;
pub mod error;
pub mod filter;

// --- 주요 타입 re-export ---

// 탐지기
pub use detector::{Gap, GapDetector, Observation};

// 필터
pub use filter::{GapFilter, GapReporter, GapSummary, TracingReporter};

// 에러
pub use error::SequenceError;
