//! loggen CLI 라이브러리
//!
//! 바이너리(`loggen`)와 통합 테스트가 같은 명령 핸들러를 공유합니다.
//!
//! - [`cli`]: clap derive 인자 정의
//! - [`commands`]: 서브커맨드별 핸들러
//! - [`output`]: text/JSON 출력 추상화
//! - [`logging`]: tracing 구독자 초기화
//! - [`error`]: CLI 에러와 종료 코드

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
