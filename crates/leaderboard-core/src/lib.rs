//! # Leaderboard Core
//!
//! 트레이딩 대회 리더보드 봇의 핵심 도메인 모델 및 로직을 제공합니다.
//!
//! 이 크레이트는 봇 전반에서 사용되는 기본 타입과 순수 함수를 제공합니다:
//! - 서브그래프 거래 기록 타입
//! - 계정별 통계 집계
//! - 지표(Volume, PnL, ROI) 기반 순위 산정 및 리더보드 렌더링
//! - 주소/금액 포맷터
//! - 로깅 인프라

pub mod domain;
pub mod error;
pub mod format;
pub mod logging;
pub mod types;

pub use domain::*;
pub use error::*;
pub use format::*;
pub use logging::*;
pub use types::*;
