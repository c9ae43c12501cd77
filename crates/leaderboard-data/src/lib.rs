//! 대회 거래 데이터 조회.
//!
//! 이 crate는 다음을 제공합니다:
//! - 대회 기간(`CompetitionWindow`) 정의
//! - 거래 기록 소스 trait (`TradeSource`)
//! - GraphQL 서브그래프 클라이언트 (`SubgraphClient`)

pub mod error;
pub mod provider;
pub mod window;

pub use error::{DataError, Result};
pub use provider::{SubgraphClient, SubgraphConfig, TradeSource, TRADES_PAGE_LIMIT, TRADES_QUERY};
pub use window::CompetitionWindow;
