//! 거래 기록 소스.

pub mod subgraph;

use async_trait::async_trait;
use leaderboard_core::TradeRecord;

use crate::error::Result;
use crate::window::CompetitionWindow;

pub use subgraph::{SubgraphClient, SubgraphConfig, TRADES_PAGE_LIMIT, TRADES_QUERY};

/// 대회 기간의 거래 기록을 제공하는 소스.
#[async_trait]
pub trait TradeSource: Send + Sync {
    /// 기간 내 거래 기록을 조회합니다.
    ///
    /// 실패 시 재시도 없이 오류를 반환합니다.
    async fn fetch_trades(&self, window: &CompetitionWindow) -> Result<Vec<TradeRecord>>;

    /// 소스 이름 (로그용).
    fn name(&self) -> &str;
}
