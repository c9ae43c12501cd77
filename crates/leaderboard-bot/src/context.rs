//! 애플리케이션 컨텍스트.
//!
//! 시작 시 한 번 생성되어 봇 명령어 핸들러와 정기 푸시가 `Arc`로 공유합니다.
//! 매 호출마다 조회와 집계를 새로 수행하므로 호출 간 공유 상태가 없습니다.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use leaderboard_core::{aggregate, render_final_results, render_leaderboard, Metric, TraderStatsMap};
use leaderboard_data::{CompetitionWindow, DataError, TradeSource};
use leaderboard_notification::{
    BotCommandHandler, CommandResponse, NotificationError, NotificationResult,
};
use tracing::{info, warn};

/// 조회 → 집계 → 렌더링 파이프라인.
pub struct AppContext {
    source: Arc<dyn TradeSource>,
    window: CompetitionWindow,
}

impl AppContext {
    /// 새 컨텍스트 생성.
    pub fn new(source: Arc<dyn TradeSource>, window: CompetitionWindow) -> Self {
        Self { source, window }
    }

    /// 대회 기간.
    pub fn window(&self) -> &CompetitionWindow {
        &self.window
    }

    /// 거래를 조회하고 계정별 통계로 집계합니다.
    pub async fn load_stats(&self) -> Result<TraderStatsMap, DataError> {
        let start = Instant::now();
        let trades = self.source.fetch_trades(&self.window).await?;
        let stats = aggregate(&trades);

        info!(
            source = self.source.name(),
            trades = trades.len(),
            traders = stats.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "트레이더 통계 로드 완료"
        );

        Ok(stats)
    }

    /// 지표별 리더보드를 렌더링합니다.
    pub async fn render(&self, metric: Metric, label: &str) -> Result<String, DataError> {
        let stats = self.load_stats().await?;
        Ok(render_leaderboard(&stats, metric, label))
    }

    /// 대회 종료 결과를 렌더링합니다.
    pub async fn render_final(&self) -> Result<String, DataError> {
        let stats = self.load_stats().await?;
        Ok(render_final_results(&stats))
    }
}

fn command_failed(err: DataError) -> NotificationError {
    warn!("리더보드 조회 실패: {}", err);
    NotificationError::CommandFailed(err.to_string())
}

#[async_trait]
impl BotCommandHandler for AppContext {
    async fn handle_ranking(
        &self,
        metric: Metric,
        label: &str,
    ) -> NotificationResult<CommandResponse> {
        self.render(metric, label)
            .await
            .map(CommandResponse::html)
            .map_err(command_failed)
    }

    async fn handle_final(&self) -> NotificationResult<CommandResponse> {
        self.render_final()
            .await
            .map(CommandResponse::html)
            .map_err(command_failed)
    }
}
