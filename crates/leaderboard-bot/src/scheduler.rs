//! 정기 리더보드 푸시.
//!
//! 고정 주기로 PnL 리더보드를 대상 채팅에 전송합니다. 실패는 로그만 남기고
//! 다음 주기에 다시 시도합니다. 명령어 처리와는 독립적으로 동작합니다.

use std::sync::Arc;
use std::time::Duration;

use leaderboard_core::Metric;
use leaderboard_notification::NotificationSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::{ScheduleConfig, MAX_PUSH_INTERVAL_HOURS};
use crate::context::AppContext;
use crate::Result;

/// PnL 리더보드를 한 번 렌더링해 전송합니다.
pub async fn push_once(ctx: &AppContext, sender: &dyn NotificationSender) -> Result<()> {
    let message = ctx.render(Metric::Pnl, Metric::Pnl.default_label()).await?;
    sender.send(&message).await?;
    info!(sender = sender.name(), "정기 리더보드 전송 완료");
    Ok(())
}

/// 백그라운드 정기 푸시 task 핸들.
///
/// [`ScheduledPush::shutdown`]으로 종료를 요청하고 task 종료를 기다립니다.
pub struct ScheduledPush {
    handle: JoinHandle<()>,
    shutdown: CancellationToken,
}

impl ScheduledPush {
    /// 정기 푸시 task를 시작합니다.
    ///
    /// `parent`가 취소되어도 함께 종료됩니다.
    pub fn start(
        ctx: Arc<AppContext>,
        sender: Arc<dyn NotificationSender>,
        config: &ScheduleConfig,
        parent: &CancellationToken,
    ) -> Self {
        let shutdown = parent.child_token();
        // interval_at은 0 주기에서, Instant 덧셈은 범위 초과 시 panic
        let period = config.interval().clamp(
            Duration::from_secs(1),
            Duration::from_secs(MAX_PUSH_INTERVAL_HOURS * 60 * 60),
        );
        let now = Instant::now();
        let first_tick = if config.push_on_startup {
            now
        } else {
            now.checked_add(period).unwrap_or(now)
        };

        info!(
            interval_hours = config.interval_hours,
            push_on_startup = config.push_on_startup,
            "정기 리더보드 푸시 시작"
        );

        let token = shutdown.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(first_tick, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        info!("정기 리더보드 푸시 종료");
                        break;
                    }
                    _ = ticker.tick() => {
                        // 전송 중에도 종료 요청에 바로 응답
                        tokio::select! {
                            _ = token.cancelled() => {
                                info!("정기 리더보드 푸시 종료 (전송 중단)");
                                break;
                            }
                            result = push_once(&ctx, sender.as_ref()) => {
                                if let Err(e) = result {
                                    error!("정기 리더보드 전송 실패: {}", e);
                                }
                            }
                        }
                    }
                }
            }
        });

        Self { handle, shutdown }
    }

    /// 종료를 요청하고 task가 끝날 때까지 기다립니다.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(e) = self.handle.await {
            error!("정기 푸시 task 비정상 종료: {}", e);
        }
    }
}
