//! 텔레그램 봇 명령어 핸들러.
//!
//! 사용자로부터 명령어를 수신하고 처리합니다.
//! - `/leaderboard` - PnL 순위
//! - `/volume` - 거래량 순위
//! - `/roi` - ROI 순위
//! - `/final` - 대회 종료 최종 결과
//!
//! 각 업데이트는 별도 task에서 처리되므로 느린 조회가 다른 명령어 응답을 막지 않습니다.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use leaderboard_core::Metric;
use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::telegram::{TelegramApi, TelegramConfig, TelegramUpdate};
use crate::types::{CommandResponse, NotificationResult};

/// getUpdates long polling 대기 시간 (초)
const POLL_TIMEOUT_SECS: u64 = 30;
/// 폴링 실패 후 재시도 전 대기 시간
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// 봇 명령어 타입.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// PnL 리더보드
    Leaderboard,
    /// 거래량 리더보드
    Volume,
    /// ROI 리더보드
    Roi,
    /// 대회 종료 결과
    Final,
    /// 도움말
    Help,
    /// 알 수 없는 명령어
    Unknown(String),
}

impl BotCommand {
    /// 텍스트에서 명령어 파싱.
    ///
    /// `/`로 시작하지 않는 일반 메시지는 `None`입니다.
    /// 그룹 채팅의 `/leaderboard@MyBot` 형식도 허용합니다.
    pub fn parse(text: &str) -> Option<Self> {
        Self::parse_for(text, None)
    }

    /// 봇 사용자명을 알고 있을 때의 명령어 파싱.
    ///
    /// `@` 뒤의 이름이 `bot_username`과 다르면 다른 봇의 명령어로 보고 `None`을 반환합니다.
    pub fn parse_for(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let text = text.trim();
        let body = text.strip_prefix('/')?;

        let token = body.split_whitespace().next().unwrap_or("");
        let (name, mention) = match token.split_once('@') {
            Some((name, mention)) => (name, Some(mention)),
            None => (token, None),
        };

        if let (Some(mention), Some(me)) = (mention, bot_username) {
            if !mention.eq_ignore_ascii_case(me.trim_start_matches('@')) {
                return None;
            }
        }

        let parsed = match name.to_lowercase().as_str() {
            "leaderboard" => BotCommand::Leaderboard,
            "volume" => BotCommand::Volume,
            "roi" => BotCommand::Roi,
            "final" => BotCommand::Final,
            "help" | "start" => BotCommand::Help,
            _ => BotCommand::Unknown(text.to_string()),
        };
        Some(parsed)
    }

    /// 순위 명령어의 기준 지표.
    pub fn metric(&self) -> Option<Metric> {
        match self {
            BotCommand::Leaderboard => Some(Metric::Pnl),
            BotCommand::Volume => Some(Metric::Volume),
            BotCommand::Roi => Some(Metric::Roi),
            _ => None,
        }
    }
}

/// 봇 명령어 핸들러 trait.
///
/// 각 명령어의 실제 로직(조회, 집계, 렌더링)을 구현합니다.
#[async_trait]
pub trait BotCommandHandler: Send + Sync {
    /// 지표별 리더보드.
    async fn handle_ranking(
        &self,
        metric: Metric,
        label: &str,
    ) -> NotificationResult<CommandResponse>;

    /// 대회 종료 최종 결과.
    async fn handle_final(&self) -> NotificationResult<CommandResponse>;
}

/// 텔레그램 봇 핸들러.
///
/// Long polling으로 업데이트를 수신하고 명령어를 처리합니다.
pub struct TelegramBotHandler<H: BotCommandHandler> {
    api: TelegramApi,
    handler: Arc<H>,
    last_update_id: RwLock<i64>,
    bot_username: RwLock<Option<String>>,
}

impl<H: BotCommandHandler + 'static> TelegramBotHandler<H> {
    /// 새 봇 핸들러 생성.
    pub fn new(config: &TelegramConfig, handler: Arc<H>) -> Self {
        Self {
            api: TelegramApi::new(config),
            handler,
            last_update_id: RwLock::new(0),
            bot_username: RwLock::new(None),
        }
    }

    /// `getMe`로 봇 사용자명을 조회해 저장합니다.
    ///
    /// 이후 다른 봇을 지정한 `/cmd@OtherBot` 명령어는 무시됩니다.
    pub async fn identify(&self) -> NotificationResult<Option<String>> {
        let me = self.api.get_me().await?;
        *self.bot_username.write().await = me.username.clone();
        info!(username = ?me.username, "봇 계정 확인");
        Ok(me.username)
    }

    /// 봇 폴링 시작.
    ///
    /// `shutdown`이 취소될 때까지 업데이트를 수신하고, 종료 전에 처리 중인 응답을 기다립니다.
    pub async fn start_polling(&self, shutdown: CancellationToken) {
        info!("텔레그램 봇 폴링 시작");

        let identified = tokio::select! {
            _ = shutdown.cancelled() => return,
            result = self.identify() => result,
        };
        if let Err(e) = identified {
            warn!("봇 계정 조회 실패, 멘션 검사 없이 진행: {}", e);
        }

        let mut in_flight = JoinSet::new();

        loop {
            let result = tokio::select! {
                _ = shutdown.cancelled() => break,
                result = self.poll_into(&mut in_flight) => result,
            };

            // 끝난 task 정리
            while let Some(joined) = in_flight.try_join_next() {
                if let Err(e) = joined {
                    error!("업데이트 처리 task 비정상 종료: {}", e);
                }
            }

            if let Err(e) = result {
                error!("업데이트 폴링 실패: {}", e);
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = tokio::time::sleep(POLL_ERROR_BACKOFF) => {}
                }
            }
        }

        if !in_flight.is_empty() {
            info!(pending = in_flight.len(), "처리 중인 응답 대기");
        }
        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                error!("업데이트 처리 task 비정상 종료: {}", e);
            }
        }

        info!("텔레그램 봇 폴링 종료");
    }

    /// 업데이트를 한 번 폴링하고 각 업데이트를 별도 task로 처리합니다.
    ///
    /// 생성된 task 집합을 반환합니다.
    pub async fn poll_once(&self) -> NotificationResult<JoinSet<()>> {
        let mut tasks = JoinSet::new();
        self.poll_into(&mut tasks).await?;
        Ok(tasks)
    }

    /// 업데이트를 폴링해 `tasks`에 처리 task를 추가합니다.
    async fn poll_into(&self, tasks: &mut JoinSet<()>) -> NotificationResult<()> {
        let bot_username = self.bot_username.read().await.clone();
        // offset 갱신 이후에는 await 없이 task 생성
        let updates = self.poll_updates().await?;

        for update in updates {
            let api = self.api.clone();
            let handler = Arc::clone(&self.handler);
            let bot_username = bot_username.clone();
            tasks.spawn(async move {
                let update_id = update.update_id;
                if let Err(e) =
                    process_update(&api, handler.as_ref(), update, bot_username.as_deref()).await
                {
                    error!(update_id, "업데이트 처리 실패: {}", e);
                }
            });
        }

        Ok(())
    }

    /// 업데이트 폴링.
    async fn poll_updates(&self) -> NotificationResult<Vec<TelegramUpdate>> {
        let last_id = *self.last_update_id.read().await;
        let updates = self.api.get_updates(last_id + 1, POLL_TIMEOUT_SECS).await?;

        // 마지막 업데이트 ID 갱신
        if let Some(last) = updates.iter().map(|u| u.update_id).max() {
            *self.last_update_id.write().await = last;
        }

        Ok(updates)
    }
}

/// 개별 업데이트 처리.
async fn process_update<H: BotCommandHandler + ?Sized>(
    api: &TelegramApi,
    handler: &H,
    update: TelegramUpdate,
    bot_username: Option<&str>,
) -> NotificationResult<()> {
    let Some(message) = update.message else {
        return Ok(());
    };

    let chat_id = message.chat.id;
    let Some(command) = message
        .text
        .as_deref()
        .and_then(|text| BotCommand::parse_for(text, bot_username))
    else {
        return Ok(());
    };

    debug!(chat_id = chat_id, command = ?command, "명령어 수신");

    let response = execute_command(handler, command).await;
    api.send_message(&chat_id.to_string(), &response.text, &response.parse_mode)
        .await?;

    debug!(chat_id = chat_id, "응답 전송 완료");
    Ok(())
}

/// 명령어 실행.
///
/// 핸들러 실패는 사용자에게 보이는 오류 응답으로 변환합니다.
async fn execute_command<H: BotCommandHandler + ?Sized>(
    handler: &H,
    command: BotCommand,
) -> CommandResponse {
    let result = match &command {
        BotCommand::Final => handler.handle_final().await,
        BotCommand::Help => return help_message(),
        BotCommand::Unknown(text) => return unknown_command(text),
        ranking => match ranking.metric() {
            Some(metric) => handler.handle_ranking(metric, metric.default_label()).await,
            None => return help_message(),
        },
    };

    result.unwrap_or_else(|e| {
        error!(command = ?command, "명령어 처리 실패: {}", e);
        error_message()
    })
}

/// 도움말 메시지 생성.
fn help_message() -> CommandResponse {
    CommandResponse::html(
        "🤖 <b>Trading Competition Bot</b>\n\n\
         <b>Available commands:</b>\n\n\
         /leaderboard - 📈 Top traders by PnL\n\
         /volume - 💰 Top traders by volume\n\
         /roi - ⚡ Top traders by ROI\n\
         /final - 📌 Final competition results\n\
         /help - ❓ Show this message",
    )
}

fn unknown_command(text: &str) -> CommandResponse {
    CommandResponse::html(format!(
        "❓ <b>Unknown command</b>\n\n\
         Input: <code>{}</code>\n\n\
         Use /help to see the available commands.",
        leaderboard_core::escape_html(text)
    ))
}

fn error_message() -> CommandResponse {
    CommandResponse::html(
        "⚠️ <b>Could not load the leaderboard</b>\n\n\
         The data source is unavailable right now. Please try again later.",
    )
}
