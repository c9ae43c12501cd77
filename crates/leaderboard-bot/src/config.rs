//! 환경변수 기반 설정 모듈.
//!
//! 필수 값은 시작 시점에 검증하며, 누락되면 [`BotError::Config`]를 반환합니다.

use std::time::Duration;

use leaderboard_data::{CompetitionWindow, SubgraphConfig};
use leaderboard_notification::{TelegramConfig, DEFAULT_TELEGRAM_API_URL};
use secrecy::{ExposeSecret, SecretString};

use crate::error::BotError;
use crate::Result;

/// 기본 푸시 주기 (시간)
const DEFAULT_PUSH_INTERVAL_HOURS: u64 = 6;
/// 최대 푸시 주기 (1년)
pub const MAX_PUSH_INTERVAL_HOURS: u64 = 24 * 365;
/// 기본 서브그래프 요청 타임아웃 (초)
const DEFAULT_SUBGRAPH_TIMEOUT_SECS: u64 = 30;

/// 봇 전체 설정
#[derive(Debug)]
pub struct BotConfig {
    /// GraphQL 서브그래프 URL
    pub subgraph_url: String,
    /// 서브그래프 요청 타임아웃 (초)
    pub subgraph_timeout_secs: u64,
    /// 대회 기간
    pub window: CompetitionWindow,
    /// 텔레그램 봇 토큰
    pub bot_token: Option<SecretString>,
    /// 정기 리더보드를 보낼 채팅 ID
    pub chat_id: Option<String>,
    /// Bot API 주소
    pub telegram_api_url: String,
    /// 정기 푸시 설정
    pub schedule: ScheduleConfig,
}

/// 정기 푸시 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// 푸시 주기 (시간 단위)
    pub interval_hours: u64,
    /// 시작 직후 한 번 푸시할지 여부
    pub push_on_startup: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_hours: DEFAULT_PUSH_INTERVAL_HOURS,
            push_on_startup: false,
        }
    }
}

impl ScheduleConfig {
    /// 푸시 주기를 Duration으로 반환
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_hours.saturating_mul(60 * 60))
    }
}

impl BotConfig {
    /// `.env`와 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 키 조회 함수로 설정 로드.
    ///
    /// 빈 문자열은 설정되지 않은 것으로 취급합니다.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let subgraph_url = get("SUBGRAPH_URL").ok_or_else(|| {
            BotError::Config("SUBGRAPH_URL 환경변수가 설정되지 않았습니다".to_string())
        })?;

        let from = parse_optional::<i64>("COMP_START", get("COMP_START"))?.unwrap_or(0);
        let to = parse_optional::<i64>("COMP_END", get("COMP_END"))?;
        let window = CompetitionWindow::new(from, to)
            .map_err(|e| BotError::Config(format!("COMP_START/COMP_END: {}", e)))?;

        let interval_hours = parse_optional::<u64>("PUSH_INTERVAL_HOURS", get("PUSH_INTERVAL_HOURS"))?
            .unwrap_or(DEFAULT_PUSH_INTERVAL_HOURS);
        if !(1..=MAX_PUSH_INTERVAL_HOURS).contains(&interval_hours) {
            return Err(BotError::Config(format!(
                "PUSH_INTERVAL_HOURS는 1 이상 {} 이하여야 합니다: {}",
                MAX_PUSH_INTERVAL_HOURS, interval_hours
            )));
        }

        let subgraph_timeout_secs =
            parse_optional::<u64>("SUBGRAPH_TIMEOUT_SECS", get("SUBGRAPH_TIMEOUT_SECS"))?
                .unwrap_or(DEFAULT_SUBGRAPH_TIMEOUT_SECS);
        if subgraph_timeout_secs == 0 {
            return Err(BotError::Config(
                "SUBGRAPH_TIMEOUT_SECS는 1 이상이어야 합니다".to_string(),
            ));
        }

        Ok(Self {
            subgraph_url,
            subgraph_timeout_secs,
            window,
            bot_token: get("BOT_TOKEN").map(|token| SecretString::new(token.into_boxed_str())),
            chat_id: get("CHAT_ID"),
            telegram_api_url: get("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            schedule: ScheduleConfig {
                interval_hours,
                push_on_startup: get("PUSH_ON_STARTUP")
                    .map(|v| v == "true" || v == "1")
                    .unwrap_or(false),
            },
        })
    }

    /// 서브그래프 클라이언트 설정
    pub fn subgraph_config(&self) -> SubgraphConfig {
        SubgraphConfig::new(self.subgraph_url.clone())
            .with_timeout(Duration::from_secs(self.subgraph_timeout_secs))
    }

    /// 텔레그램 설정을 검증하고 반환합니다.
    ///
    /// 봇 실행과 푸시에는 `BOT_TOKEN`과 `CHAT_ID`가 모두 필요합니다.
    pub fn require_telegram(&self) -> Result<TelegramConfig> {
        let token = self.bot_token.as_ref().ok_or_else(|| {
            BotError::Config("BOT_TOKEN 환경변수가 설정되지 않았습니다".to_string())
        })?;
        let chat_id = self.chat_id.as_ref().ok_or_else(|| {
            BotError::Config("CHAT_ID 환경변수가 설정되지 않았습니다".to_string())
        })?;

        Ok(TelegramConfig::new(token.expose_secret(), chat_id.clone())
            .with_api_url(self.telegram_api_url.clone()))
    }
}

/// 선택 값을 파싱합니다. 값이 있는데 형식이 틀리면 설정 에러.
fn parse_optional<T: std::str::FromStr>(key: &str, value: Option<String>) -> Result<Option<T>> {
    value
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| BotError::Config(format!("{} 값이 올바르지 않습니다: {}", key, v)))
        })
        .transpose()
}
