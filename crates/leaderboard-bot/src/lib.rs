//! Trading competition leaderboard bot.
//!
//! 서브그래프에서 대회 기간 거래를 조회해 리더보드를 만들고 텔레그램으로 전달합니다:
//! - 봇 명령어 응답 (`/leaderboard`, `/volume`, `/roi`, `/final`)
//! - 주기적 PnL 리더보드 푸시

pub mod config;
pub mod context;
pub mod error;
pub mod scheduler;

pub use config::{BotConfig, ScheduleConfig, MAX_PUSH_INTERVAL_HOURS};
pub use context::AppContext;
pub use error::{BotError, Result};
pub use scheduler::{push_once, ScheduledPush};
