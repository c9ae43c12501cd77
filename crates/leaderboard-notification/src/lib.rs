//! # Leaderboard Notification
//!
//! 리더보드 전달 계층 (Telegram Bot API).
//!
//! - 지정 채널로 리더보드 푸시 (`TelegramSender`)
//! - Long polling 기반 봇 명령어 처리 (`TelegramBotHandler`)
//!
//! # 텔레그램 봇 명령어
//!
//! - `/leaderboard` - PnL 순위
//! - `/volume` - 거래량 순위
//! - `/roi` - ROI 순위
//! - `/final` - 대회 종료 최종 결과
//! - `/help` - 도움말

pub mod bot_handler;
pub mod telegram;
pub mod types;

pub use bot_handler::*;
pub use telegram::*;
pub use types::*;
