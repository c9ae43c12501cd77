//! 에러 타입 정의.

use leaderboard_data::DataError;
use leaderboard_notification::NotificationError;
use thiserror::Error;

/// 봇 에러 타입
#[derive(Debug, Error)]
pub enum BotError {
    /// 설정 에러 (시작 시 검증)
    #[error("Configuration error: {0}")]
    Config(String),

    /// 데이터 조회 에러
    #[error("Data source error: {0}")]
    Data(#[from] DataError),

    /// 텔레그램 전송 에러
    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),

    /// 로깅 초기화 에러
    #[error("Logging error: {0}")]
    Logging(String),
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, BotError>;
