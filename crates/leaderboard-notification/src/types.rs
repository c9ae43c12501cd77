//! 알림 타입 및 trait 정의.

use async_trait::async_trait;

/// 텔레그램 HTML 파싱 모드.
pub const PARSE_MODE_HTML: &str = "HTML";

/// 알림 작업용 Result 타입.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// 알림 에러.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("알림 전송 실패: {0}")]
    SendFailed(String),

    #[error("잘못된 설정: {0}")]
    InvalidConfig(String),

    #[error("요청 한도 초과: {0}초 후 재시도")]
    RateLimited(u64),

    #[error("명령어 처리 실패: {0}")]
    CommandFailed(String),

    #[error("네트워크 에러: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("직렬화 에러: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// 명령어 응답 데이터.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    /// 응답 텍스트
    pub text: String,
    /// 파싱 모드
    pub parse_mode: String,
}

impl CommandResponse {
    /// HTML 형식 응답 생성.
    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: PARSE_MODE_HTML.to_string(),
        }
    }
}

/// 알림 전송기 trait.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// HTML 메시지를 전송합니다.
    async fn send(&self, text: &str) -> NotificationResult<()>;

    /// 전송기가 활성화되어 있는지 확인합니다.
    fn is_enabled(&self) -> bool;

    /// 전송기 이름을 반환합니다.
    fn name(&self) -> &str;
}
