//! 데이터 조회 오류 타입.

use thiserror::Error;

/// 거래 데이터 조회 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 전송 계층 오류 (연결 실패, 타임아웃 등)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// 2xx가 아닌 HTTP 응답
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// GraphQL `errors` 응답
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// 해석할 수 없는 응답 본문
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// 잘못된 조회 구간
    #[error("Invalid window: from {from} is after to {to}")]
    InvalidWindow { from: i64, to: i64 },
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::MalformedResponse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
