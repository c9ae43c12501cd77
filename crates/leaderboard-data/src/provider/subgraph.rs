//! GraphQL 서브그래프 클라이언트.
//!
//! 대회 기간의 거래 기록을 한 번의 쿼리로 조회합니다.
//!
//! # 제한 사항
//!
//! 쿼리는 최대 [`TRADES_PAGE_LIMIT`]건만 가져오며 페이지네이션을 하지 않습니다.
//! 기간 내 거래가 이보다 많으면 타임스탬프 순으로 앞쪽 거래만 집계됩니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use leaderboard_data::{CompetitionWindow, SubgraphClient, SubgraphConfig, TradeSource};
//!
//! let client = SubgraphClient::new(SubgraphConfig::new("https://api.example.com/subgraphs/name/perps"))?;
//! let trades = client.fetch_trades(&CompetitionWindow::default()).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use leaderboard_core::TradeRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::TradeSource;
use crate::error::{DataError, Result};
use crate::window::CompetitionWindow;

/// 한 번의 쿼리로 가져오는 최대 거래 수.
pub const TRADES_PAGE_LIMIT: usize = 1000;

/// 대회 기간 거래 조회 쿼리.
pub const TRADES_QUERY: &str = r#"query Trades($from: BigInt!, $to: BigInt!) {
  trades(
    first: 1000
    orderBy: timestamp
    orderDirection: asc
    where: { timestamp_gte: $from, timestamp_lte: $to }
  ) {
    account
    sizeUsd
    pnlUsd
    marginUsd
  }
}"#;

/// 기본 요청 타임아웃 (초)
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 서브그래프 클라이언트 설정.
#[derive(Debug, Clone)]
pub struct SubgraphConfig {
    /// GraphQL 엔드포인트 URL
    pub url: String,
    /// 요청 타임아웃
    pub timeout: Duration,
}

impl SubgraphConfig {
    /// 기본 타임아웃으로 설정을 생성합니다.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// 요청 타임아웃을 설정합니다.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// GraphQL 요청 본문.
#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: TradesVariables,
}

/// `BigInt` 변수는 문자열로 전달합니다.
#[derive(Debug, Serialize)]
struct TradesVariables {
    from: String,
    to: String,
}

/// GraphQL 응답.
#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct TradesData {
    trades: Vec<TradeRecord>,
}

/// 서브그래프 GraphQL 클라이언트.
#[derive(Debug, Clone)]
pub struct SubgraphClient {
    client: reqwest::Client,
    url: String,
}

impl SubgraphClient {
    /// 새 클라이언트를 생성합니다.
    pub fn new(config: SubgraphConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            url: config.url,
        })
    }

    /// 엔드포인트 URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// 응답 본문을 거래 목록으로 해석합니다.
    fn decode_trades(body: &[u8]) -> Result<Vec<TradeRecord>> {
        let response: GraphQlResponse<TradesData> = serde_json::from_slice(body)?;

        if !response.errors.is_empty() {
            let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
            return Err(DataError::GraphQl(messages.join("; ")));
        }

        response
            .data
            .map(|data| data.trades)
            .ok_or_else(|| DataError::MalformedResponse("response has no data".to_string()))
    }
}

#[async_trait]
impl TradeSource for SubgraphClient {
    async fn fetch_trades(&self, window: &CompetitionWindow) -> Result<Vec<TradeRecord>> {
        let from = window.from;
        let to = window.resolve_to();

        let request = GraphQlRequest {
            query: TRADES_QUERY,
            variables: TradesVariables {
                from: from.to_string(),
                to: to.to_string(),
            },
        };

        debug!(url = %self.url, from, to, "Fetching trades from subgraph");

        let response = self.client.post(&self.url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        let trades = Self::decode_trades(&body)?;

        if trades.len() >= TRADES_PAGE_LIMIT {
            warn!(
                limit = TRADES_PAGE_LIMIT,
                from, to, "조회 한도에 도달했습니다. 기간 내 이후 거래는 집계에서 제외됩니다"
            );
        }

        debug!(count = trades.len(), "Subgraph trades fetched");
        Ok(trades)
    }

    fn name(&self) -> &str {
        "subgraph"
    }
}
