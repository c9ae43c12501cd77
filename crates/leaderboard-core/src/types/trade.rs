//! 서브그래프 거래 기록.

use serde::{Deserialize, Deserializer, Serialize};

/// 서브그래프에서 조회한 개별 거래(체결) 기록.
///
/// 금액 필드는 30자리 고정소수점(10^30 스케일) 값을 문자열 그대로 보관합니다.
/// 파싱은 집계 단계에서 수행합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    /// 트레이더 계정 주소 (대소문자 혼재 가능)
    pub account: String,
    /// 포지션 크기 (USD, 10^30 스케일)
    #[serde(deserialize_with = "deserialize_decimal")]
    pub size_usd: String,
    /// 실현 손익 (USD, 10^30 스케일)
    #[serde(deserialize_with = "deserialize_decimal")]
    pub pnl_usd: String,
    /// 증거금 (USD, 10^30 스케일). 없을 수 있음
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub margin_usd: Option<String>,
}

impl TradeRecord {
    /// 새 거래 기록을 생성합니다.
    pub fn new(
        account: impl Into<String>,
        size_usd: impl Into<String>,
        pnl_usd: impl Into<String>,
        margin_usd: Option<String>,
    ) -> Self {
        Self {
            account: account.into(),
            size_usd: size_usd.into(),
            pnl_usd: pnl_usd.into(),
            margin_usd,
        }
    }

    /// 소문자로 정규화된 계정 주소.
    pub fn normalized_account(&self) -> String {
        self.account.trim().to_lowercase()
    }

    /// 포지션 크기를 숫자로 파싱합니다.
    pub fn size(&self) -> Option<f64> {
        parse_decimal(&self.size_usd)
    }

    /// 손익을 숫자로 파싱합니다.
    pub fn pnl(&self) -> Option<f64> {
        parse_decimal(&self.pnl_usd)
    }

    /// 증거금을 숫자로 파싱합니다. 값이 없거나 숫자가 아니면 0.
    pub fn margin(&self) -> f64 {
        self.margin_usd
            .as_deref()
            .and_then(parse_decimal)
            .unwrap_or(0.0)
    }
}

/// 십진 문자열을 유한한 `f64`로 파싱합니다.
///
/// 지수 표기(`5e30`)와 정수 문자열을 모두 허용합니다.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// 서브그래프는 BigInt/BigDecimal을 문자열로 내려주지만 숫자도 허용합니다.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDecimal {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawDecimal> for String {
    fn from(raw: RawDecimal) -> Self {
        match raw {
            RawDecimal::Text(text) => text,
            RawDecimal::Number(number) => number.to_string(),
        }
    }
}

fn deserialize_decimal<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawDecimal::deserialize(deserializer).map(String::from)
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawDecimal>::deserialize(deserializer).map(|raw| raw.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_subgraph_trade() {
        let json = r#"{
            "account": "0xAbC0000000000000000000000000000000001111",
            "sizeUsd": "5000000000000000000000000000000",
            "pnlUsd": "-1000000000000000000000000000000",
            "marginUsd": "2000000000000000000000000000000"
        }"#;

        let trade: TradeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(trade.size(), Some(5e30));
        assert_eq!(trade.pnl(), Some(-1e30));
        assert_eq!(trade.margin(), 2e30);
        assert_eq!(
            trade.normalized_account(),
            "0xabc0000000000000000000000000000000001111"
        );
    }

    #[test]
    fn test_deserialize_missing_and_null_margin() {
        let missing = r#"{"account": "0x1", "sizeUsd": "10", "pnlUsd": "1"}"#;
        let trade: TradeRecord = serde_json::from_str(missing).unwrap();
        assert_eq!(trade.margin_usd, None);
        assert_eq!(trade.margin(), 0.0);

        let null = r#"{"account": "0x1", "sizeUsd": "10", "pnlUsd": "1", "marginUsd": null}"#;
        let trade: TradeRecord = serde_json::from_str(null).unwrap();
        assert_eq!(trade.margin_usd, None);
    }

    #[test]
    fn test_deserialize_numeric_fields() {
        let json = r#"{"account": "0x1", "sizeUsd": 1500, "pnlUsd": -20.5, "marginUsd": 300}"#;
        let trade: TradeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(trade.size(), Some(1500.0));
        assert_eq!(trade.pnl(), Some(-20.5));
        assert_eq!(trade.margin(), 300.0);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("5e30"), Some(5e30));
        assert_eq!(parse_decimal(" 42 "), Some(42.0));
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal("inf"), None);
    }

    #[test]
    fn test_non_numeric_margin_is_zero() {
        let trade = TradeRecord::new("0x1", "1", "1", Some("n/a".to_string()));
        assert_eq!(trade.margin(), 0.0);
    }
}
