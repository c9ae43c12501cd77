//! 계정별 거래 통계 집계.
//!
//! 한 번의 조회 구간에서 가져온 거래 기록을 계정 단위로 누적합니다.
//! 집계는 순수 fold이며 호출 간에 유지되는 상태가 없습니다.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::TradeRecord;

/// 계정 주소(소문자) → 누적 통계.
///
/// `BTreeMap`을 사용해 순회 순서를 주소 오름차순으로 고정합니다.
pub type TraderStatsMap = BTreeMap<String, TraderStats>;

/// 계정별 누적 통계.
///
/// 모든 금액은 서브그래프의 10^30 스케일 그대로 누적합니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TraderStats {
    /// 누적 거래량 (Σ sizeUsd)
    pub volume: f64,
    /// 누적 손익 (Σ pnlUsd)
    pub pnl: f64,
    /// 누적 증거금 (Σ marginUsd)
    pub margin: f64,
    /// 집계된 거래 수
    pub trade_count: usize,
}

impl TraderStats {
    /// 거래 한 건을 누적합니다.
    ///
    /// 숫자로 파싱할 수 없는 크기/손익은 0으로 취급합니다.
    pub fn record(&mut self, trade: &TradeRecord) {
        let size = trade.size().unwrap_or_else(|| {
            warn!(account = %trade.account, size_usd = %trade.size_usd, "sizeUsd 파싱 실패, 0으로 처리");
            0.0
        });
        let pnl = trade.pnl().unwrap_or_else(|| {
            warn!(account = %trade.account, pnl_usd = %trade.pnl_usd, "pnlUsd 파싱 실패, 0으로 처리");
            0.0
        });

        self.volume += size;
        self.pnl += pnl;
        self.margin += trade.margin();
        self.trade_count += 1;
    }

    /// ROI (%) = pnl / margin × 100.
    ///
    /// 증거금이 0 이하이면 손익과 무관하게 0을 반환합니다.
    pub fn roi(&self) -> f64 {
        if self.margin > 0.0 {
            self.pnl / self.margin * 100.0
        } else {
            0.0
        }
    }
}

/// 거래 기록을 계정별 통계로 집계합니다.
///
/// 대소문자만 다른 주소는 같은 계정입니다. 거래가 없는 계정은 결과에 나타나지 않습니다.
pub fn aggregate<'a, I>(trades: I) -> TraderStatsMap
where
    I: IntoIterator<Item = &'a TradeRecord>,
{
    let mut stats = TraderStatsMap::new();
    let mut total = 0usize;

    for trade in trades {
        stats
            .entry(trade.normalized_account())
            .or_default()
            .record(trade);
        total += 1;
    }

    debug!(trades = total, traders = stats.len(), "거래 통계 집계 완료");
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::USD_SCALE;

    fn trade(account: &str, size: &str, pnl: &str, margin: Option<&str>) -> TradeRecord {
        TradeRecord::new(account, size, pnl, margin.map(str::to_string))
    }

    #[test]
    fn test_aggregate_merges_case_insensitive_accounts() {
        let trades = vec![
            trade("0xAAA0000000000000000000000000000000001111", "5e30", "1e30", Some("2e30")),
            trade("0xaaa0000000000000000000000000000000001111", "3e30", "-1e30", Some("1e30")),
        ];

        let stats = aggregate(&trades);
        assert_eq!(stats.len(), 1);

        let entry = stats["0xaaa0000000000000000000000000000000001111"];
        assert!((entry.volume / USD_SCALE - 8.0).abs() < 1e-9);
        assert!((entry.pnl / USD_SCALE).abs() < 1e-9);
        assert!((entry.margin / USD_SCALE - 3.0).abs() < 1e-9);
        assert_eq!(entry.trade_count, 2);
        assert!(entry.roi().abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_empty_input() {
        let trades: Vec<TradeRecord> = Vec::new();
        assert!(aggregate(&trades).is_empty());
    }

    #[test]
    fn test_missing_margin_defaults_to_zero() {
        let trades = vec![
            trade("0xB", "100", "10", None),
            trade("0xb", "50", "5", Some("garbage")),
        ];

        let stats = aggregate(&trades);
        let entry = stats["0xb"];
        assert_eq!(entry.volume, 150.0);
        assert_eq!(entry.pnl, 15.0);
        assert_eq!(entry.margin, 0.0);
    }

    #[test]
    fn test_unparseable_size_counts_as_zero() {
        let trades = vec![trade("0xc", "oops", "7", Some("1"))];
        let stats = aggregate(&trades);
        assert_eq!(stats["0xc"].volume, 0.0);
        assert_eq!(stats["0xc"].pnl, 7.0);
        assert_eq!(stats["0xc"].trade_count, 1);
    }

    #[test]
    fn test_roi() {
        let stats = TraderStats {
            volume: 0.0,
            pnl: 50.0,
            margin: 200.0,
            trade_count: 1,
        };
        assert_eq!(stats.roi(), 25.0);

        let no_margin = TraderStats {
            pnl: 1e30,
            ..Default::default()
        };
        assert_eq!(no_margin.roi(), 0.0);
    }
}
