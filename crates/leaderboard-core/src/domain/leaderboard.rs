//! 리더보드 순위 산정 및 렌더링.
//!
//! 출력은 텔레그램 HTML 파싱 모드용 문자열입니다.

use std::fmt::Write;

use serde::Serialize;

use super::metric::Metric;
use super::stats::TraderStatsMap;
use crate::format::{escape_html, format_address};

/// 리더보드에 표시하는 최대 순위 수.
pub const LEADERBOARD_SIZE: usize = 10;

/// `/final` 결과 제목.
pub const FINAL_RESULTS_LABEL: &str = "Final PnL Results";

/// 대회 종료 배너.
const FINAL_BANNER: &str = "📌 <b>Competition Ended - Final Top 3</b> 📌";

/// 리더보드 한 줄.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    /// 1부터 시작하는 순위
    pub rank: usize,
    /// 계정 주소 (소문자)
    pub address: String,
    /// 선택한 지표 값
    pub value: f64,
}

impl LeaderboardEntry {
    /// 1~3위 메달.
    pub fn medal(&self) -> Option<&'static str> {
        match self.rank {
            1 => Some("🥇"),
            2 => Some("🥈"),
            3 => Some("🥉"),
            _ => None,
        }
    }
}

/// 상위 [`LEADERBOARD_SIZE`]개 계정의 순위를 계산합니다.
pub fn rank(stats: &TraderStatsMap, metric: Metric) -> Vec<LeaderboardEntry> {
    rank_with_limit(stats, metric, LEADERBOARD_SIZE)
}

/// 지표 내림차순으로 순위를 계산합니다.
///
/// 동점은 주소 오름차순으로 정렬합니다.
pub fn rank_with_limit(
    stats: &TraderStatsMap,
    metric: Metric,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    let mut ranked: Vec<(&String, f64)> = stats
        .iter()
        .map(|(address, trader)| (address, metric.value(trader)))
        .collect();

    ranked.sort_by(|(addr_a, value_a), (addr_b, value_b)| {
        value_b.total_cmp(value_a).then_with(|| addr_a.cmp(addr_b))
    });

    ranked
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(idx, (address, value))| LeaderboardEntry {
            rank: idx + 1,
            address: address.clone(),
            value,
        })
        .collect()
}

/// 지정한 지표로 리더보드 메시지를 렌더링합니다.
///
/// # 인자
/// - `stats`: 계정별 통계
/// - `metric`: 순위 기준 지표
/// - `label`: 제목에 표시할 라벨 (예: "PnL", "ROI %")
pub fn render_leaderboard(stats: &TraderStatsMap, metric: Metric, label: &str) -> String {
    let mut msg = format!("🏆 <b>Top Traders by {}</b>\n\n", escape_html(label));

    let entries = rank(stats, metric);
    if entries.is_empty() {
        msg.push_str("<i>No trades recorded yet.</i>\n");
        return msg;
    }

    for entry in &entries {
        let position = match entry.medal() {
            Some(medal) => format!("{medal} #{}", entry.rank),
            None => format!("#{}", entry.rank),
        };

        // String에 대한 write!는 실패하지 않음
        let _ = write!(
            msg,
            "{position} <code>{}</code>\n   {} {}: {}\n\n",
            escape_html(&format_address(&entry.address)),
            metric.emoji(),
            metric.caption(),
            metric.format_value(entry.value),
        );
    }

    msg
}

/// 대회 종료 배너가 붙은 최종 PnL 리더보드.
pub fn render_final_results(stats: &TraderStatsMap) -> String {
    format!(
        "{FINAL_BANNER}\n\n{}",
        render_leaderboard(stats, Metric::Pnl, FINAL_RESULTS_LABEL)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stats::TraderStats;

    fn stats_of(entries: &[(&str, f64, f64, f64)]) -> TraderStatsMap {
        entries
            .iter()
            .map(|(address, volume, pnl, margin)| {
                (
                    address.to_string(),
                    TraderStats {
                        volume: *volume,
                        pnl: *pnl,
                        margin: *margin,
                        trade_count: 1,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_rank_by_pnl_descending() {
        let stats = stats_of(&[
            ("0xaaaa000000000000000000000000000000000001", 10e30, 1e30, 1e30),
            ("0xbbbb000000000000000000000000000000000002", 5e30, 3e30, 1e30),
            ("0xcccc000000000000000000000000000000000003", 1e30, -2e30, 1e30),
        ]);

        let ranked = rank(&stats, Metric::Pnl);
        let order: Vec<&str> = ranked.iter().map(|e| &e.address[..6]).collect();
        assert_eq!(order, vec!["0xbbbb", "0xaaaa", "0xcccc"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[2].rank, 3);

        let ranked = rank(&stats, Metric::Volume);
        assert_eq!(&ranked[0].address[..6], "0xaaaa");
    }

    #[test]
    fn test_rank_ties_break_by_address() {
        let stats = stats_of(&[
            ("0xcc", 1.0, 5.0, 0.0),
            ("0xaa", 1.0, 5.0, 0.0),
            ("0xbb", 1.0, 5.0, 0.0),
        ]);

        let ranked = rank(&stats, Metric::Pnl);
        let order: Vec<&str> = ranked.iter().map(|e| e.address.as_str()).collect();
        assert_eq!(order, vec!["0xaa", "0xbb", "0xcc"]);
    }

    #[test]
    fn test_rank_roi_zero_margin() {
        let stats = stats_of(&[
            ("0xaa", 1.0, 1e30, 0.0),
            ("0xbb", 1.0, 1.0, 10.0),
        ]);

        let ranked = rank(&stats, Metric::Roi);
        assert_eq!(ranked[0].address, "0xbb");
        assert_eq!(ranked[0].value, 10.0);
        assert_eq!(ranked[1].value, 0.0);
    }

    #[test]
    fn test_rank_limits_to_ten() {
        let owned: Vec<(String, f64)> = (0..15)
            .map(|i| (format!("0x{:040}", i), i as f64))
            .collect();
        let stats: TraderStatsMap = owned
            .iter()
            .map(|(address, volume)| {
                (
                    address.clone(),
                    TraderStats {
                        volume: *volume,
                        ..Default::default()
                    },
                )
            })
            .collect();

        let ranked = rank(&stats, Metric::Volume);
        assert_eq!(ranked.len(), LEADERBOARD_SIZE);
        assert_eq!(ranked[0].value, 14.0);
        assert_eq!(ranked[9].value, 5.0);
    }

    #[test]
    fn test_render_leaderboard_layout() {
        let stats = stats_of(&[
            ("0x1111000000000000000000000000000000000001", 3e30, 3e30, 1e30),
            ("0x2222000000000000000000000000000000000002", 2e30, 2e30, 1e30),
            ("0x3333000000000000000000000000000000000003", 1e30, 1e30, 1e30),
            ("0x4444000000000000000000000000000000000004", 5e29, 5e29, 1e30),
        ]);

        let msg = render_leaderboard(&stats, Metric::Pnl, "PnL");
        assert!(msg.starts_with("🏆 <b>Top Traders by PnL</b>\n\n"));
        assert!(msg.contains("🥇 #1 <code>0x1111...0001</code>\n   📈 PnL: $3.00\n\n"));
        assert!(msg.contains("🥈 #2 <code>0x2222...0002</code>"));
        assert!(msg.contains("🥉 #3 <code>0x3333...0003</code>"));
        assert!(msg.contains("\n#4 <code>0x4444...0004</code>\n   📈 PnL: $0.50\n\n"));
    }

    #[test]
    fn test_render_roi_uses_percent() {
        let stats = stats_of(&[("0x1111000000000000000000000000000000000001", 1e30, 1e30, 4e30)]);
        let msg = render_leaderboard(&stats, Metric::Roi, "ROI %");
        assert!(msg.contains("Top Traders by ROI %"));
        assert!(msg.contains("⚡ ROI: 25.00%"));
    }

    #[test]
    fn test_render_empty_leaderboard() {
        let msg = render_leaderboard(&TraderStatsMap::new(), Metric::Volume, "Volume");
        assert!(msg.contains("Top Traders by Volume"));
        assert!(msg.contains("No trades recorded yet"));
        assert!(!msg.contains('#'));
    }

    #[test]
    fn test_render_final_results() {
        let stats = stats_of(&[("0x1111000000000000000000000000000000000001", 1e30, 2e30, 1e30)]);
        let msg = render_final_results(&stats);
        assert!(msg.starts_with("📌 <b>Competition Ended - Final Top 3</b> 📌\n\n"));
        assert!(msg.contains("Top Traders by Final PnL Results"));
        assert!(msg.contains("📈 PnL: $2.00"));
    }
}
