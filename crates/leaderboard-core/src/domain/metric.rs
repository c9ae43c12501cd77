//! 리더보드 순위 지표.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::stats::TraderStats;
use crate::format::{format_percent, format_usd};

/// 순위 산정 기준 지표.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// 누적 거래량
    Volume,
    /// 누적 손익
    Pnl,
    /// 수익률 (pnl / margin × 100)
    Roi,
}

impl Metric {
    /// 모든 지표.
    pub const ALL: [Metric; 3] = [Metric::Volume, Metric::Pnl, Metric::Roi];

    /// 통계에서 지표 값을 추출합니다.
    pub fn value(self, stats: &TraderStats) -> f64 {
        match self {
            Metric::Volume => stats.volume,
            Metric::Pnl => stats.pnl,
            Metric::Roi => stats.roi(),
        }
    }

    /// 지표 값을 표시용 문자열로 변환합니다.
    pub fn format_value(self, value: f64) -> String {
        match self {
            Metric::Volume | Metric::Pnl => format_usd(value),
            Metric::Roi => format_percent(value),
        }
    }

    /// 리더보드 항목 라인에 붙는 이모지.
    pub fn emoji(self) -> &'static str {
        match self {
            Metric::Volume => "💰",
            Metric::Pnl => "📈",
            Metric::Roi => "⚡",
        }
    }

    /// 리더보드 항목 라인의 값 이름.
    pub fn caption(self) -> &'static str {
        match self {
            Metric::Volume => "Volume",
            Metric::Pnl => "PnL",
            Metric::Roi => "ROI",
        }
    }

    /// 리더보드 제목에 쓰이는 기본 라벨.
    pub fn default_label(self) -> &'static str {
        match self {
            Metric::Volume => "Volume",
            Metric::Pnl => "PnL",
            Metric::Roi => "ROI %",
        }
    }

    /// 소문자 식별자.
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Volume => "volume",
            Metric::Pnl => "pnl",
            Metric::Roi => "roi",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "volume" => Ok(Metric::Volume),
            "pnl" => Ok(Metric::Pnl),
            "roi" => Ok(Metric::Roi),
            _ => Err(format!("Unknown metric: {}", s)),
        }
    }
}
