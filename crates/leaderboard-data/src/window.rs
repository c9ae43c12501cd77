//! 대회 기간.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};

/// 거래를 집계할 대회 기간 `[from, to]` (epoch 초, 양끝 포함).
///
/// `to`가 없으면 조회 시점의 현재 시각을 사용합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitionWindow {
    /// 시작 시각
    pub from: i64,
    /// 종료 시각 (None = 현재)
    pub to: Option<i64>,
}

impl Default for CompetitionWindow {
    fn default() -> Self {
        Self { from: 0, to: None }
    }
}

impl CompetitionWindow {
    /// 기간을 생성합니다. `from > to`이면 오류.
    pub fn new(from: i64, to: Option<i64>) -> Result<Self> {
        if let Some(to) = to {
            if from > to {
                return Err(DataError::InvalidWindow { from, to });
            }
        }
        Ok(Self { from, to })
    }

    /// 종료 시각을 확정합니다.
    pub fn resolve_to(&self) -> i64 {
        self.to.unwrap_or_else(|| Utc::now().timestamp())
    }
}
