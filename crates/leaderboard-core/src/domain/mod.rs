//! 리더보드 도메인 로직.

pub mod leaderboard;
pub mod metric;
pub mod stats;

pub use leaderboard::*;
pub use metric::*;
pub use stats::*;
