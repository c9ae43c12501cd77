//! 외부 데이터 소스에서 유입되는 기본 타입.

pub mod trade;

pub use trade::*;
