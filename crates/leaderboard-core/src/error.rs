//! 코어 에러 타입.

use thiserror::Error;

/// 포맷터 입력 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// 축약하기에 너무 짧은 주소
    #[error("주소가 너무 짧습니다 (최소 {min}자, 입력 {len}자): {address}")]
    AddressTooShort {
        address: String,
        len: usize,
        min: usize,
    },
}

/// 포맷 작업용 Result 타입.
pub type FormatResult<T> = Result<T, FormatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_contains_address() {
        let err = FormatError::AddressTooShort {
            address: "0x12".to_string(),
            len: 4,
            min: 10,
        };
        let message = err.to_string();
        assert!(message.contains("0x12"));
        assert!(message.contains("10"));
    }
}
