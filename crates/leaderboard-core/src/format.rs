//! 주소 및 금액 표시 포맷터.

use crate::error::{FormatError, FormatResult};

/// 서브그래프 금액 필드의 고정소수점 스케일 (10^30).
pub const USD_SCALE: f64 = 1e30;

/// 주소 앞부분 표시 글자 수 (`0x` 포함)
const ADDRESS_PREFIX_LEN: usize = 6;
/// 주소 뒷부분 표시 글자 수
const ADDRESS_SUFFIX_LEN: usize = 4;
/// 축약 가능한 최소 주소 길이
pub const MIN_ADDRESS_LEN: usize = ADDRESS_PREFIX_LEN + ADDRESS_SUFFIX_LEN;

/// 주소를 `앞 6자...뒤 4자` 형식으로 축약합니다.
///
/// 10자 미만의 주소는 [`FormatError::AddressTooShort`]를 반환합니다.
///
/// # 예제
///
/// ```
/// use leaderboard_core::try_format_address;
///
/// assert_eq!(try_format_address("0x1234567890abcdef").unwrap(), "0x1234...cdef");
/// assert!(try_format_address("0x1234").is_err());
/// ```
pub fn try_format_address(address: &str) -> FormatResult<String> {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() < MIN_ADDRESS_LEN {
        return Err(FormatError::AddressTooShort {
            address: address.to_string(),
            len: chars.len(),
            min: MIN_ADDRESS_LEN,
        });
    }

    let prefix: String = chars[..ADDRESS_PREFIX_LEN].iter().collect();
    let suffix: String = chars[chars.len() - ADDRESS_SUFFIX_LEN..].iter().collect();
    Ok(format!("{prefix}...{suffix}"))
}

/// 주소를 축약합니다. 축약할 수 없는 짧은 주소는 그대로 반환합니다.
///
/// 업스트림 데이터는 검증되지 않으므로 렌더링은 이 함수를 사용합니다.
pub fn format_address(address: &str) -> String {
    try_format_address(address).unwrap_or_else(|_| address.to_string())
}

/// 10^30 스케일 금액을 `$1234.50` 형식으로 포맷합니다.
///
/// 음수는 `$-12.00`처럼 부호가 `$` 뒤에 붙습니다.
pub fn format_usd(value: f64) -> String {
    format!("${:.2}", value / USD_SCALE)
}

/// 백분율 값을 `12.34%` 형식으로 포맷합니다.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// 텔레그램 HTML 파싱 모드용 이스케이프.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
