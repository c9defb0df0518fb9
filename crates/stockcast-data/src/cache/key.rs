//! 캐시 키 빌더.
//!
//! 해석된 요청 파라미터에서 캐시 키를 만드는 순수 함수입니다.
//! 동일한 논리적 요청은 지표 입력 순서와 무관하게 항상 같은 키를 만들고,
//! 파라미터 중 하나라도 다르면 다른 키를 만듭니다. 파라미터 유효성 검증은
//! 요청 경계의 책임이며 여기서는 하지 않습니다.

use chrono::NaiveDate;
use stockcast_core::{Indicator, Interval};

/// 시계열 캐시 키를 생성합니다.
///
/// 형식: `series:{SYMBOL}:{interval}:{start}:{end}:{indicators}`
/// (지표 이름은 정렬·중복 제거 후 쉼표로 연결)
pub fn series_key(
    symbol: &str,
    interval: Interval,
    start: NaiveDate,
    end: NaiveDate,
    indicators: &[Indicator],
) -> String {
    let mut names: Vec<&str> = indicators.iter().map(|i| i.as_str()).collect();
    names.sort_unstable();
    names.dedup();

    format!(
        "series:{}:{}:{}:{}:{}",
        symbol.trim().to_uppercase(),
        interval,
        start,
        end,
        names.join(",")
    )
}
