//! 기술적 지표 이름 정의.
//!
//! 요청 파라미터로 들어오는 지표 이름과 시계열에 추가되는 컬럼 이름의
//! 매핑을 정의합니다. 알 수 없는 지표 이름은 파싱 단계에서 조용히 무시됩니다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 요청 가능한 기술적 지표.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    /// 단순 이동평균 (14기간)
    Sma,
    /// 지수 이동평균 (14기간)
    Ema,
    /// 상대강도지수 (14기간)
    Rsi,
    /// MACD 라인 (12/26/9)
    Macd,
    /// 볼린저 밴드 (20기간, 상단/중간/하단)
    Bbands,
}

impl Indicator {
    /// 요청 파라미터 표현 (캐시 키에도 사용).
    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::Sma => "sma",
            Indicator::Ema => "ema",
            Indicator::Rsi => "rsi",
            Indicator::Macd => "macd",
            Indicator::Bbands => "bbands",
        }
    }

    /// 지표 이름 파싱. 알 수 없는 이름은 `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sma" => Some(Indicator::Sma),
            "ema" => Some(Indicator::Ema),
            "rsi" => Some(Indicator::Rsi),
            "macd" => Some(Indicator::Macd),
            "bbands" => Some(Indicator::Bbands),
            _ => None,
        }
    }

    /// 이 지표가 시계열에 추가하는 컬럼 이름.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Indicator::Sma => &["SMA"],
            Indicator::Ema => &["EMA"],
            Indicator::Rsi => &["RSI"],
            Indicator::Macd => &["MACD"],
            Indicator::Bbands => &["BB_UPPER", "BB_MIDDLE", "BB_LOWER"],
        }
    }

    /// 요청 문자열 목록을 지표 집합으로 변환합니다.
    ///
    /// 알 수 없는 이름은 버리고, 정렬 및 중복 제거하여 집합 의미를 보장합니다.
    pub fn parse_set<S: AsRef<str>>(names: &[S]) -> Vec<Indicator> {
        let mut set: Vec<Indicator> = names
            .iter()
            .filter_map(|s| Indicator::parse(s.as_ref()))
            .collect();
        set.sort_unstable();
        set.dedup();
        set
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        assert_eq!(Indicator::parse("sma"), Some(Indicator::Sma));
        assert_eq!(Indicator::parse(" RSI "), Some(Indicator::Rsi));
        assert_eq!(Indicator::parse("BBands"), Some(Indicator::Bbands));
    }

    #[test]
    fn test_parse_unknown_is_none() {
        assert_eq!(Indicator::parse("vwap"), None);
        assert_eq!(Indicator::parse(""), None);
    }

    #[test]
    fn test_parse_set_sorted_and_deduped() {
        let set = Indicator::parse_set(&["rsi", "sma", "rsi", "unknown", "macd"]);
        assert_eq!(set, vec![Indicator::Sma, Indicator::Rsi, Indicator::Macd]);
    }

    #[test]
    fn test_bbands_columns() {
        assert_eq!(
            Indicator::Bbands.columns(),
            &["BB_UPPER", "BB_MIDDLE", "BB_LOWER"]
        );
        assert_eq!(Indicator::Macd.columns(), &["MACD"]);
    }
}
