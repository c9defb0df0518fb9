//! 캔들 데이터를 위한 봉 간격 정의.
//!
//! 이 모듈은 조회 가능한 봉 간격과 간격별 기본 조회 기간(lookback)을 정의합니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// 캔들 봉 간격.
///
/// 직렬화 표현은 데이터 제공자의 interval 문자열과 동일합니다 (예: "1m", "1d").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    /// 1분봉
    #[serde(rename = "1m")]
    M1,
    /// 5분봉
    #[serde(rename = "5m")]
    M5,
    /// 15분봉
    #[serde(rename = "15m")]
    M15,
    /// 30분봉
    #[serde(rename = "30m")]
    M30,
    /// 1시간봉
    #[serde(rename = "1h")]
    H1,
    /// 일봉
    #[serde(rename = "1d")]
    D1,
}

impl Interval {
    /// 데이터 제공자 interval 문자열로 변환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::M1 => "1m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::H1 => "1h",
            Interval::D1 => "1d",
        }
    }

    /// interval 문자열에서 파싱합니다.
    pub fn from_interval_str(s: &str) -> Option<Self> {
        match s {
            "1m" => Some(Interval::M1),
            "5m" => Some(Interval::M5),
            "15m" => Some(Interval::M15),
            "30m" => Some(Interval::M30),
            "1h" => Some(Interval::H1),
            "1d" => Some(Interval::D1),
            _ => None,
        }
    }

    /// 알 수 없는 문자열은 일봉으로 간주하여 파싱합니다.
    ///
    /// 요청 경계에서 사용하는 관대한 파서입니다.
    pub fn parse_or_daily(s: &str) -> Self {
        Self::from_interval_str(s.trim().to_lowercase().as_str()).unwrap_or(Interval::D1)
    }

    /// 이 간격의 봉 하나가 차지하는 기간을 반환합니다.
    pub fn duration(&self) -> Duration {
        match self {
            Interval::M1 => Duration::from_secs(60),
            Interval::M5 => Duration::from_secs(5 * 60),
            Interval::M15 => Duration::from_secs(15 * 60),
            Interval::M30 => Duration::from_secs(30 * 60),
            Interval::H1 => Duration::from_secs(60 * 60),
            Interval::D1 => Duration::from_secs(24 * 60 * 60),
        }
    }

    /// 명시적 날짜 범위가 없을 때 적용되는 기본 조회 기간(일 단위).
    ///
    /// 분봉은 짧게, 30분봉/시간봉은 60일, 일봉은 1년을 조회합니다.
    pub fn lookback_days(&self) -> u64 {
        match self {
            Interval::M1 => 1,
            Interval::M5 => 5,
            Interval::M15 => 7,
            Interval::M30 => 60,
            Interval::H1 => 60,
            Interval::D1 => 365,
        }
    }

    /// 분봉/시간봉인지 확인합니다.
    pub fn is_intraday(&self) -> bool {
        !matches!(self, Interval::D1)
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::D1
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_interval_str(s).ok_or_else(|| format!("Invalid interval: {}", s))
    }
}
