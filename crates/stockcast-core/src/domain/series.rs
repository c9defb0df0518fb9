//! 정규화된 시계열 행 타입.
//!
//! 데이터 제공자의 원시 응답은 정규화를 거쳐 이 스키마로 통일됩니다.
//! 캐시에 저장되는 페이로드도 이 타입의 직렬화 결과입니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 정규화된 OHLCV 시계열 행.
///
/// `indicators` 맵에는 요청된 지표의 컬럼만 존재합니다. 키가 존재하면서
/// 값이 `None`이면 해당 시점에 지표를 계산할 수 없었다는 의미입니다
/// (예: 기간보다 짧은 시계열). 직렬화 시 지표 컬럼은 행에 평탄화됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    /// 봉 시작 시간
    pub date: DateTime<Utc>,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량
    pub volume: Decimal,
    /// 지표 컬럼 (컬럼 이름 -> 값)
    #[serde(flatten)]
    pub indicators: BTreeMap<String, Option<Decimal>>,
}

impl SeriesRow {
    /// 지표 컬럼 없이 새 행을 생성합니다.
    pub fn new(
        date: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            indicators: BTreeMap::new(),
        }
    }

    /// 지표 컬럼 이름 목록을 반환합니다.
    pub fn indicator_columns(&self) -> Vec<&str> {
        self.indicators.keys().map(|k| k.as_str()).collect()
    }
}

/// 시계열에서 종가 벡터를 추출합니다.
pub fn closes(rows: &[SeriesRow]) -> Vec<Decimal> {
    rows.iter().map(|r| r.close).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sample_row() -> SeriesRow {
        let mut row = SeriesRow::new(
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            dec!(100.5),
            dec!(103.0),
            dec!(99.75),
            dec!(102.25),
            dec!(1500000),
        );
        row.indicators.insert("SMA".to_string(), Some(dec!(101.1)));
        row.indicators.insert("RSI".to_string(), None);
        row
    }

    #[test]
    fn test_serde_roundtrip_preserves_columns() {
        let rows = vec![sample_row(), sample_row()];
        let json = serde_json::to_string(&rows).unwrap();
        let restored: Vec<SeriesRow> = serde_json::from_str(&json).unwrap();
        assert_eq!(rows, restored);
        assert_eq!(restored[0].indicator_columns(), vec!["RSI", "SMA"]);
    }

    #[test]
    fn test_flattened_indicator_serialization() {
        let json = serde_json::to_value(sample_row()).unwrap();
        // 지표 컬럼은 행에 평탄화되고, 계산 불가 값은 null로 남는다
        assert_eq!(json["SMA"], serde_json::json!("101.1"));
        assert!(json["RSI"].is_null());
        assert_eq!(json["close"], serde_json::json!("102.25"));
    }

    #[test]
    fn test_closes_helper() {
        let rows = vec![sample_row(), sample_row()];
        assert_eq!(closes(&rows), vec![dec!(102.25), dec!(102.25)]);
    }
}
