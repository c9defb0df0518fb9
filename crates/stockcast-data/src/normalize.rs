//! 시계열 정규화기.
//!
//! 데이터 제공자의 원시 테이블 행을 표준 스키마(`SeriesRow`)로 변환합니다.
//! 날짜 컬럼 이름은 간격에 따라 `Date`(일봉) 또는 `Datetime`(분/시간봉)으로
//! 달라지는데, 호출자가 어느 쪽인지 알 필요 없이 둘 다 처리합니다.
//! 매핑에 없는 컬럼은 표준 계약의 일부가 아니므로 무시합니다.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use stockcast_core::SeriesRow;
use tracing::debug;

use crate::error::{DataError, Result};
use crate::provider::RawRow;

/// 원시 행들을 표준 시계열로 정규화합니다.
///
/// 날짜를 해석할 수 없는 행은 오류이고, 숫자 필드가 빠진 행은 0으로
/// 채웁니다 (제공자 쪽에서 이미 종가 없는 봉을 걸러냅니다).
/// 결과는 시간 오름차순으로 정렬됩니다.
pub fn normalize_rows(raw: &[RawRow]) -> Result<Vec<SeriesRow>> {
    let mut rows = Vec::with_capacity(raw.len());

    for row in raw {
        let date = parse_date(row)?;
        rows.push(SeriesRow::new(
            date,
            decimal_field(row, "Open"),
            decimal_field(row, "High"),
            decimal_field(row, "Low"),
            decimal_field(row, "Close"),
            decimal_field(row, "Volume"),
        ));
    }

    rows.sort_by_key(|r| r.date);

    debug!(raw = raw.len(), normalized = rows.len(), "시계열 정규화 완료");
    Ok(rows)
}

/// 행에서 날짜를 해석합니다. `Date`와 `Datetime` 두 컬럼 이름을 모두 받습니다.
fn parse_date(row: &RawRow) -> Result<DateTime<Utc>> {
    let value = row
        .get("Date")
        .or_else(|| row.get("Datetime"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            DataError::ParseError("날짜 컬럼(Date/Datetime)이 없습니다".to_string())
        })?;

    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(datetime.and_utc());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap().and_utc())
        .map_err(|_| DataError::ParseError(format!("날짜 해석 실패: {}", value)))
}

/// 숫자 필드를 Decimal로 변환합니다. 없거나 숫자가 아니면 0.
fn decimal_field(row: &RawRow, column: &str) -> Decimal {
    row.get(column)
        .and_then(Value::as_f64)
        .and_then(Decimal::from_f64)
        .unwrap_or_default()
}
