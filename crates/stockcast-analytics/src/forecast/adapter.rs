//! 예측 어댑터.
//!
//! 정규화된 시계열을 예측 엔진 입력으로 변환하고, 엔진 출력을
//! `{date, close}` 예측 행으로 후처리합니다.
//!
//! 후처리의 음수 보정은 정렬된 출력 순서대로 앞 행의 보정값을 가져오는
//! forward-fill 방식입니다. 첫 행은 보정 대상이 아닙니다 (앞 행이 없음).

use chrono::{Duration, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use stockcast_core::SeriesRow;
use tracing::debug;

use super::{ForecastModel, ForecastResult, HoltLinear};

/// 예측 행.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    /// 예측 시점 (타임존 없는 타임스탬프)
    pub date: NaiveDateTime,
    /// 예측 종가
    pub close: f64,
}

/// 예측 어댑터.
///
/// 예측 엔진 자체는 교체 가능한 협력자이며, 기본값은 Holt 선형 추세 모델입니다.
pub struct ForecastAdapter {
    model: Box<dyn ForecastModel>,
}

impl Default for ForecastAdapter {
    fn default() -> Self {
        Self {
            model: Box::new(HoltLinear::new()),
        }
    }
}

impl ForecastAdapter {
    /// 기본 모델로 어댑터 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 모델을 지정하여 어댑터 생성.
    pub fn with_model(model: Box<dyn ForecastModel>) -> Self {
        Self { model }
    }

    /// 시계열에 대해 `horizon`기간의 예측을 생성합니다.
    ///
    /// 출력은 관측 구간의 적합값과 미래 구간의 예측값을 모두 포함합니다.
    /// 음수 horizon은 0으로 처리합니다. 시계열이 모델 요구보다 짧으면
    /// 엔진의 오류가 그대로 전파됩니다.
    pub fn forecast(
        &self,
        rows: &[SeriesRow],
        horizon: i64,
    ) -> ForecastResult<Vec<ForecastPoint>> {
        // 입력 준비: 타임존 제거, 음수 종가 제외, 시간순 정렬
        let mut pairs: Vec<(NaiveDateTime, f64)> = rows
            .iter()
            .filter_map(|row| {
                let close = row.close.to_f64()?;
                (close >= 0.0).then_some((row.date.naive_utc(), close))
            })
            .collect();
        pairs.sort_by_key(|(ts, _)| *ts);

        let periods = horizon.max(0) as usize;

        debug!(
            model = self.model.name(),
            observations = pairs.len(),
            periods = periods,
            "예측 시작"
        );

        let values: Vec<f64> = pairs.iter().map(|(_, value)| *value).collect();
        let output = self.model.forecast(&values, periods)?;

        // 관측 구간 적합값 + 미래 구간 예측값
        let mut points: Vec<ForecastPoint> = pairs
            .iter()
            .zip(output.fitted.iter())
            .map(|(&(ts, _), &value)| ForecastPoint { date: ts, close: value })
            .collect();

        if let Some(&(last_ts, _)) = pairs.last() {
            let step = infer_step(&pairs);
            for (h, &value) in output.predicted.iter().enumerate() {
                points.push(ForecastPoint {
                    date: last_ts + step * (h as i32 + 1),
                    close: value,
                });
            }
        }

        clamp_non_negative(&mut points);

        Ok(points)
    }
}

/// 관측 간격에서 미래 시점의 보폭을 추정합니다.
///
/// 마지막 두 관측의 간격을 사용하고, 관측이 둘 미만이거나 간격이
/// 양수가 아니면 1일을 사용합니다.
fn infer_step(pairs: &[(NaiveDateTime, f64)]) -> Duration {
    match pairs {
        [.., (prev, _), (last, _)] => {
            let step = *last - *prev;
            if step > Duration::zero() {
                step
            } else {
                Duration::days(1)
            }
        }
        _ => Duration::days(1),
    }
}

/// 음수 예측값을 직전 행의 보정값으로 교체합니다 (forward-fill).
///
/// 첫 행은 음수여도 그대로 둡니다.
fn clamp_non_negative(points: &mut [ForecastPoint]) {
    for i in 1..points.len() {
        if points[i].close < 0.0 {
            points[i].close = points[i - 1].close;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use stockcast_core::SeriesRow;

    use crate::forecast::ForecastError;

    fn row(day: u32, close: i64) -> SeriesRow {
        let price = Decimal::from(close);
        SeriesRow::new(
            Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap(),
            price,
            price,
            price,
            price,
            Decimal::from(1000),
        )
    }

    fn point(day: u32, close: f64) -> ForecastPoint {
        ForecastPoint {
            date: Utc
                .with_ymd_and_hms(2024, 3, day, 0, 0, 0)
                .unwrap()
                .naive_utc(),
            close,
        }
    }

    #[test]
    fn test_output_covers_history_and_future() {
        let adapter = ForecastAdapter::new();
        let rows: Vec<SeriesRow> = (1..=10).map(|d| row(d, 100 + d as i64)).collect();
        let points = adapter.forecast(&rows, 5).unwrap();

        assert_eq!(points.len(), 15);
        // 미래 시점은 관측 간격(1일)만큼 전진한다
        assert_eq!(points[10].date, point(11, 0.0).date);
        assert_eq!(points[14].date, point(15, 0.0).date);
    }

    #[test]
    fn test_negative_horizon_equals_zero() {
        let adapter = ForecastAdapter::new();
        let rows: Vec<SeriesRow> = (1..=10).map(|d| row(d, 100)).collect();

        let negative = adapter.forecast(&rows, -5).unwrap();
        let zero = adapter.forecast(&rows, 0).unwrap();
        assert_eq!(negative, zero);
        assert_eq!(negative.len(), 10);
    }

    #[test]
    fn test_negative_closes_discarded_before_fit() {
        let adapter = ForecastAdapter::new();
        let mut rows: Vec<SeriesRow> = (1..=10).map(|d| row(d, 100)).collect();
        rows[4].close = Decimal::from(-50);

        let points = adapter.forecast(&rows, 0).unwrap();
        // 음수 종가 행은 적합 입력에서 제외된다
        assert_eq!(points.len(), 9);
    }

    #[test]
    fn test_too_short_series_surfaces_engine_error() {
        let adapter = ForecastAdapter::new();
        let err = adapter.forecast(&[row(1, 100)], 30).unwrap_err();
        assert!(matches!(err, ForecastError::InsufficientData { .. }));
        assert!(matches!(
            adapter.forecast(&[], 30),
            Err(ForecastError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_clamp_forward_fills_from_previous_row() {
        let mut points = vec![
            point(1, 10.0),
            point(2, -3.0),
            point(3, -4.0),
            point(4, 7.0),
        ];
        clamp_non_negative(&mut points);

        assert_eq!(points[1].close, 10.0);
        // 연쇄 음수는 보정된 값이 이어진다
        assert_eq!(points[2].close, 10.0);
        assert_eq!(points[3].close, 7.0);
    }

    #[test]
    fn test_clamp_never_touches_first_row() {
        let mut points = vec![point(1, -2.0), point(2, 5.0), point(3, -1.0)];
        clamp_non_negative(&mut points);

        assert_eq!(points[0].close, -2.0);
        assert_eq!(points[2].close, 5.0);
    }

    #[test]
    fn test_unsorted_input_is_sorted_before_fit() {
        let adapter = ForecastAdapter::new();
        let rows = vec![row(3, 103), row(1, 101), row(2, 102)];
        let points = adapter.forecast(&rows, 1).unwrap();

        assert_eq!(points[0].date, point(1, 0.0).date);
        assert_eq!(points[2].date, point(3, 0.0).date);
        assert_eq!(points[3].date, point(4, 0.0).date);
    }
}
