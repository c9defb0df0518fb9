//! 지표 컬럼 augmenter.
//!
//! 정규화된 시계열에 요청된 지표 컬럼을 추가합니다. 시계열이 지표 기간보다
//! 짧아 계산이 불가능하면 요청을 실패시키지 않고 컬럼을 빈 값(None)으로
//! 채웁니다. 컬럼 존재 여부는 오직 요청된 지표 집합의 함수입니다.

use rust_decimal::Decimal;
use stockcast_core::{closes, Indicator, SeriesRow};
use tracing::debug;

use crate::indicators::{
    BollingerBandsParams, EmaParams, IndicatorEngine, MacdParams, RsiParams, SmaParams,
};

/// 요청된 지표 컬럼을 시계열에 추가합니다.
///
/// 각 지표는 고정 파라미터를 사용합니다:
/// SMA/EMA/RSI 14기간, MACD 12/26/9 (MACD 라인만), Bollinger 20기간 2σ.
pub fn augment_series(rows: &mut [SeriesRow], indicators: &[Indicator]) {
    if rows.is_empty() || indicators.is_empty() {
        return;
    }

    let engine = IndicatorEngine::new();
    let close_prices = closes(rows);
    let len = rows.len();

    for indicator in indicators {
        match indicator {
            Indicator::Sma => {
                let column = column_or_empty(
                    engine.sma(&close_prices, SmaParams::default()),
                    len,
                    "SMA",
                );
                insert_column(rows, "SMA", column);
            }
            Indicator::Ema => {
                let column = column_or_empty(
                    engine.ema(&close_prices, EmaParams::default()),
                    len,
                    "EMA",
                );
                insert_column(rows, "EMA", column);
            }
            Indicator::Rsi => {
                let column = column_or_empty(
                    engine.rsi(&close_prices, RsiParams::default()),
                    len,
                    "RSI",
                );
                insert_column(rows, "RSI", column);
            }
            Indicator::Macd => {
                let column = match engine.macd(&close_prices, MacdParams::default()) {
                    Ok(results) => results.into_iter().map(|r| r.macd).collect(),
                    Err(e) => {
                        debug!(column = "MACD", reason = %e, "지표 계산 불가, 빈 컬럼으로 대체");
                        vec![None; len]
                    }
                };
                insert_column(rows, "MACD", column);
            }
            Indicator::Bbands => {
                let bands = match engine.bollinger_bands(&close_prices, BollingerBandsParams::default()) {
                    Ok(results) => results,
                    Err(e) => {
                        debug!(column = "BB", reason = %e, "지표 계산 불가, 빈 컬럼으로 대체");
                        vec![
                            crate::indicators::BollingerBandsResult {
                                upper: None,
                                middle: None,
                                lower: None,
                            };
                            len
                        ]
                    }
                };
                insert_column(rows, "BB_UPPER", bands.iter().map(|b| b.upper).collect());
                insert_column(rows, "BB_MIDDLE", bands.iter().map(|b| b.middle).collect());
                insert_column(rows, "BB_LOWER", bands.iter().map(|b| b.lower).collect());
            }
        }
    }
}

/// 계산 결과를 컬럼으로 변환하거나, 데이터 부족 시 빈 컬럼을 만듭니다.
fn column_or_empty(
    result: crate::indicators::IndicatorResult<Vec<Option<Decimal>>>,
    len: usize,
    column: &str,
) -> Vec<Option<Decimal>> {
    match result {
        Ok(values) => values,
        Err(e) => {
            debug!(column = column, reason = %e, "지표 계산 불가, 빈 컬럼으로 대체");
            vec![None; len]
        }
    }
}

/// 컬럼 값을 각 행의 지표 맵에 기록합니다.
fn insert_column(rows: &mut [SeriesRow], name: &str, values: Vec<Option<Decimal>>) {
    for (row, value) in rows.iter_mut().zip(values) {
        row.indicators.insert(name.to_string(), value);
    }
}
