//! 모멘텀 지표 (Momentum Indicators).
//!
//! 가격 모멘텀과 과매수/과매도 상태를 측정하는 지표를 제공합니다.
//! - RSI (Relative Strength Index)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiParams {
    /// RSI 기간 (기본: 14).
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 모멘텀 지표 계산기.
#[derive(Debug, Default)]
pub struct MomentumCalculator;

impl MomentumCalculator {
    /// 새로운 모멘텀 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// RSI (Relative Strength Index) 계산.
    ///
    /// RSI = 100 - (100 / (1 + RS)), RS = 평균 상승폭 / 평균 하락폭
    ///
    /// 상승/하락 평균은 EWM(지수 가중 이동평균, alpha = 1/period) 방식입니다.
    ///
    /// # 반환
    /// 0-100 사이의 RSI 값들 (선행 period개는 None)
    pub fn rsi(
        &self,
        prices: &[Decimal],
        params: RsiParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if prices.len() < period + 1 {
            return Err(IndicatorError::InsufficientData {
                required: period + 1,
                provided: prices.len(),
            });
        }

        // 가격 변화 계산
        let mut deltas = Vec::with_capacity(prices.len());
        deltas.push(Decimal::ZERO);
        for i in 1..prices.len() {
            deltas.push(prices[i] - prices[i - 1]);
        }

        // 상승/하락 분리
        let gains: Vec<Decimal> = deltas
            .iter()
            .map(|&d| if d > Decimal::ZERO { d } else { Decimal::ZERO })
            .collect();
        let losses: Vec<Decimal> = deltas
            .iter()
            .map(|&d| if d < Decimal::ZERO { d.abs() } else { Decimal::ZERO })
            .collect();

        let alpha = Decimal::ONE / Decimal::from(period);
        let one_minus_alpha = Decimal::ONE - alpha;

        // 첫 delta는 의미가 없으므로 index 1부터 누적
        let avg_gains = ewm(&gains[1..], alpha, one_minus_alpha, period);
        let avg_losses = ewm(&losses[1..], alpha, one_minus_alpha, period);

        let mut result = vec![None];
        for i in 0..avg_gains.len() {
            match (avg_gains[i], avg_losses[i]) {
                (Some(gain), Some(loss)) => {
                    if loss == Decimal::ZERO {
                        result.push(Some(dec!(100)));
                    } else {
                        let rs = gain / loss;
                        let rsi = dec!(100) - (dec!(100) / (Decimal::ONE + rs));
                        result.push(Some(rsi));
                    }
                }
                _ => result.push(None),
            }
        }

        Ok(result)
    }
}

/// EWM (Exponential Weighted Mean) 계산.
///
/// 처음 min_periods-1개는 None이고, 초기값은 단순 평균으로 시작합니다.
fn ewm(
    values: &[Decimal],
    alpha: Decimal,
    one_minus_alpha: Decimal,
    min_periods: usize,
) -> Vec<Option<Decimal>> {
    let mut result = Vec::with_capacity(values.len());

    if values.is_empty() {
        return result;
    }

    let mut ewm_value = values[0];

    for i in 0..values.len() {
        if i < min_periods - 1 {
            result.push(None);
            if i > 0 {
                ewm_value = (values[i] * alpha) + (ewm_value * one_minus_alpha);
            }
        } else if i == min_periods - 1 {
            // 초기 EWM은 단순 평균으로 시작
            let sum: Decimal = values[..=i].iter().sum();
            ewm_value = sum / Decimal::from(i + 1);
            result.push(Some(ewm_value));
        } else {
            ewm_value = (values[i] * alpha) + (ewm_value * one_minus_alpha);
            result.push(Some(ewm_value));
        }
    }

    result
}
