//! 추세 지표 (Trend Indicators).
//!
//! 이동평균 기반의 추세 지표들을 제공합니다.
//! - SMA (Simple Moving Average)
//! - EMA (Exponential Moving Average)
//! - MACD (Moving Average Convergence Divergence)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// SMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// EMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// MACD 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdParams {
    /// 단기 EMA 기간 (기본: 12).
    pub fast_period: usize,
    /// 장기 EMA 기간 (기본: 26).
    pub slow_period: usize,
    /// 시그널 라인 기간 (기본: 9).
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD 결과.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdResult {
    /// MACD 라인 (단기 EMA - 장기 EMA).
    pub macd: Option<Decimal>,
    /// 시그널 라인 (MACD의 EMA).
    pub signal: Option<Decimal>,
    /// 히스토그램 (MACD - 시그널).
    pub histogram: Option<Decimal>,
}

/// 추세 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// SMA = (P1 + P2 + ... + Pn) / n
    ///
    /// # 반환
    /// 각 시점의 SMA 값 (처음 period-1개는 None)
    pub fn sma(
        &self,
        prices: &[Decimal],
        params: SmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if prices.len() < period {
            return Err(IndicatorError::InsufficientData {
                required: period,
                provided: prices.len(),
            });
        }

        let mut result = Vec::with_capacity(prices.len());
        let period_decimal = Decimal::from(period);

        for i in 0..prices.len() {
            if i < period - 1 {
                result.push(None);
            } else {
                let sum: Decimal = prices[i + 1 - period..=i].iter().sum();
                result.push(Some(sum / period_decimal));
            }
        }

        Ok(result)
    }

    /// 지수 이동평균 (EMA) 계산.
    ///
    /// EMA = (현재가 × k) + (이전 EMA × (1 - k)), k = 2 / (period + 1)
    /// 초기 EMA는 첫 period개의 단순 평균입니다.
    pub fn ema(
        &self,
        prices: &[Decimal],
        params: EmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if prices.len() < period {
            return Err(IndicatorError::InsufficientData {
                required: period,
                provided: prices.len(),
            });
        }

        let k = Decimal::from(2) / Decimal::from(period + 1);
        let one_minus_k = Decimal::ONE - k;

        let mut result = Vec::with_capacity(prices.len());
        let mut ema_value = Decimal::ZERO;

        for i in 0..prices.len() {
            if i < period - 1 {
                result.push(None);
            } else if i == period - 1 {
                let sum: Decimal = prices[..period].iter().sum();
                ema_value = sum / Decimal::from(period);
                result.push(Some(ema_value));
            } else {
                ema_value = (prices[i] * k) + (ema_value * one_minus_k);
                result.push(Some(ema_value));
            }
        }

        Ok(result)
    }

    /// MACD (Moving Average Convergence Divergence) 계산.
    ///
    /// MACD 라인 = 단기 EMA - 장기 EMA
    /// 시그널 라인 = MACD 라인의 EMA
    /// 히스토그램 = MACD 라인 - 시그널 라인
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        if params.fast_period >= params.slow_period {
            return Err(IndicatorError::InvalidParameter(
                "단기 기간은 장기 기간보다 짧아야 합니다".to_string(),
            ));
        }

        if prices.len() < params.slow_period {
            return Err(IndicatorError::InsufficientData {
                required: params.slow_period,
                provided: prices.len(),
            });
        }

        let fast = self.ema(prices, EmaParams { period: params.fast_period })?;
        let slow = self.ema(prices, EmaParams { period: params.slow_period })?;

        // MACD 라인: 두 EMA가 모두 존재하는 시점부터
        let macd_line: Vec<Option<Decimal>> = fast
            .iter()
            .zip(slow.iter())
            .map(|(f, s)| match (f, s) {
                (Some(f), Some(s)) => Some(*f - *s),
                _ => None,
            })
            .collect();

        // 시그널 라인: MACD 라인의 유효 구간에 대한 EMA
        let offset = params.slow_period - 1;
        let dense: Vec<Decimal> = macd_line.iter().flatten().copied().collect();
        let signal_dense = if dense.len() >= params.signal_period {
            self.ema(&dense, EmaParams { period: params.signal_period })?
        } else {
            vec![None; dense.len()]
        };

        let mut result = Vec::with_capacity(prices.len());
        for (i, macd) in macd_line.iter().enumerate() {
            let signal = if i >= offset {
                signal_dense.get(i - offset).copied().flatten()
            } else {
                None
            };
            let histogram = match (macd, signal) {
                (Some(m), Some(s)) => Some(*m - s),
                _ => None,
            };
            result.push(MacdResult {
                macd: *macd,
                signal,
                histogram,
            });
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn prices(values: &[i64]) -> Vec<Decimal> {
        values.iter().map(|&v| Decimal::from(v)).collect()
    }

    #[test]
    fn test_sma_basic() {
        let calc = TrendIndicators::new();
        let result = calc
            .sma(&prices(&[1, 2, 3, 4, 5]), SmaParams { period: 3 })
            .unwrap();

        assert_eq!(result[0], None);
        assert_eq!(result[1], None);
        assert_eq!(result[2], Some(dec!(2)));
        assert_eq!(result[3], Some(dec!(3)));
        assert_eq!(result[4], Some(dec!(4)));
    }

    #[test]
    fn test_sma_insufficient_data() {
        let calc = TrendIndicators::new();
        let err = calc
            .sma(&prices(&[1, 2]), SmaParams { period: 3 })
            .unwrap_err();
        assert!(matches!(
            err,
            IndicatorError::InsufficientData { required: 3, provided: 2 }
        ));
    }

    #[test]
    fn test_ema_seeded_with_sma() {
        let calc = TrendIndicators::new();
        let result = calc
            .ema(&prices(&[2, 4, 6, 8]), EmaParams { period: 2 })
            .unwrap();

        assert_eq!(result[0], None);
        // 초기 EMA = (2 + 4) / 2 = 3
        assert_eq!(result[1], Some(dec!(3)));
        // k = 2/3: 6 * 2/3 + 3 * 1/3 = 5
        assert_eq!(result[2].map(|v| v.round_dp(6)), Some(dec!(5)));
    }

    #[test]
    fn test_macd_leading_none_then_values() {
        let calc = TrendIndicators::new();
        let data: Vec<Decimal> = (1..=40).map(Decimal::from).collect();
        let result = calc.macd(&data, MacdParams::default()).unwrap();

        assert_eq!(result.len(), 40);
        assert!(result[24].macd.is_none());
        assert!(result[25].macd.is_some());
        // 시그널은 MACD 라인이 signal_period개 쌓인 뒤부터
        assert!(result[32].signal.is_none());
        assert!(result[33].signal.is_some());
        assert!(result[33].histogram.is_some());
    }

    #[test]
    fn test_macd_invalid_periods() {
        let calc = TrendIndicators::new();
        let data: Vec<Decimal> = (1..=40).map(Decimal::from).collect();
        let err = calc
            .macd(
                &data,
                MacdParams { fast_period: 26, slow_period: 12, signal_period: 9 },
            )
            .unwrap_err();
        assert!(matches!(err, IndicatorError::InvalidParameter(_)));
    }
}
