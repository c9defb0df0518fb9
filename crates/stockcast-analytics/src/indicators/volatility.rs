//! 변동성 지표 (Volatility Indicators).
//!
//! 가격 변동성을 측정하는 지표를 제공합니다.
//! - Bollinger Bands (볼린저 밴드)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// 볼린저 밴드 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerBandsParams {
    /// 이동평균 기간 (기본: 20).
    pub period: usize,
    /// 표준편차 배수 (기본: 2.0).
    pub std_dev_multiplier: Decimal,
}

impl Default for BollingerBandsParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: dec!(2.0),
        }
    }
}

/// 볼린저 밴드 결과.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerBandsResult {
    /// 상단 밴드 (MA + k × σ).
    pub upper: Option<Decimal>,
    /// 중간 밴드 (이동평균).
    pub middle: Option<Decimal>,
    /// 하단 밴드 (MA - k × σ).
    pub lower: Option<Decimal>,
}

/// 변동성 지표 계산기.
#[derive(Debug, Default)]
pub struct VolatilityIndicators;

impl VolatilityIndicators {
    /// 새로운 변동성 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 볼린저 밴드 계산.
    ///
    /// 상단 밴드 = MA + (k × σ)
    /// 중간 밴드 = MA (이동평균)
    /// 하단 밴드 = MA - (k × σ)
    ///
    /// # 반환
    /// 각 시점의 상단/중간/하단 밴드 (선행 period-1개는 None)
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
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
                result.push(BollingerBandsResult {
                    upper: None,
                    middle: None,
                    lower: None,
                });
            } else {
                let window = &prices[i + 1 - period..=i];

                let sum: Decimal = window.iter().sum();
                let ma = sum / period_decimal;

                let variance: Decimal = window
                    .iter()
                    .map(|&p| {
                        let diff = p - ma;
                        diff * diff
                    })
                    .sum::<Decimal>()
                    / period_decimal;

                let std_dev = sqrt_decimal(variance);
                let deviation = params.std_dev_multiplier * std_dev;

                result.push(BollingerBandsResult {
                    upper: Some(ma + deviation),
                    middle: Some(ma),
                    lower: Some(ma - deviation),
                });
            }
        }

        Ok(result)
    }
}

/// Newton-Raphson 방법으로 Decimal 제곱근을 근사합니다.
fn sqrt_decimal(value: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut x = value;
    let two = dec!(2);

    // 10회 반복이면 충분한 정밀도
    for _ in 0..10 {
        x = (x + value / x) / two;
    }

    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt_decimal() {
        assert_eq!(sqrt_decimal(Decimal::ZERO), Decimal::ZERO);
        let root = sqrt_decimal(dec!(16));
        assert!((root - dec!(4)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_bollinger_constant_series() {
        let calc = VolatilityIndicators::new();
        let data = vec![dec!(50); 25];
        let result = calc
            .bollinger_bands(&data, BollingerBandsParams::default())
            .unwrap();

        assert_eq!(result.len(), 25);
        assert!(result[18].middle.is_none());
        // 변동이 없으면 세 밴드가 모두 평균과 같다
        assert_eq!(result[19].middle, Some(dec!(50)));
        assert_eq!(result[19].upper, Some(dec!(50)));
        assert_eq!(result[19].lower, Some(dec!(50)));
    }

    #[test]
    fn test_bollinger_band_ordering() {
        let calc = VolatilityIndicators::new();
        let data: Vec<Decimal> = (1..=30).map(Decimal::from).collect();
        let result = calc
            .bollinger_bands(&data, BollingerBandsParams::default())
            .unwrap();

        let last = &result[29];
        assert!(last.upper.unwrap() > last.middle.unwrap());
        assert!(last.middle.unwrap() > last.lower.unwrap());
    }

    #[test]
    fn test_bollinger_insufficient_data() {
        let calc = VolatilityIndicators::new();
        let data = vec![dec!(1); 10];
        let err = calc
            .bollinger_bands(&data, BollingerBandsParams::default())
            .unwrap_err();
        assert!(matches!(err, IndicatorError::InsufficientData { .. }));
    }
}
