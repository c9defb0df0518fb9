//! Holt 선형 추세 지수평활 모델.
//!
//! 레벨과 추세 두 성분을 지수평활로 추정하는 고전적인 단기 예측 기법입니다.
//! 관측 구간에는 1스텝 선행 적합값을, 미래 구간에는
//! `레벨 + h × 추세` 외삽값을 생성합니다.

use serde::{Deserialize, Serialize};

use super::{ForecastError, ForecastModel, ForecastResult, ModelOutput};

/// Holt 모델 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HoltParams {
    /// 레벨 평활 계수 (0 < alpha <= 1).
    pub alpha: f64,
    /// 추세 평활 계수 (0 < beta <= 1).
    pub beta: f64,
}

impl Default for HoltParams {
    fn default() -> Self {
        Self { alpha: 0.5, beta: 0.3 }
    }
}

/// Holt 선형 추세 모델.
#[derive(Debug, Default)]
pub struct HoltLinear {
    params: HoltParams,
}

impl HoltLinear {
    /// 기본 파라미터로 모델 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 파라미터를 지정하여 모델 생성.
    pub fn with_params(params: HoltParams) -> ForecastResult<Self> {
        if !(params.alpha > 0.0 && params.alpha <= 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "alpha must be in (0, 1]: {}",
                params.alpha
            )));
        }
        if !(params.beta > 0.0 && params.beta <= 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "beta must be in (0, 1]: {}",
                params.beta
            )));
        }
        Ok(Self { params })
    }
}

impl ForecastModel for HoltLinear {
    fn name(&self) -> &'static str {
        "holt-linear"
    }

    fn forecast(&self, values: &[f64], periods: usize) -> ForecastResult<ModelOutput> {
        // 초기 추세 추정에 관측값 2개가 필요하다
        if values.len() < 2 {
            return Err(ForecastError::InsufficientData {
                required: 2,
                provided: values.len(),
            });
        }

        let alpha = self.params.alpha;
        let beta = self.params.beta;

        let mut level = values[0];
        let mut trend = values[1] - values[0];

        let mut fitted = Vec::with_capacity(values.len());
        fitted.push(values[0]);

        for &observed in &values[1..] {
            // 1스텝 선행 적합값은 갱신 전의 레벨 + 추세
            fitted.push(level + trend);

            let prev_level = level;
            level = alpha * observed + (1.0 - alpha) * (level + trend);
            trend = beta * (level - prev_level) + (1.0 - beta) * trend;
        }

        let predicted = (1..=periods)
            .map(|h| level + h as f64 * trend)
            .collect();

        Ok(ModelOutput { fitted, predicted })
    }
}
