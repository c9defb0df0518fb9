//! 예측 endpoint.
//!
//! `POST /forecast` - 과거 시계열을 같은 캐시 우선 파이프라인으로 조회한 뒤
//! 예측 엔진을 거쳐 관측 구간 + 미래 구간의 종가 예측을 반환합니다.

use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;

use stockcast_core::{Indicator, Interval};
use stockcast_data::SeriesRequest;

use crate::error::{ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 예측 요청 본문.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ForecastRequest {
    /// 종목 심볼
    pub symbol: String,
    /// 봉 간격 (1m, 5m, 15m, 30m, 1h, 1d; 알 수 없는 값은 1d로 처리)
    #[serde(default = "default_interval")]
    #[schema(example = "1d")]
    pub interval: String,
    /// 시작 날짜
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// 종료 날짜
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// 지표 이름 (알 수 없는 이름은 무시)
    #[serde(default)]
    pub indicators: Vec<String>,
    /// 예측 기간 (기본: 30, 음수는 0으로 처리)
    #[serde(default = "default_forecast_period")]
    pub forecast_period: i64,
}

fn default_interval() -> String {
    "1d".to_string()
}

fn default_forecast_period() -> i64 {
    30
}

/// 예측 행 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct ForecastRowResponse {
    /// 예측 시점 (일봉 `YYYY-MM-DD`, 분/시간봉 `YYYY-MM-DD HH:MM:SS`)
    pub date: String,
    /// 예측 종가
    pub close: f64,
}

/// 종가 예측.
///
/// POST /forecast
///
/// 시계열이 모델 요구보다 짧으면 예측 엔진의 오류가 그대로 전파됩니다.
#[utoipa::path(
    post,
    path = "/forecast",
    tag = "forecast",
    request_body = ForecastRequest,
    responses(
        (status = 200, description = "예측 시계열 (관측 구간 + 미래 구간)", body = Vec<ForecastRowResponse>),
        (status = 400, description = "잘못된 요청", body = ApiErrorResponse),
        (status = 422, description = "예측 불가 (데이터 부족 등)", body = ApiErrorResponse),
        (status = 502, description = "데이터 제공자 오류", body = ApiErrorResponse),
    )
)]
pub async fn post_forecast(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ForecastRequest>,
) -> ApiResult<Json<Vec<ForecastRowResponse>>> {
    let symbol = request.symbol.trim().to_string();
    if symbol.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiErrorResponse::new(
                "MISSING_SYMBOL",
                "symbol 파라미터가 필요합니다",
            )),
        ));
    }

    let interval = Interval::parse_or_daily(&request.interval);
    let series_request = SeriesRequest {
        symbol: symbol.clone(),
        interval,
        start_date: request.start_date,
        end_date: request.end_date,
        indicators: Indicator::parse_set(&request.indicators),
    };

    let rows = state
        .series_provider
        .get_series(series_request)
        .await
        .map_err(|e| {
            error!(symbol = %symbol, error = %e, "예측용 시계열 조회 실패");
            (
                StatusCode::BAD_GATEWAY,
                Json(ApiErrorResponse::new(
                    "DATA_FETCH_ERROR",
                    format!("차트 데이터 조회 실패: {}", e),
                )),
            )
        })?;

    let points = state
        .forecaster
        .forecast(&rows, request.forecast_period)
        .map_err(|e| {
            error!(symbol = %symbol, error = %e, "예측 실패");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiErrorResponse::new(
                    "FORECAST_ERROR",
                    format!("예측 실패: {}", e),
                )),
            )
        })?;

    info!(
        symbol = %symbol,
        observations = rows.len(),
        points = points.len(),
        "예측 응답"
    );

    let format = if interval.is_intraday() {
        "%Y-%m-%d %H:%M:%S"
    } else {
        "%Y-%m-%d"
    };

    Ok(Json(
        points
            .into_iter()
            .map(|p| ForecastRowResponse {
                date: p.date.format(format).to_string(),
                close: p.close,
            })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use tower::ServiceExt;

    use crate::state::test_support::{test_state, StubProvider};

    fn app(provider: StubProvider) -> Router {
        Router::new()
            .route("/forecast", post(post_forecast))
            .with_state(test_state(provider))
    }

    async fn send(app: Router, body: serde_json::Value) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/forecast")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_forecast_covers_history_and_future() {
        let response = send(
            app(StubProvider::with_daily_bars(10)),
            serde_json::json!({"symbol": "AAPL", "forecast_period": 5}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let rows = json.as_array().unwrap();

        // 관측 10개 + 예측 5개
        assert_eq!(rows.len(), 15);
        assert_eq!(rows[0]["date"], "2024-01-01");
        assert_eq!(rows[10]["date"], "2024-01-11");
        assert!(rows[14]["close"].is_number());
    }

    #[tokio::test]
    async fn test_forecast_default_period_is_30() {
        let response = send(
            app(StubProvider::with_daily_bars(10)),
            serde_json::json!({"symbol": "AAPL"}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json.as_array().unwrap().len(), 40);
    }

    #[tokio::test]
    async fn test_negative_period_equals_zero() {
        let negative = send(
            app(StubProvider::with_daily_bars(10)),
            serde_json::json!({"symbol": "AAPL", "forecast_period": -5}),
        )
        .await;
        let zero = send(
            app(StubProvider::with_daily_bars(10)),
            serde_json::json!({"symbol": "AAPL", "forecast_period": 0}),
        )
        .await;

        assert_eq!(negative.status(), StatusCode::OK);
        let negative_json = body_json(negative).await;
        let zero_json = body_json(zero).await;
        assert_eq!(negative_json, zero_json);
        assert_eq!(negative_json.as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_forecast_too_short_series_is_unprocessable() {
        let response = send(
            app(StubProvider::empty()),
            serde_json::json!({"symbol": "UNKNOWNTICKER"}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["code"], "FORECAST_ERROR");
    }

    #[tokio::test]
    async fn test_forecast_missing_symbol_is_bad_request() {
        let response = send(
            app(StubProvider::with_daily_bars(10)),
            serde_json::json!({"symbol": "  "}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
