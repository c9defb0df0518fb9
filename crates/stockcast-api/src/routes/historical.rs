//! 과거 시계열 endpoint.
//!
//! `GET /historical` - 캐시 우선 파이프라인을 통해 표준 스키마의
//! 시계열을 조회합니다. 요청된 지표 컬럼이 행에 평탄화되어 포함됩니다.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;

use stockcast_core::{Indicator, Interval, SeriesRow};
use stockcast_data::SeriesRequest;

use crate::error::{ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 표준 시계열 행 응답.
///
/// 지표 컬럼은 행에 평탄화되며, 계산 불가 시점은 null입니다.
#[derive(Debug, Serialize, ToSchema)]
pub struct SeriesRowResponse {
    /// 봉 시작 시간 (일봉 `YYYY-MM-DD`, 분/시간봉 `YYYY-MM-DD HH:MM:SS`)
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// 요청된 지표 컬럼
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub indicators: BTreeMap<String, Option<f64>>,
}

impl SeriesRowResponse {
    /// 내부 표현을 응답 행으로 변환합니다.
    pub fn from_row(row: &SeriesRow, interval: Interval) -> Self {
        let format = if interval.is_intraday() {
            "%Y-%m-%d %H:%M:%S"
        } else {
            "%Y-%m-%d"
        };

        Self {
            date: row.date.format(format).to_string(),
            open: row.open.to_f64().unwrap_or_default(),
            high: row.high.to_f64().unwrap_or_default(),
            low: row.low.to_f64().unwrap_or_default(),
            close: row.close.to_f64().unwrap_or_default(),
            volume: row.volume.to_f64().unwrap_or_default(),
            indicators: row
                .indicators
                .iter()
                .map(|(name, value)| {
                    (name.clone(), value.as_ref().and_then(|v| v.to_f64()))
                })
                .collect(),
        }
    }
}

/// 쿼리 문자열에서 시계열 요청을 만듭니다.
///
/// `indicators`는 반복 지정과 쉼표 목록을 모두 받으며, 알 수 없는 이름은
/// 조용히 무시합니다. 기본값 적용은 파이프라인의 `resolve`에서 일어납니다.
fn parse_query(
    params: &[(String, String)],
) -> Result<SeriesRequest, (StatusCode, Json<ApiErrorResponse>)> {
    let mut symbol: Option<String> = None;
    let mut interval = Interval::default();
    let mut start_date: Option<NaiveDate> = None;
    let mut end_date: Option<NaiveDate> = None;
    let mut indicator_names: Vec<String> = Vec::new();

    for (name, value) in params {
        match name.as_str() {
            "symbol" => symbol = Some(value.trim().to_string()),
            "interval" => interval = Interval::parse_or_daily(value),
            "start_date" => start_date = Some(parse_date(name, value)?),
            "end_date" => end_date = Some(parse_date(name, value)?),
            "indicators" => {
                indicator_names.extend(value.split(',').map(|s| s.to_string()));
            }
            _ => {}
        }
    }

    let symbol = match symbol {
        Some(s) if !s.is_empty() => s,
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiErrorResponse::new(
                    "MISSING_SYMBOL",
                    "symbol 파라미터가 필요합니다",
                )),
            ));
        }
    };

    Ok(SeriesRequest {
        symbol,
        interval,
        start_date,
        end_date,
        indicators: Indicator::parse_set(&indicator_names),
    })
}

/// ISO 날짜 문자열 파싱.
fn parse_date(
    name: &str,
    value: &str,
) -> Result<NaiveDate, (StatusCode, Json<ApiErrorResponse>)> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiErrorResponse::new(
                "INVALID_DATE",
                format!("{}가 올바른 날짜(YYYY-MM-DD)가 아닙니다: {}", name, value),
            )),
        )
    })
}

/// 과거 시계열 조회.
///
/// GET /historical?symbol=&interval=&start_date=&end_date=&indicators=
///
/// 제공자가 해당 구간에 데이터를 주지 않으면 빈 배열을 반환합니다 (오류 아님).
#[utoipa::path(
    get,
    path = "/historical",
    tag = "historical",
    params(
        ("symbol" = String, Query, description = "종목 심볼 (예: AAPL)"),
        ("interval" = Option<String>, Query, description = "봉 간격 (1m, 5m, 15m, 30m, 1h, 1d; 기본 1d)"),
        ("start_date" = Option<String>, Query, description = "시작 날짜 (YYYY-MM-DD)"),
        ("end_date" = Option<String>, Query, description = "종료 날짜 (YYYY-MM-DD)"),
        ("indicators" = Option<String>, Query, description = "지표 이름 (sma, ema, rsi, macd, bbands; 반복 또는 쉼표 목록)"),
    ),
    responses(
        (status = 200, description = "표준 시계열", body = Vec<SeriesRowResponse>),
        (status = 400, description = "잘못된 요청", body = ApiErrorResponse),
        (status = 502, description = "데이터 제공자 오류", body = ApiErrorResponse),
    )
)]
pub async fn get_historical(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Vec<SeriesRowResponse>>> {
    let request = parse_query(&params)?;
    let symbol = request.symbol.clone();
    let interval = request.interval;

    let rows = state.series_provider.get_series(request).await.map_err(|e| {
        error!(symbol = %symbol, error = %e, "시계열 조회 실패");
        (
            StatusCode::BAD_GATEWAY,
            Json(ApiErrorResponse::new(
                "DATA_FETCH_ERROR",
                format!("차트 데이터 조회 실패: {}", e),
            )),
        )
    })?;

    info!(symbol = %symbol, interval = %interval, rows = rows.len(), "시계열 응답");

    Ok(Json(
        rows.iter()
            .map(|row| SeriesRowResponse::from_row(row, interval))
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    use crate::state::test_support::{test_state, StubProvider};

    fn app(provider: StubProvider) -> Router {
        Router::new()
            .route("/historical", get(get_historical))
            .with_state(test_state(provider))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_historical_returns_rows_with_indicator_columns() {
        let response = app(StubProvider::with_daily_bars(20))
            .oneshot(
                Request::builder()
                    .uri("/historical?symbol=AAPL&indicators=sma&indicators=rsi")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let rows = json.as_array().unwrap();

        assert_eq!(rows.len(), 20);
        assert_eq!(rows[0]["date"], "2024-01-01");
        // 선행 구간의 지표 값은 null이지만 컬럼은 존재한다
        assert!(rows[0].get("SMA").is_some());
        assert!(rows[0]["SMA"].is_null());
        assert!(rows[19]["SMA"].is_number());
        assert!(rows[0].get("RSI").is_some());
    }

    #[tokio::test]
    async fn test_historical_unknown_ticker_returns_empty_array() {
        let response = app(StubProvider::empty())
            .oneshot(
                Request::builder()
                    .uri("/historical?symbol=UNKNOWNTICKER")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_historical_missing_symbol_is_bad_request() {
        let response = app(StubProvider::with_daily_bars(5))
            .oneshot(
                Request::builder()
                    .uri("/historical?interval=1d")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "MISSING_SYMBOL");
    }

    #[tokio::test]
    async fn test_historical_invalid_date_is_bad_request() {
        let response = app(StubProvider::with_daily_bars(5))
            .oneshot(
                Request::builder()
                    .uri("/historical?symbol=AAPL&start_date=01-02-2024")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "INVALID_DATE");
    }

    #[tokio::test]
    async fn test_historical_provider_failure_is_bad_gateway() {
        let response = app(StubProvider::failing())
            .oneshot(
                Request::builder()
                    .uri("/historical?symbol=AAPL")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["code"], "DATA_FETCH_ERROR");
    }

    #[tokio::test]
    async fn test_historical_unknown_indicator_names_ignored() {
        let response = app(StubProvider::with_daily_bars(5))
            .oneshot(
                Request::builder()
                    .uri("/historical?symbol=AAPL&indicators=vwap,sma")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let rows = json.as_array().unwrap();
        assert!(rows[0].get("SMA").is_some());
        assert!(rows[0].get("VWAP").is_none());
    }
}
