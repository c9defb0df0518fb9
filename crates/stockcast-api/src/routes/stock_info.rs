//! 종목 메타데이터 endpoint.
//!
//! `GET /stock-info` - 회사명/섹터/웹사이트와 재무 요약을 조회합니다.
//! 제공자가 주지 않는 필드는 null입니다.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;

use stockcast_data::{StockFinancials, StockInfo};

use crate::error::{ApiErrorResponse, ApiResult};
use crate::state::AppState;

/// 종목 메타데이터 쿼리.
#[derive(Debug, Deserialize)]
pub struct StockInfoQuery {
    /// 종목 심볼
    pub symbol: String,
}

/// 재무 요약 응답.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialsResponse {
    pub market_cap: Option<f64>,
    pub ebitda: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub close: Option<f64>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub volume: Option<f64>,
    pub pct_change: Option<f64>,
}

impl From<StockFinancials> for FinancialsResponse {
    fn from(f: StockFinancials) -> Self {
        Self {
            market_cap: f.market_cap,
            ebitda: f.ebitda,
            pe_ratio: f.pe_ratio,
            close: f.close,
            open: f.open,
            high: f.high,
            low: f.low,
            volume: f.volume,
            pct_change: f.pct_change,
        }
    }
}

/// 종목 메타데이터 응답.
#[derive(Debug, Serialize, ToSchema)]
pub struct StockInfoResponse {
    pub name: Option<String>,
    pub sector: Option<String>,
    pub website: Option<String>,
    pub financials: FinancialsResponse,
}

impl From<StockInfo> for StockInfoResponse {
    fn from(info: StockInfo) -> Self {
        Self {
            name: info.name,
            sector: info.sector,
            website: info.website,
            financials: info.financials.into(),
        }
    }
}

/// 종목 메타데이터 조회.
///
/// GET /stock-info?symbol=
#[utoipa::path(
    get,
    path = "/stock-info",
    tag = "stock-info",
    params(
        ("symbol" = String, Query, description = "종목 심볼 (예: AAPL)"),
    ),
    responses(
        (status = 200, description = "종목 메타데이터", body = StockInfoResponse),
        (status = 400, description = "잘못된 요청", body = ApiErrorResponse),
        (status = 502, description = "데이터 제공자 오류", body = ApiErrorResponse),
    )
)]
pub async fn get_stock_info(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StockInfoQuery>,
) -> ApiResult<Json<StockInfoResponse>> {
    let symbol = query.symbol.trim().to_string();
    if symbol.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiErrorResponse::new(
                "MISSING_SYMBOL",
                "symbol 파라미터가 필요합니다",
            )),
        ));
    }

    let info = state.market_provider.fetch_stock_info(&symbol).await.map_err(|e| {
        error!(symbol = %symbol, error = %e, "종목 정보 조회 실패");
        (
            StatusCode::BAD_GATEWAY,
            Json(ApiErrorResponse::new(
                "DATA_FETCH_ERROR",
                format!("종목 정보 조회 실패: {}", e),
            )),
        )
    })?;

    info!(symbol = %symbol, "종목 정보 응답");

    Ok(Json(info.into()))
}
