//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `GET /historical` - 과거 시계열 조회 (지표 포함 가능)
//! - `POST /forecast` - 단기 종가 예측
//! - `GET /stock-info` - 종목 메타데이터 조회
//! - `GET /health` - 헬스 체크 (liveness)
//! - `GET /health/ready` - 상세 헬스 체크 (readiness)

pub mod forecast;
pub mod health;
pub mod historical;
pub mod stock_info;

pub use forecast::{ForecastRequest, ForecastRowResponse};
pub use health::{ComponentHealth, ComponentStatus, HealthResponse};
pub use historical::SeriesRowResponse;
pub use stock_info::{FinancialsResponse, StockInfoResponse};

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/historical", get(historical::get_historical))
        .route("/forecast", post(forecast::post_forecast))
        .route("/stock-info", get(stock_info::get_stock_info))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::health_ready))
}
