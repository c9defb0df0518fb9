//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiErrorResponse;
use crate::routes::{
    ComponentHealth, ComponentStatus, FinancialsResponse, ForecastRequest, ForecastRowResponse,
    HealthResponse, SeriesRowResponse, StockInfoResponse,
};

/// Stockcast API 문서.
///
/// 모든 엔드포인트와 스키마를 포함하는 OpenAPI 3.0 스펙입니다.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stockcast API",
        version = "0.1.0",
        description = r#"
# Stockcast 시세 조회/예측 REST API

과거 시계열 조회, 단기 종가 예측, 종목 메타데이터 조회를 제공합니다.

## 주요 기능

- **과거 시계열**: Yahoo Finance 데이터 + 기술적 지표 (SMA, EMA, RSI, MACD, Bollinger)
- **예측**: Holt 선형 추세 모델 기반 단기 종가 예측
- **캐싱**: 동일 요청 파라미터는 5분간 Redis에 캐시
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
    ),
    servers(
        (url = "http://localhost:5000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "historical", description = "과거 시계열 조회"),
        (name = "forecast", description = "단기 종가 예측"),
        (name = "stock-info", description = "종목 메타데이터"),
    ),
    components(
        schemas(
            ApiErrorResponse,
            SeriesRowResponse,
            ForecastRequest,
            ForecastRowResponse,
            StockInfoResponse,
            FinancialsResponse,
            HealthResponse,
            ComponentHealth,
            ComponentStatus,
        )
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,
        crate::routes::historical::get_historical,
        crate::routes::forecast::post_forecast,
        crate::routes::stock_info::get_stock_info,
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// 다음 경로에 문서 UI를 마운트합니다:
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
