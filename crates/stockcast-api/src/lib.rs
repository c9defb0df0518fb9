//! 시세 조회/예측 REST API 서버.
//!
//! Axum 기반 REST API를 제공합니다:
//! - `GET /historical` - 과거 시계열 조회 (지표 포함 가능)
//! - `POST /forecast` - 단기 종가 예측
//! - `GET /stock-info` - 종목 메타데이터 조회
//! - `GET /health`, `GET /health/ready` - 헬스 체크

pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;
