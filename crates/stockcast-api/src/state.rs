//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 프로세스 수명 동안 한 번 초기화되어 Arc로 래핑된 채
//! 모든 요청 핸들러에 주입됩니다. 전역 가변 상태는 없습니다.

use std::sync::Arc;

use stockcast_analytics::ForecastAdapter;
use stockcast_data::{CachedSeriesProvider, MarketDataProvider, RedisCache};

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 캐시 우선 시계열 제공자
    pub series_provider: Arc<CachedSeriesProvider>,

    /// 외부 시장 데이터 제공자 (종목 메타데이터 조회용)
    pub market_provider: Arc<dyn MarketDataProvider>,

    /// Redis 캐시 (헬스 체크용; None이면 캐시 없이 동작)
    pub cache: Option<RedisCache>,

    /// 예측 어댑터
    pub forecaster: Arc<ForecastAdapter>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    ///
    /// # 인자
    /// * `market_provider` - 외부 데이터 제공자
    /// * `cache` - Redis 캐시 (연결 실패 시 None으로 강등)
    pub fn new(market_provider: Arc<dyn MarketDataProvider>, cache: Option<RedisCache>) -> Self {
        let series_provider = Arc::new(CachedSeriesProvider::new(
            market_provider.clone(),
            cache.clone(),
        ));

        Self {
            series_provider,
            market_provider,
            cache,
            forecaster: Arc::new(ForecastAdapter::new()),
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 캐시 연결 여부.
    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }
}

// ==================== 테스트 지원 ====================

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::json;
    use stockcast_core::Interval;
    use stockcast_data::{DataError, RawRow, StockFinancials, StockInfo};

    /// 고정 응답을 돌려주는 테스트 제공자.
    pub struct StubProvider {
        pub bars: Vec<RawRow>,
        pub info: StockInfo,
        pub fail_fetch: bool,
    }

    impl StubProvider {
        /// 2024-01-01부터 하루 간격의 일봉 `count`개.
        pub fn with_daily_bars(count: usize) -> Self {
            let bars = (0..count)
                .map(|i| {
                    let mut row = RawRow::new();
                    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                        + chrono::Days::new(i as u64);
                    row.insert("Date".to_string(), json!(date.format("%Y-%m-%d").to_string()));
                    row.insert("Open".to_string(), json!(100.0 + i as f64));
                    row.insert("High".to_string(), json!(101.0 + i as f64));
                    row.insert("Low".to_string(), json!(99.0 + i as f64));
                    row.insert("Close".to_string(), json!(100.5 + i as f64));
                    row.insert("Volume".to_string(), json!(1000.0));
                    row
                })
                .collect();

            Self {
                bars,
                info: sample_info(),
                fail_fetch: false,
            }
        }

        pub fn empty() -> Self {
            Self {
                bars: Vec::new(),
                info: sample_info(),
                fail_fetch: false,
            }
        }

        pub fn failing() -> Self {
            Self {
                bars: Vec::new(),
                info: sample_info(),
                fail_fetch: true,
            }
        }
    }

    fn sample_info() -> StockInfo {
        StockInfo {
            name: Some("Apple Inc.".to_string()),
            sector: Some("Technology".to_string()),
            website: Some("https://www.apple.com".to_string()),
            financials: StockFinancials {
                market_cap: Some(3.0e12),
                pe_ratio: Some(29.4),
                ..StockFinancials::default()
            },
        }
    }

    #[async_trait]
    impl MarketDataProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn fetch_bars(
            &self,
            _symbol: &str,
            _interval: Interval,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> stockcast_data::Result<Vec<RawRow>> {
            if self.fail_fetch {
                return Err(DataError::FetchError("stub failure".to_string()));
            }
            Ok(self.bars.clone())
        }

        async fn fetch_stock_info(&self, _symbol: &str) -> stockcast_data::Result<StockInfo> {
            if self.fail_fetch {
                return Err(DataError::FetchError("stub failure".to_string()));
            }
            Ok(self.info.clone())
        }
    }

    /// 테스트용 AppState 생성.
    pub fn test_state(provider: StubProvider) -> Arc<AppState> {
        Arc::new(AppState::new(Arc::new(provider), None))
    }
}
