//! 캐시 우선 시계열 제공자.
//!
//! 요청 파라미터를 해석하고, 캐시 조회 → (miss 시) 제공자 조회 → 정규화 →
//! 지표 추가 → 캐시 저장 순으로 표준 시계열을 만드는 orchestrator입니다.
//!
//! # 동작 흐름
//!
//! ```text
//! 요청 (symbol, interval, start?, end?, indicators)
//!         │
//!         ▼
//! 1. 날짜 해석 (없으면 interval별 기본 조회 기간)
//! 2. 캐시 키 생성 (지표 집합 포함)
//! 3. 캐시 조회 ── hit ──▶ 역직렬화 후 반환
//!         │ miss / 캐시 장애
//!         ▼
//! 4. 제공자 조회 → 정규화 → 지표 추가
//! 5. 캐시 저장 (TTL 5분, best-effort)
//! ```
//!
//! 캐시 장애는 miss로 강등되어 절대 요청을 실패시키지 않습니다.
//! 제공자가 빈 결과를 주면 빈 시계열이 정상 결과로 반환됩니다.

use chrono::{DateTime, Days, NaiveDate, Utc};
use std::sync::Arc;
use stockcast_analytics::augment_series;
use stockcast_core::{Indicator, Interval, SeriesRow};
use tracing::{debug, info, warn};

use crate::cache::key::series_key;
use crate::error::Result;
use crate::normalize::normalize_rows;
use crate::provider::MarketDataProvider;
use crate::storage::redis::RedisCache;

/// 시계열 캐시 항목의 고정 TTL (5분).
pub const SERIES_CACHE_TTL_SECS: u64 = 300;

/// 시계열 조회 요청.
///
/// 요청 경계에서 한 번 만들어지는 타입이며, 기본값 적용(날짜 해석,
/// 지표 집합 정규화)은 `resolve`에서 일어납니다.
#[derive(Debug, Clone)]
pub struct SeriesRequest {
    /// 종목 심볼
    pub symbol: String,
    /// 봉 간격
    pub interval: Interval,
    /// 시작 날짜 (없으면 interval별 기본 조회 기간)
    pub start_date: Option<NaiveDate>,
    /// 종료 날짜 (없으면 현재 시간)
    pub end_date: Option<NaiveDate>,
    /// 요청 지표
    pub indicators: Vec<Indicator>,
}

impl SeriesRequest {
    /// 날짜 기본값을 적용하고 지표 집합을 정규화합니다.
    ///
    /// `now`는 테스트 가능성을 위해 주입합니다.
    pub fn resolve(self, now: DateTime<Utc>) -> ResolvedSeriesRequest {
        let end = self.end_date.unwrap_or_else(|| now.date_naive());
        let start = self
            .start_date
            .unwrap_or_else(|| end - Days::new(self.interval.lookback_days()));

        let mut indicators = self.indicators;
        indicators.sort_unstable();
        indicators.dedup();

        ResolvedSeriesRequest {
            symbol: self.symbol,
            interval: self.interval,
            start,
            end,
            indicators,
        }
    }
}

/// 날짜와 지표 집합이 확정된 요청.
#[derive(Debug, Clone)]
pub struct ResolvedSeriesRequest {
    pub symbol: String,
    pub interval: Interval,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub indicators: Vec<Indicator>,
}

impl ResolvedSeriesRequest {
    /// 이 요청의 캐시 키.
    pub fn cache_key(&self) -> String {
        series_key(
            &self.symbol,
            self.interval,
            self.start,
            self.end,
            &self.indicators,
        )
    }
}

/// 캐시 우선 시계열 제공자.
pub struct CachedSeriesProvider {
    provider: Arc<dyn MarketDataProvider>,
    cache: Option<RedisCache>,
}

impl CachedSeriesProvider {
    /// 새로운 제공자 생성.
    ///
    /// `cache`가 None이면 모든 요청이 제공자로 직접 갑니다.
    pub fn new(provider: Arc<dyn MarketDataProvider>, cache: Option<RedisCache>) -> Self {
        Self { provider, cache }
    }

    /// 시계열 조회 (캐시 우선).
    pub async fn get_series(&self, request: SeriesRequest) -> Result<Vec<SeriesRow>> {
        let resolved = request.resolve(Utc::now());
        self.get_series_resolved(&resolved).await
    }

    /// 확정된 요청으로 시계열 조회.
    pub async fn get_series_resolved(
        &self,
        request: &ResolvedSeriesRequest,
    ) -> Result<Vec<SeriesRow>> {
        let key = request.cache_key();

        // 1. 캐시 조회 (best-effort: 장애는 miss로 강등)
        if let Some(cache) = &self.cache {
            match cache.get::<Vec<SeriesRow>>(&key).await {
                Ok(Some(rows)) => {
                    debug!(key = %key, rows = rows.len(), "캐시 hit");
                    return Ok(rows);
                }
                Ok(None) => {
                    debug!(key = %key, "캐시 miss");
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "캐시 조회 실패, 제공자 직접 조회");
                }
            }
        }

        // 2. 제공자 조회
        let raw = self
            .provider
            .fetch_bars(&request.symbol, request.interval, request.start, request.end)
            .await?;

        if raw.is_empty() {
            // 빈 시계열은 오류가 아니다 (없는 심볼, 휴장 구간 등)
            info!(symbol = %request.symbol, start = %request.start, end = %request.end, "조회 구간에 데이터 없음");
            return Ok(Vec::new());
        }

        // 3. 정규화 + 지표 추가
        let mut rows = normalize_rows(&raw)?;
        augment_series(&mut rows, &request.indicators);

        // 4. 캐시 저장 (best-effort)
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set_with_ttl(&key, &rows, SERIES_CACHE_TTL_SECS).await {
                warn!(key = %key, error = %e, "캐시 저장 실패, 응답은 정상 반환");
            }
        }

        info!(
            symbol = %request.symbol,
            interval = %request.interval,
            rows = rows.len(),
            indicators = request.indicators.len(),
            "시계열 조회 완료"
        );

        Ok(rows)
    }
}
