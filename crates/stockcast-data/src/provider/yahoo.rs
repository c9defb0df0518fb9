//! Yahoo Finance 데이터 제공자.
//!
//! chart API로 봉 데이터를, quoteSummary API로 종목 메타데이터를 조회합니다.
//! 원시 봉 행의 날짜 컬럼 이름은 제공자 관례대로 간격에 따라 달라집니다
//! (일봉 `Date`, 분/시간봉 `Datetime`).

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use stockcast_core::Interval;
use tracing::debug;

use crate::error::{DataError, Result};
use crate::provider::{MarketDataProvider, RawRow, StockFinancials, StockInfo};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo Finance Provider.
pub struct YahooFinanceProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooFinanceProvider {
    /// 새로운 Provider 생성.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// base URL을 지정하여 생성 (테스트용).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0")
            .build()
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// chart API 응답을 원시 행으로 변환합니다.
    fn rows_from_chart(result: ChartResult, interval: Interval) -> Vec<RawRow> {
        let timestamps = result.timestamp.unwrap_or_default();
        let quote = match result.indicators.quote.into_iter().next() {
            Some(q) => q,
            None => return Vec::new(),
        };

        let date_column = if interval.is_intraday() { "Datetime" } else { "Date" };
        let date_format = if interval.is_intraday() {
            "%Y-%m-%d %H:%M:%S"
        } else {
            "%Y-%m-%d"
        };

        let mut rows = Vec::with_capacity(timestamps.len());
        for (i, ts) in timestamps.iter().enumerate() {
            // 종가가 없는 봉(휴장 등)은 건너뛴다
            let close = match quote.close.get(i).copied().flatten() {
                Some(v) => v,
                None => continue,
            };
            let datetime: DateTime<Utc> = match Utc.timestamp_opt(*ts, 0).single() {
                Some(dt) => dt,
                None => continue,
            };

            let mut row = Map::new();
            row.insert(
                date_column.to_string(),
                Value::String(datetime.format(date_format).to_string()),
            );
            row.insert("Open".to_string(), json!(quote.open.get(i).copied().flatten()));
            row.insert("High".to_string(), json!(quote.high.get(i).copied().flatten()));
            row.insert("Low".to_string(), json!(quote.low.get(i).copied().flatten()));
            row.insert("Close".to_string(), json!(close));
            row.insert(
                "Volume".to_string(),
                json!(quote.volume.get(i).copied().flatten()),
            );
            rows.push(row);
        }

        rows
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn fetch_bars(
        &self,
        symbol: &str,
        interval: Interval,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawRow>> {
        let period1 = start.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
        // end 날짜를 포함하기 위해 하루를 더한다
        let period2 = (end + Duration::days(1))
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp();

        let url = format!(
            "{}/v8/finance/chart/{}?interval={}&period1={}&period2={}",
            self.base_url,
            symbol,
            interval.as_str(),
            period1,
            period2
        );

        debug!(symbol = symbol, interval = %interval, start = %start, end = %end, "Yahoo chart API 호출");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed: ChartResponse = serde_json::from_str(&body).map_err(|_| {
            DataError::FetchError(format!("chart API 응답 해석 실패 ({}): HTTP {}", symbol, status))
        })?;

        if let Some(error) = parsed.chart.error {
            return Err(DataError::FetchError(format!(
                "Yahoo Finance API 오류 ({}): {}",
                symbol,
                error.description.or(error.code).unwrap_or_default()
            )));
        }

        let rows = parsed
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .map(|r| Self::rows_from_chart(r, interval))
            .unwrap_or_default();

        debug!(symbol = symbol, count = rows.len(), "봉 데이터 조회 완료");
        Ok(rows)
    }

    async fn fetch_stock_info(&self, symbol: &str) -> Result<StockInfo> {
        let url = format!(
            "{}/v10/finance/quoteSummary/{}?modules=assetProfile,price,summaryDetail,financialData",
            self.base_url, symbol
        );

        debug!(symbol = symbol, "Yahoo quoteSummary API 호출");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed: QuoteSummaryResponse = serde_json::from_str(&body).map_err(|_| {
            DataError::FetchError(format!(
                "quoteSummary 응답 해석 실패 ({}): HTTP {}",
                symbol, status
            ))
        })?;

        if let Some(error) = parsed.quote_summary.error {
            return Err(DataError::FetchError(format!(
                "Yahoo Finance API 오류 ({}): {}",
                symbol,
                error.description.or(error.code).unwrap_or_default()
            )));
        }

        let result = parsed
            .quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| {
                DataError::FetchError(format!("종목 정보 없음: {}", symbol))
            })?;

        let profile = result.asset_profile.unwrap_or_default();
        let price = result.price.unwrap_or_default();
        let summary = result.summary_detail.unwrap_or_default();
        let financial = result.financial_data.unwrap_or_default();

        Ok(StockInfo {
            name: price.long_name.or(price.short_name),
            sector: profile.sector,
            website: profile.website,
            financials: StockFinancials {
                market_cap: raw(&price.market_cap).or(raw(&summary.market_cap)),
                ebitda: raw(&financial.ebitda),
                pe_ratio: raw(&summary.trailing_pe),
                close: raw(&price.regular_market_previous_close)
                    .or(raw(&summary.previous_close)),
                open: raw(&summary.open),
                high: raw(&summary.day_high),
                low: raw(&summary.day_low),
                volume: raw(&summary.volume),
                pct_change: raw(&price.regular_market_change_percent),
            },
        })
    }
}

/// 값 래퍼에서 숫자를 꺼냅니다.
fn raw(value: &Option<RawNum>) -> Option<f64> {
    value.as_ref().and_then(|v| v.raw)
}

// ==================== chart API 응답 타입 ====================

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteBlock {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

// ==================== quoteSummary API 응답 타입 ====================

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    result: Option<Vec<QuoteSummaryResult>>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct QuoteSummaryResult {
    asset_profile: Option<AssetProfile>,
    price: Option<PriceModule>,
    summary_detail: Option<SummaryDetail>,
    financial_data: Option<FinancialData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AssetProfile {
    sector: Option<String>,
    website: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PriceModule {
    long_name: Option<String>,
    short_name: Option<String>,
    market_cap: Option<RawNum>,
    regular_market_previous_close: Option<RawNum>,
    regular_market_change_percent: Option<RawNum>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SummaryDetail {
    market_cap: Option<RawNum>,
    previous_close: Option<RawNum>,
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawNum>,
    open: Option<RawNum>,
    day_high: Option<RawNum>,
    day_low: Option<RawNum>,
    volume: Option<RawNum>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FinancialData {
    ebitda: Option<RawNum>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawNum {
    raw: Option<f64>,
}
