//! 시장 데이터 제공자.
//!
//! 외부 데이터 제공자는 trait 뒤에 숨겨진 협력자입니다. 제공자는
//! 원시 테이블 행을 반환하고, 표준 스키마로의 변환은 정규화기의 몫입니다.

pub mod yahoo;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use stockcast_core::Interval;

use crate::error::Result;

/// 데이터 제공자가 반환하는 원시 테이블 행.
///
/// 컬럼 이름은 제공자 관례를 따릅니다. 날짜 컬럼 이름은 간격에 따라
/// 달라집니다 (일봉 `Date`, 분/시간봉 `Datetime`).
pub type RawRow = serde_json::Map<String, serde_json::Value>;

/// 종목 재무 요약.
///
/// 제공자가 값을 주지 않는 필드는 null로 남습니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockFinancials {
    /// 시가총액
    pub market_cap: Option<f64>,
    /// EBITDA
    pub ebitda: Option<f64>,
    /// 주가수익비율 (trailing P/E)
    pub pe_ratio: Option<f64>,
    /// 전일 종가
    pub close: Option<f64>,
    /// 당일 시가
    pub open: Option<f64>,
    /// 당일 고가
    pub high: Option<f64>,
    /// 당일 저가
    pub low: Option<f64>,
    /// 당일 거래량
    pub volume: Option<f64>,
    /// 등락률
    pub pct_change: Option<f64>,
}

/// 종목 메타데이터.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockInfo {
    /// 회사명
    pub name: Option<String>,
    /// 섹터
    pub sector: Option<String>,
    /// 웹사이트
    pub website: Option<String>,
    /// 재무 요약
    pub financials: StockFinancials,
}

/// 시장 데이터 제공자 trait.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Provider 이름.
    fn name(&self) -> &str;

    /// 지정한 기간의 원시 봉 데이터를 조회합니다.
    ///
    /// 심볼이 유효하지만 기간에 데이터가 없으면 빈 벡터를 반환합니다.
    /// 네트워크 실패나 제공자가 보고한 오류는 `DataError::FetchError`입니다.
    async fn fetch_bars(
        &self,
        symbol: &str,
        interval: Interval,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawRow>>;

    /// 종목 메타데이터를 조회합니다.
    async fn fetch_stock_info(&self, symbol: &str) -> Result<StockInfo>;
}
