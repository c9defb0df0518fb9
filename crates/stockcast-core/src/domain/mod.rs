//! 도메인 모델.

pub mod series;

pub use series::{closes, SeriesRow};
