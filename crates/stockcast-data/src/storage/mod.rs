//! 저장소 계층.

pub mod redis;
