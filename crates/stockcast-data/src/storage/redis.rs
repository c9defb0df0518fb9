//! Redis cache 구현.
//!
//! 정규화된 시계열 페이로드에 대한 TTL cache 레이어를 제공하여
//! 외부 데이터 제공자 호출을 줄이고 응답 시간을 개선합니다.
//!
//! cache는 best-effort입니다. 연결 실패나 조회 실패는 호출자가 miss로
//! 취급하여 원본 데이터를 직접 조회해야 합니다.

use crate::error::{DataError, Result};
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Redis 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    /// Redis 호스트
    #[serde(default = "default_host")]
    pub host: String,
    /// Redis 포트
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "localhost".to_string()
}
fn default_port() -> u16 {
    6379
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl RedisConfig {
    /// 환경 변수에서 설정을 로드합니다 (REDIS_HOST, REDIS_PORT).
    pub fn from_env() -> Self {
        let host = std::env::var("REDIS_HOST").unwrap_or_else(|_| default_host());
        let port = std::env::var("REDIS_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or_else(default_port);

        Self { host, port }
    }

    /// Redis 연결 URL (db 0 고정).
    pub fn url(&self) -> String {
        format!("redis://{}:{}/0", self.host, self.port)
    }
}

/// Redis 연결 래퍼.
#[derive(Clone)]
pub struct RedisCache {
    connection: Arc<RwLock<MultiplexedConnection>>,
}

impl RedisCache {
    /// 새로운 Redis cache 연결을 생성합니다.
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        info!(url = %config.url(), "Connecting to Redis...");

        let client =
            Client::open(config.url()).map_err(|e| DataError::ConnectionError(e.to_string()))?;

        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        info!("Redis connection established");

        Ok(Self {
            connection: Arc::new(RwLock::new(connection)),
        })
    }

    /// Redis 상태를 확인합니다.
    pub async fn health_check(&self) -> Result<bool> {
        let mut conn = self.connection.write().await;
        let result: String = redis::cmd("PING")
            .query_async(&mut *conn)
            .await
            .map_err(|e| DataError::CacheError(e.to_string()))?;

        Ok(result == "PONG")
    }

    /// cache에서 값을 가져옵니다.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut conn = self.connection.write().await;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| DataError::CacheError(e.to_string()))?;

        match value {
            Some(json) => {
                let parsed = serde_json::from_str(&json)
                    .map_err(|e| DataError::SerializationError(e.to_string()))?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// 지정한 TTL로 cache에 값을 설정합니다.
    pub async fn set_with_ttl<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: u64,
    ) -> Result<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| DataError::SerializationError(e.to_string()))?;

        let mut conn = self.connection.write().await;
        let _: () = conn
            .set_ex(key, json, ttl_secs)
            .await
            .map_err(|e| DataError::CacheError(e.to_string()))?;

        Ok(())
    }
}
