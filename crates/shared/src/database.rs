//! 问卷库连接
//!
//! 启动阶段的连接带指数退避重试，迁移完成后可读取当前 schema 版本。

use crate::config::DatabaseConfig;
use crate::error::{InfraError, Result};
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// 退避时间上限
const MAX_RETRY_DELAY: Duration = Duration::from_secs(10);

/// 第 attempt 次重试前的等待时间（attempt 从 0 开始），每次翻倍，不超过上限
pub fn retry_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
        .min(MAX_RETRY_DELAY)
}

/// 问卷库连接池
///
/// 仓储层只接收 `PgPool`，由调用方显式注入，不存在进程级全局句柄
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// 创建连接池
    ///
    /// 数据库尚未就绪（连接超时、IO 错误）时按 `connect_retries` 重试，其他错误直接返回
    #[instrument(skip(config), fields(retries = config.connect_retries))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let base = Duration::from_millis(config.retry_backoff_ms);
        let mut attempt: u32 = 0;

        loop {
            info!(attempt, "Connecting to survey database...");
            match Self::try_connect(config).await {
                Ok(pool) => {
                    info!(attempt, "Database connection pool created");
                    return Ok(Self { pool });
                }
                Err(err) if err.is_retryable() && attempt < config.connect_retries => {
                    let delay = retry_delay(base, attempt);
                    warn!(
                        attempt,
                        code = err.code(),
                        error = %err,
                        delay_ms = delay.as_millis() as u64,
                        "Database not ready, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    warn!(attempt, code = err.code(), error = %err, "Database connection failed");
                    return Err(err);
                }
            }
        }
    }

    async fn try_connect(config: &DatabaseConfig) -> Result<PgPool> {
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(InfraError::from)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 健康检查
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(InfraError::from)
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection pool closed");
    }

    /// 应用迁移并返回迁移后的 schema 版本
    ///
    /// migrate! 宏在编译期确定目录，Migrator 由服务 crate 提供
    #[instrument(skip(self, migrator))]
    pub async fn run_migrations(&self, migrator: &Migrator) -> Result<Option<i64>> {
        info!("Running database migrations...");
        migrator.run(&self.pool).await?;

        let version = self.schema_version().await?;
        info!(version = ?version, "Database migrations applied");
        Ok(version)
    }

    /// 已成功应用的最新迁移版本，迁移表不存在时为 None
    pub async fn schema_version(&self) -> Result<Option<i64>> {
        let table = sqlx::query_scalar::<_, Option<String>>(
            "SELECT to_regclass('_sqlx_migrations')::text",
        )
        .fetch_one(&self.pool)
        .await?;
        if table.is_none() {
            return Ok(None);
        }

        let version = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT MAX(version) FROM _sqlx_migrations WHERE success",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(version)
    }
}
