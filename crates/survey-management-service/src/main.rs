//! 问卷管理服务
//!
//! 加载配置、初始化日志、连接数据库并应用迁移。

use anyhow::Result;
use survey_shared::{config::AppConfig, database::Database, observability};
use tracing::{info, warn};

use survey_management::MIGRATOR;

const SERVICE_NAME: &str = "survey-management-service";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 1. 加载配置，失败时使用默认值（日志初始化之后再报告）
    let (config, load_error) = match AppConfig::load(SERVICE_NAME) {
        Ok(config) => (config, None),
        Err(e) => {
            let config = AppConfig {
                service_name: SERVICE_NAME.to_string(),
                ..AppConfig::default()
            };
            (config, Some(e))
        }
    };

    // 2. 初始化日志
    let _guard = observability::init(&config.service_name, &config.observability)?;
    if let Some(e) = load_error {
        warn!(code = e.code(), error = %e, "Failed to load config, using defaults");
    }

    info!("Starting {}...", SERVICE_NAME);
    info!(environment = %config.environment, "Configuration loaded");

    // 3. 初始化数据库连接
    let db = Database::connect(&config.database).await?;
    info!("Database connection established");

    // 4. 应用迁移
    let schema_version = if config.survey.run_migrations {
        db.run_migrations(&MIGRATOR).await?
    } else {
        db.schema_version().await?
    };
    info!(schema_version = ?schema_version, "Database schema ready");

    db.health_check().await?;
    info!("Database health check passed");

    db.close().await;
    info!("{} finished", SERVICE_NAME);

    Ok(())
}
