//! 迁移与 schema 版本集成测试

use survey_management::MIGRATOR;
use survey_shared::database::Database;
use survey_shared::observability::tracing::init_for_tests;
use survey_shared::test_utils::test_database_config;

#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_migrations_report_latest_version() {
    init_for_tests();
    let db = Database::connect(&test_database_config()).await.unwrap();

    let latest = MIGRATOR.iter().map(|m| m.version).max();
    assert!(latest.is_some());

    assert_eq!(db.run_migrations(&MIGRATOR).await.unwrap(), latest);
    // 重复执行不改变版本
    assert_eq!(db.run_migrations(&MIGRATOR).await.unwrap(), latest);
    assert_eq!(db.schema_version().await.unwrap(), latest);

    db.health_check().await.unwrap();
    db.close().await;
}
