//! 集成测试公共设置
//!
//! 连接 `DATABASE_URL` 指向的 PostgreSQL 并应用迁移，提供问卷夹具。

#![allow(dead_code)]

use chrono::{Duration, Utc};
use sqlx::PgPool;
use survey_management::{QuestionnaireInput, QuestionnaireRepository, ResSharedTo};
use survey_shared::database::Database;
use survey_shared::observability::tracing::init_for_tests;
use survey_shared::test_utils::{test_database_config, unique_title};

use survey_management::MIGRATOR;

/// 不带搜索条件的列表会扫到整张表，同一测试二进制内写问卷的用例需串行
pub static LISTING_LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

pub async fn setup() -> PgPool {
    init_for_tests();

    let db = Database::connect(&test_database_config())
        .await
        .expect("connect to test database");
    db.run_migrations(&MIGRATOR)
        .await
        .expect("apply migrations");
    db.pool().clone()
}

/// 无截止时间、仅管理员可见的问卷
pub fn questionnaire(prefix: &str) -> QuestionnaireInput {
    QuestionnaireInput {
        title: unique_title(prefix),
        description: format!("{} description", prefix),
        res_time_limit: None,
        res_shared_to: ResSharedTo::Administrators,
    }
}

/// 指定时长后截止的公开问卷，负数表示已经截止
pub fn questionnaire_due_in(prefix: &str, due_in: Duration) -> QuestionnaireInput {
    QuestionnaireInput {
        res_time_limit: Some(Utc::now() + due_in),
        res_shared_to: ResSharedTo::Public,
        ..questionnaire(prefix)
    }
}

/// 测试结束后彻底删除问卷及其关联数据
pub async fn purge_all(pool: &PgPool, ids: &[i32]) {
    let repo = QuestionnaireRepository::new(pool.clone());
    for id in ids {
        let _ = repo.purge_questionnaire(*id).await;
    }
}
