//! 回答对象仓储

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, instrument};

use super::traits::TargetRepositoryTrait;
use crate::error::Result;
use crate::models::WILDCARD_USER;

/// 回答对象仓储
///
/// 通配用户作为回答对象时表示问卷面向所有人
pub struct TargetRepository {
    pool: PgPool,
}

impl TargetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 批量添加回答对象，整批在一个事务内写入
    #[instrument(skip(self, users), fields(count = users.len()))]
    pub async fn insert_targets(&self, questionnaire_id: i32, users: &[String]) -> Result<()> {
        if users.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for user in users {
            sqlx::query(
                r#"
                INSERT INTO targets (questionnaire_id, user_traqid)
                VALUES ($1, $2)
                "#,
            )
            .bind(questionnaire_id)
            .bind(user)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        info!(questionnaire_id, count = users.len(), "Targets inserted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_targets(&self, questionnaire_id: i32) -> Result<()> {
        sqlx::query("DELETE FROM targets WHERE questionnaire_id = $1")
            .bind(questionnaire_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn get_targets(&self, questionnaire_id: i32) -> Result<Vec<String>> {
        let users = sqlx::query_scalar::<_, String>(
            r#"
            SELECT user_traqid
            FROM targets
            WHERE questionnaire_id = $1
            ORDER BY user_traqid ASC
            "#,
        )
        .bind(questionnaire_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// 获取以该用户（或通配用户）为回答对象的问卷 ID
    pub async fn get_targeted_questionnaire_ids(&self, user_id: &str) -> Result<Vec<i32>> {
        let ids = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT DISTINCT questionnaire_id
            FROM targets
            WHERE user_traqid IN ($1, $2)
            ORDER BY questionnaire_id ASC
            "#,
        )
        .bind(user_id)
        .bind(WILDCARD_USER)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    pub async fn check_target(&self, user_id: &str, questionnaire_id: i32) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM targets
                WHERE questionnaire_id = $1 AND user_traqid IN ($2, $3)
            )
            "#,
        )
        .bind(questionnaire_id)
        .bind(user_id)
        .bind(WILDCARD_USER)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

#[async_trait]
impl TargetRepositoryTrait for TargetRepository {
    async fn insert_targets(&self, questionnaire_id: i32, users: &[String]) -> Result<()> {
        self.insert_targets(questionnaire_id, users).await
    }

    async fn delete_targets(&self, questionnaire_id: i32) -> Result<()> {
        self.delete_targets(questionnaire_id).await
    }

    async fn get_targets(&self, questionnaire_id: i32) -> Result<Vec<String>> {
        self.get_targets(questionnaire_id).await
    }

    async fn get_targeted_questionnaire_ids(&self, user_id: &str) -> Result<Vec<i32>> {
        self.get_targeted_questionnaire_ids(user_id).await
    }

    async fn check_target(&self, user_id: &str, questionnaire_id: i32) -> Result<bool> {
        self.check_target(user_id, questionnaire_id).await
    }
}
