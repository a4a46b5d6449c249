//! 管理员仓储
//!
//! 管理员与问卷是多对多关系，通配用户作为管理员时所有人都可管理该问卷

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, instrument};

use super::traits::AdministratorRepositoryTrait;
use crate::error::Result;
use crate::models::WILDCARD_USER;

/// 管理员仓储
pub struct AdministratorRepository {
    pool: PgPool,
}

impl AdministratorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 批量添加管理员
    ///
    /// 整批在一个事务内写入，任意一行失败则全部回滚
    #[instrument(skip(self, users), fields(count = users.len()))]
    pub async fn insert_administrators(&self, questionnaire_id: i32, users: &[String]) -> Result<()> {
        if users.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for user in users {
            sqlx::query(
                r#"
                INSERT INTO administrators (questionnaire_id, user_traqid)
                VALUES ($1, $2)
                "#,
            )
            .bind(questionnaire_id)
            .bind(user)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        info!(questionnaire_id, count = users.len(), "Administrators inserted");
        Ok(())
    }

    /// 删除问卷的全部管理员
    #[instrument(skip(self))]
    pub async fn delete_administrators(&self, questionnaire_id: i32) -> Result<()> {
        sqlx::query("DELETE FROM administrators WHERE questionnaire_id = $1")
            .bind(questionnaire_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// 获取问卷的管理员列表
    pub async fn get_administrators(&self, questionnaire_id: i32) -> Result<Vec<String>> {
        let users = sqlx::query_scalar::<_, String>(
            r#"
            SELECT user_traqid
            FROM administrators
            WHERE questionnaire_id = $1
            ORDER BY user_traqid ASC
            "#,
        )
        .bind(questionnaire_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// 获取用户可管理的问卷 ID（包含通配管理员的问卷）
    pub async fn get_admin_questionnaire_ids(&self, user_id: &str) -> Result<Vec<i32>> {
        let ids = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT DISTINCT questionnaire_id
            FROM administrators
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

    /// 判断用户是否为问卷管理员
    pub async fn check_questionnaire_admin(
        &self,
        user_id: &str,
        questionnaire_id: i32,
    ) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM administrators
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
impl AdministratorRepositoryTrait for AdministratorRepository {
    async fn insert_administrators(&self, questionnaire_id: i32, users: &[String]) -> Result<()> {
        self.insert_administrators(questionnaire_id, users).await
    }

    async fn delete_administrators(&self, questionnaire_id: i32) -> Result<()> {
        self.delete_administrators(questionnaire_id).await
    }

    async fn get_administrators(&self, questionnaire_id: i32) -> Result<Vec<String>> {
        self.get_administrators(questionnaire_id).await
    }

    async fn get_admin_questionnaire_ids(&self, user_id: &str) -> Result<Vec<i32>> {
        self.get_admin_questionnaire_ids(user_id).await
    }

    async fn check_questionnaire_admin(
        &self,
        user_id: &str,
        questionnaire_id: i32,
    ) -> Result<bool> {
        self.check_questionnaire_admin(user_id, questionnaire_id)
            .await
    }
}
