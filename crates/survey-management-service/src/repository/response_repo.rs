//! 回答内容仓储

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, instrument};

use super::traits::ResponseRepositoryTrait;
use crate::error::Result;
use crate::models::{Response, ResponseBody, ResponseMeta};

/// 回答内容仓储
pub struct ResponseRepository {
    pool: PgPool,
}

impl ResponseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 批量写入回答
    ///
    /// 整批在一个事务内写入；response_id 不存在时外键失败，不留下任何行
    #[instrument(skip(self, metas), fields(count = metas.len()))]
    pub async fn insert_responses(&self, response_id: i32, metas: &[ResponseMeta]) -> Result<()> {
        if metas.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for meta in metas {
            sqlx::query(
                r#"
                INSERT INTO responses (response_id, question_id, body)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(response_id)
            .bind(meta.question_id)
            .bind(&meta.data)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        info!(response_id, count = metas.len(), "Responses inserted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_responses(&self, response_id: i32) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE responses
            SET deleted_at = NOW()
            WHERE response_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(response_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_responses(&self, response_id: i32) -> Result<Vec<Response>> {
        let responses = sqlx::query_as::<_, Response>(
            r#"
            SELECT response_id, question_id, body, modified_at, deleted_at
            FROM responses
            WHERE response_id = $1 AND deleted_at IS NULL
            ORDER BY question_id ASC
            "#,
        )
        .bind(response_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(responses)
    }

    /// 获取回答内容及问题类型，按问题顺序排列
    pub async fn get_response_bodies(&self, response_id: i32) -> Result<Vec<ResponseBody>> {
        let bodies = sqlx::query_as::<_, ResponseBody>(
            r#"
            SELECT r.question_id, q.type, r.body
            FROM responses r
            INNER JOIN questions q ON q.id = r.question_id
            WHERE r.response_id = $1
              AND r.deleted_at IS NULL
              AND q.deleted_at IS NULL
            ORDER BY q.page_num ASC, q.question_num ASC
            "#,
        )
        .bind(response_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bodies)
    }
}

#[async_trait]
impl ResponseRepositoryTrait for ResponseRepository {
    async fn insert_responses(&self, response_id: i32, metas: &[ResponseMeta]) -> Result<()> {
        self.insert_responses(response_id, metas).await
    }

    async fn delete_responses(&self, response_id: i32) -> Result<()> {
        self.delete_responses(response_id).await
    }

    async fn get_responses(&self, response_id: i32) -> Result<Vec<Response>> {
        self.get_responses(response_id).await
    }

    async fn get_response_bodies(&self, response_id: i32) -> Result<Vec<ResponseBody>> {
        self.get_response_bodies(response_id).await
    }
}
