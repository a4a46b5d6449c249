//! 回答者仓储
//!
//! 每次回答尝试一行，`submitted_at` 为空时表示仍在填写

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, instrument};

use super::traits::RespondentRepositoryTrait;
use crate::error::{Result, SurveyError};
use crate::models::Respondent;

/// 回答者仓储
pub struct RespondentRepository {
    pool: PgPool,
}

impl RespondentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 创建回答记录，返回 response_id
    ///
    /// `submitted_at` 为 None 时作为草稿保存
    #[instrument(skip(self))]
    pub async fn insert_respondent(
        &self,
        user_id: &str,
        questionnaire_id: i32,
        submitted_at: Option<DateTime<Utc>>,
    ) -> Result<i32> {
        let response_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO respondents (questionnaire_id, user_traqid, submitted_at)
            VALUES ($1, $2, $3)
            RETURNING response_id
            "#,
        )
        .bind(questionnaire_id)
        .bind(user_id)
        .bind(submitted_at)
        .fetch_one(&self.pool)
        .await?;

        info!(
            response_id,
            questionnaire_id,
            submitted = submitted_at.is_some(),
            "Respondent created"
        );
        Ok(response_id)
    }

    /// 标记为已提交
    #[instrument(skip(self))]
    pub async fn update_submitted_at(&self, response_id: i32) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE respondents
            SET submitted_at = NOW(), modified_at = NOW()
            WHERE response_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(response_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(SurveyError::RespondentNotFound(response_id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_respondent(&self, response_id: i32) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE respondents
            SET deleted_at = NOW()
            WHERE response_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(response_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(SurveyError::RespondentNotFound(response_id));
        }

        info!(response_id, "Respondent soft-deleted");
        Ok(())
    }

    pub async fn get_respondent(&self, response_id: i32) -> Result<Respondent> {
        sqlx::query_as::<_, Respondent>(
            r#"
            SELECT response_id, questionnaire_id, user_traqid, modified_at, submitted_at, deleted_at
            FROM respondents
            WHERE response_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(response_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(SurveyError::RespondentNotFound(response_id))
    }

    /// 获取问卷的回答者列表（去重，包含填写中的记录）
    pub async fn get_respondents(&self, questionnaire_id: i32) -> Result<Vec<String>> {
        let users = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT user_traqid
            FROM respondents
            WHERE questionnaire_id = $1 AND deleted_at IS NULL
            ORDER BY user_traqid ASC
            "#,
        )
        .bind(questionnaire_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// 用户对问卷的最近一次提交时间
    pub async fn responded_at(
        &self,
        questionnaire_id: i32,
        user_id: &str,
    ) -> Result<Option<DateTime<Utc>>> {
        let submitted_at = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
            r#"
            SELECT MAX(submitted_at)
            FROM respondents
            WHERE questionnaire_id = $1 AND user_traqid = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(questionnaire_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(submitted_at)
    }

    /// 用户在各问卷上的最近一次提交时间，未提交过的问卷不出现在结果中
    pub async fn get_latest_submissions(
        &self,
        user_id: &str,
    ) -> Result<HashMap<i32, DateTime<Utc>>> {
        let rows = sqlx::query_as::<_, (i32, DateTime<Utc>)>(
            r#"
            SELECT questionnaire_id, MAX(submitted_at)
            FROM respondents
            WHERE user_traqid = $1
              AND submitted_at IS NOT NULL
              AND deleted_at IS NULL
            GROUP BY questionnaire_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// 判断回答记录是否属于该用户
    pub async fn check_respondent(&self, user_id: &str, response_id: i32) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM respondents
                WHERE response_id = $1 AND user_traqid = $2 AND deleted_at IS NULL
            )
            "#,
        )
        .bind(response_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

#[async_trait]
impl RespondentRepositoryTrait for RespondentRepository {
    async fn insert_respondent(
        &self,
        user_id: &str,
        questionnaire_id: i32,
        submitted_at: Option<DateTime<Utc>>,
    ) -> Result<i32> {
        self.insert_respondent(user_id, questionnaire_id, submitted_at)
            .await
    }

    async fn update_submitted_at(&self, response_id: i32) -> Result<()> {
        self.update_submitted_at(response_id).await
    }

    async fn delete_respondent(&self, response_id: i32) -> Result<()> {
        self.delete_respondent(response_id).await
    }

    async fn get_respondent(&self, response_id: i32) -> Result<Respondent> {
        self.get_respondent(response_id).await
    }

    async fn get_respondents(&self, questionnaire_id: i32) -> Result<Vec<String>> {
        self.get_respondents(questionnaire_id).await
    }

    async fn responded_at(
        &self,
        questionnaire_id: i32,
        user_id: &str,
    ) -> Result<Option<DateTime<Utc>>> {
        self.responded_at(questionnaire_id, user_id).await
    }

    async fn get_latest_submissions(&self, user_id: &str) -> Result<HashMap<i32, DateTime<Utc>>> {
        self.get_latest_submissions(user_id).await
    }

    async fn check_respondent(&self, user_id: &str, response_id: i32) -> Result<bool> {
        self.check_respondent(user_id, response_id).await
    }
}
