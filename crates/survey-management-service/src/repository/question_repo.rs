//! 问题仓储

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, instrument};

use super::traits::QuestionRepositoryTrait;
use crate::error::{Result, SurveyError};
use crate::models::{Question, QuestionInput, WILDCARD_USER};

/// 问题仓储
///
/// 问题按 (page_num, question_num) 排序，删除为软删除
pub struct QuestionRepository {
    pool: PgPool,
}

impl QuestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 添加问题，返回问题 ID
    ///
    /// 只允许挂在未删除的问卷下，否则返回 QuestionnaireNotFound
    #[instrument(skip(self, input))]
    pub async fn insert_question(&self, questionnaire_id: i32, input: &QuestionInput) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO questions (questionnaire_id, page_num, question_num, type, body, is_required)
            SELECT $1, $2, $3, $4, $5, $6
            WHERE EXISTS (
                SELECT 1 FROM questionnaires WHERE id = $1 AND deleted_at IS NULL
            )
            RETURNING id
            "#,
        )
        .bind(questionnaire_id)
        .bind(input.page_num)
        .bind(input.question_num)
        .bind(input.question_type)
        .bind(&input.body)
        .bind(input.is_required)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(SurveyError::QuestionnaireNotFound(questionnaire_id))?;

        info!(questionnaire_id, question_id = id, "Question created");
        Ok(id)
    }

    #[instrument(skip(self, input))]
    pub async fn update_question(&self, id: i32, input: &QuestionInput) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE questions
            SET page_num = $2, question_num = $3, type = $4, body = $5, is_required = $6
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(input.page_num)
        .bind(input.question_num)
        .bind(input.question_type)
        .bind(&input.body)
        .bind(input.is_required)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(SurveyError::QuestionNotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_question(&self, id: i32) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE questions
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(SurveyError::QuestionNotFound(id));
        }

        info!(question_id = id, "Question soft-deleted");
        Ok(())
    }

    /// 获取问卷下的全部问题
    pub async fn get_questions(&self, questionnaire_id: i32) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, questionnaire_id, page_num, question_num, type, body,
                   is_required, deleted_at, created_at
            FROM questions
            WHERE questionnaire_id = $1 AND deleted_at IS NULL
            ORDER BY page_num ASC, question_num ASC, id ASC
            "#,
        )
        .bind(questionnaire_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    /// 判断用户是否为问题所属问卷的管理员
    pub async fn check_question_admin(&self, user_id: &str, question_id: i32) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM questions q
                INNER JOIN administrators a ON a.questionnaire_id = q.questionnaire_id
                WHERE q.id = $1
                  AND q.deleted_at IS NULL
                  AND a.user_traqid IN ($2, $3)
            )
            "#,
        )
        .bind(question_id)
        .bind(user_id)
        .bind(WILDCARD_USER)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

#[async_trait]
impl QuestionRepositoryTrait for QuestionRepository {
    async fn insert_question(&self, questionnaire_id: i32, input: &QuestionInput) -> Result<i32> {
        self.insert_question(questionnaire_id, input).await
    }

    async fn update_question(&self, id: i32, input: &QuestionInput) -> Result<()> {
        self.update_question(id, input).await
    }

    async fn delete_question(&self, id: i32) -> Result<()> {
        self.delete_question(id).await
    }

    async fn get_questions(&self, questionnaire_id: i32) -> Result<Vec<Question>> {
        self.get_questions(questionnaire_id).await
    }

    async fn check_question_admin(&self, user_id: &str, question_id: i32) -> Result<bool> {
        self.check_question_admin(user_id, question_id).await
    }
}
