//! 问卷仓储
//!
//! 提供问卷的增删改查、分页搜索，以及截止时间、公开范围等单字段查询

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, instrument};

use super::traits::QuestionnaireRepositoryTrait;
use crate::error::{Result, SurveyError};
use crate::models::{
    PageRequest, Questionnaire, QuestionnaireInput, QuestionnaireSort, QuestionnaireSummary,
    ResSharedTo, TitleAndLimit, WILDCARD_USER, compile_search, title_matches,
};

/// 列表查询共用的列和 is_targeted 计算
///
/// $1 = 用户，$2 = 通配用户，$3 = 是否只看非回答对象的问卷
const SUMMARY_SELECT: &str = r#"
    SELECT q.id, q.title, q.description, q.res_time_limit, q.deleted_at,
           q.res_shared_to, q.created_at, q.modified_at,
           EXISTS (
               SELECT 1 FROM targets t
               WHERE t.questionnaire_id = q.id AND t.user_traqid IN ($1, $2)
           ) AS is_targeted
    FROM questionnaires q
"#;

const SUMMARY_FILTER: &str = r#"
    WHERE q.deleted_at IS NULL
      AND (
          $3 = FALSE
          OR NOT EXISTS (
              SELECT 1 FROM targets t
              WHERE t.questionnaire_id = q.id AND t.user_traqid IN ($1, $2)
          )
      )
"#;

/// 问卷仓储
pub struct QuestionnaireRepository {
    pool: PgPool,
}

impl QuestionnaireRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 写操作 ====================

    /// 创建问卷，返回新问卷 ID
    ///
    /// 插入与读取 ID 在同一事务内完成，并发创建不会读到彼此的 ID
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn insert_questionnaire(&self, input: &QuestionnaireInput) -> Result<i32> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO questionnaires (title, description, res_time_limit, res_shared_to)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.res_time_limit)
        .bind(input.res_shared_to)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(questionnaire_id = id, "Questionnaire created");
        Ok(id)
    }

    /// 更新问卷，同时刷新 modified_at
    ///
    /// res_time_limit 为 None 时会清除原有截止时间
    #[instrument(skip(self, input))]
    pub async fn update_questionnaire(&self, id: i32, input: &QuestionnaireInput) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE questionnaires
            SET title = $2, description = $3, res_time_limit = $4,
                res_shared_to = $5, modified_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.res_time_limit)
        .bind(input.res_shared_to)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(SurveyError::QuestionnaireNotFound(id));
        }

        info!(questionnaire_id = id, "Questionnaire updated");
        Ok(())
    }

    /// 软删除问卷
    #[instrument(skip(self))]
    pub async fn delete_questionnaire(&self, id: i32) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE questionnaires
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(SurveyError::QuestionnaireNotFound(id));
        }

        info!(questionnaire_id = id, "Questionnaire soft-deleted");
        Ok(())
    }

    /// 物理删除问卷及其全部从属数据
    ///
    /// 数据库不做级联，这里按依赖顺序手动删除；问卷不存在时整个事务回滚
    #[instrument(skip(self))]
    pub async fn purge_questionnaire(&self, id: i32) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM responses
            WHERE response_id IN (
                SELECT response_id FROM respondents WHERE questionnaire_id = $1
            )
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM respondents WHERE questionnaire_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            DELETE FROM options
            WHERE question_id IN (SELECT id FROM questions WHERE questionnaire_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM questions WHERE questionnaire_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM targets WHERE questionnaire_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM administrators WHERE questionnaire_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM questionnaires WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(SurveyError::QuestionnaireNotFound(id));
        }

        tx.commit().await?;

        info!(questionnaire_id = id, "Questionnaire purged");
        Ok(())
    }

    // ==================== 读操作 ====================

    /// 获取单个问卷，已软删除的视为不存在
    #[instrument(skip(self))]
    pub async fn get_questionnaire(&self, id: i32) -> Result<Questionnaire> {
        sqlx::query_as::<_, Questionnaire>(
            r#"
            SELECT id, title, description, res_time_limit, deleted_at,
                   res_shared_to, created_at, modified_at
            FROM questionnaires
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(SurveyError::QuestionnaireNotFound(id))
    }

    /// 获取全部问卷
    #[instrument(skip(self))]
    pub async fn get_all_questionnaires(
        &self,
        sort: Option<QuestionnaireSort>,
    ) -> Result<Vec<Questionnaire>> {
        let sql = format!(
            r#"
            SELECT q.id, q.title, q.description, q.res_time_limit, q.deleted_at,
                   q.res_shared_to, q.created_at, q.modified_at
            FROM questionnaires q
            WHERE q.deleted_at IS NULL
            {}
            "#,
            QuestionnaireSort::order_by(sort)
        );

        let questionnaires = sqlx::query_as::<_, Questionnaire>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(questionnaires)
    }

    /// 分页获取问卷列表，返回 (当前页, 最大页码)
    ///
    /// 搜索在分页之前进行：带搜索条件时先取出全部候选行在内存中过滤再分页，
    /// 否则直接用 COUNT + LIMIT/OFFSET。
    #[instrument(skip(self))]
    pub async fn get_questionnaires(
        &self,
        user_id: &str,
        sort: &str,
        search: &str,
        page: &str,
        nontargeted: bool,
    ) -> Result<(Vec<QuestionnaireSummary>, i64)> {
        let page = PageRequest::parse(page)?;
        let sort = QuestionnaireSort::parse(sort)?;
        let search = compile_search(search)?;
        let order_by = QuestionnaireSort::order_by(sort);

        if let Some(regex) = search {
            let sql = format!("{} {} {}", SUMMARY_SELECT, SUMMARY_FILTER, order_by);
            let matched: Vec<QuestionnaireSummary> =
                sqlx::query_as::<_, QuestionnaireSummary>(&sql)
                    .bind(user_id)
                    .bind(WILDCARD_USER)
                    .bind(nontargeted)
                    .fetch_all(&self.pool)
                    .await?
                    .into_iter()
                    .filter(|row| title_matches(&regex, &row.questionnaire.title))
                    .collect();

            let page_max = page.check_total(matched.len() as i64)?;
            return Ok((page.slice(matched), page_max));
        }

        let count_sql = format!("SELECT COUNT(*) FROM questionnaires q {}", SUMMARY_FILTER);
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(user_id)
            .bind(WILDCARD_USER)
            .bind(nontargeted)
            .fetch_one(&self.pool)
            .await?;

        let page_max = page.check_total(total)?;

        let sql = format!(
            "{} {} {} LIMIT $4 OFFSET $5",
            SUMMARY_SELECT, SUMMARY_FILTER, order_by
        );
        let rows = sqlx::query_as::<_, QuestionnaireSummary>(&sql)
            .bind(user_id)
            .bind(WILDCARD_USER)
            .bind(nontargeted)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, page_max))
    }

    /// 获取回答截止时间
    ///
    /// 问卷不存在和不限期都返回 None
    pub async fn get_questionnaire_limit(&self, id: i32) -> Result<Option<DateTime<Utc>>> {
        let limit = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
            r#"
            SELECT res_time_limit
            FROM questionnaires
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(limit.flatten())
    }

    /// 获取标题和截止时间
    pub async fn get_title_and_limit(&self, id: i32) -> Result<Option<TitleAndLimit>> {
        let row = sqlx::query_as::<_, TitleAndLimit>(
            r#"
            SELECT title, res_time_limit
            FROM questionnaires
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// 获取回答结果的公开范围
    pub async fn get_res_shared(&self, id: i32) -> Result<ResSharedTo> {
        sqlx::query_scalar::<_, ResSharedTo>(
            r#"
            SELECT res_shared_to
            FROM questionnaires
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(SurveyError::QuestionnaireNotFound(id))
    }
}

#[async_trait]
impl QuestionnaireRepositoryTrait for QuestionnaireRepository {
    async fn insert_questionnaire(&self, input: &QuestionnaireInput) -> Result<i32> {
        self.insert_questionnaire(input).await
    }

    async fn update_questionnaire(&self, id: i32, input: &QuestionnaireInput) -> Result<()> {
        self.update_questionnaire(id, input).await
    }

    async fn delete_questionnaire(&self, id: i32) -> Result<()> {
        self.delete_questionnaire(id).await
    }

    async fn purge_questionnaire(&self, id: i32) -> Result<()> {
        self.purge_questionnaire(id).await
    }

    async fn get_questionnaire(&self, id: i32) -> Result<Questionnaire> {
        self.get_questionnaire(id).await
    }

    async fn get_all_questionnaires(
        &self,
        sort: Option<QuestionnaireSort>,
    ) -> Result<Vec<Questionnaire>> {
        self.get_all_questionnaires(sort).await
    }

    async fn get_questionnaires(
        &self,
        user_id: &str,
        sort: &str,
        search: &str,
        page: &str,
        nontargeted: bool,
    ) -> Result<(Vec<QuestionnaireSummary>, i64)> {
        self.get_questionnaires(user_id, sort, search, page, nontargeted)
            .await
    }

    async fn get_questionnaire_limit(&self, id: i32) -> Result<Option<DateTime<Utc>>> {
        self.get_questionnaire_limit(id).await
    }

    async fn get_title_and_limit(&self, id: i32) -> Result<Option<TitleAndLimit>> {
        self.get_title_and_limit(id).await
    }

    async fn get_res_shared(&self, id: i32) -> Result<ResSharedTo> {
        self.get_res_shared(id).await
    }
}
