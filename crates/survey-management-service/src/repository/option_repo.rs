//! 选项仓储
//!
//! 选项以 (question_id, option_num) 定位，option_num 从 1 开始连续编号

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use super::traits::OptionRepositoryTrait;
use crate::error::Result;

/// 选项变更
#[derive(Debug, Clone, PartialEq, Eq)]
enum OptionWrite<'a> {
    Update { option_num: i32, body: &'a str },
    Insert { option_num: i32, body: &'a str },
}

/// 按位置对比新旧选项，得到逐行写入计划
///
/// 已存在的编号原地更新，缺失的编号新建；超出新列表长度的编号由调用方统一删除
fn plan_option_writes<'a>(existing: &HashSet<i32>, bodies: &'a [String]) -> Vec<OptionWrite<'a>> {
    bodies
        .iter()
        .enumerate()
        .map(|(i, body)| {
            let option_num = i as i32 + 1;
            if existing.contains(&option_num) {
                OptionWrite::Update {
                    option_num,
                    body: body.as_str(),
                }
            } else {
                OptionWrite::Insert {
                    option_num,
                    body: body.as_str(),
                }
            }
        })
        .collect()
}

/// 选项仓储
pub struct OptionRepository {
    pool: PgPool,
}

impl OptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_option(&self, question_id: i32, option_num: i32, body: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO options (question_id, option_num, body)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(question_id)
        .bind(option_num)
        .bind(body)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// 用新的选项列表整体替换
    ///
    /// 编号 1..=min(N, M) 原地更新，M+1..=N 新建，大于 N 的删除，全部在一个事务内完成
    #[instrument(skip(self, bodies), fields(count = bodies.len()))]
    pub async fn update_options(&self, question_id: i32, bodies: &[String]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let existing: HashSet<i32> = sqlx::query_scalar::<_, i32>(
            "SELECT option_num FROM options WHERE question_id = $1",
        )
        .bind(question_id)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .collect();

        for write in plan_option_writes(&existing, bodies) {
            match write {
                OptionWrite::Update { option_num, body } => {
                    sqlx::query(
                        r#"
                        UPDATE options
                        SET body = $3
                        WHERE question_id = $1 AND option_num = $2
                        "#,
                    )
                    .bind(question_id)
                    .bind(option_num)
                    .bind(body)
                    .execute(&mut *tx)
                    .await?;
                }
                OptionWrite::Insert { option_num, body } => {
                    sqlx::query(
                        r#"
                        INSERT INTO options (question_id, option_num, body)
                        VALUES ($1, $2, $3)
                        "#,
                    )
                    .bind(question_id)
                    .bind(option_num)
                    .bind(body)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        let removed = sqlx::query("DELETE FROM options WHERE question_id = $1 AND option_num > $2")
            .bind(question_id)
            .bind(bodies.len() as i32)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        debug!(question_id, removed, "Options reconciled");
        Ok(())
    }

    pub async fn delete_options(&self, question_id: i32) -> Result<()> {
        sqlx::query("DELETE FROM options WHERE question_id = $1")
            .bind(question_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// 批量获取多个问题的选项，按编号排序，NULL 选项体转为空串
    pub async fn get_options(&self, question_ids: &[i32]) -> Result<HashMap<i32, Vec<String>>> {
        if question_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, (i32, Option<String>)>(
            r#"
            SELECT question_id, body
            FROM options
            WHERE question_id = ANY($1)
            ORDER BY question_id ASC, option_num ASC
            "#,
        )
        .bind(question_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut options: HashMap<i32, Vec<String>> = HashMap::with_capacity(question_ids.len());
        for (question_id, body) in rows {
            options
                .entry(question_id)
                .or_default()
                .push(body.unwrap_or_default());
        }

        Ok(options)
    }
}

#[async_trait]
impl OptionRepositoryTrait for OptionRepository {
    async fn insert_option(&self, question_id: i32, option_num: i32, body: &str) -> Result<()> {
        self.insert_option(question_id, option_num, body).await
    }

    async fn update_options(&self, question_id: i32, bodies: &[String]) -> Result<()> {
        self.update_options(question_id, bodies).await
    }

    async fn delete_options(&self, question_id: i32) -> Result<()> {
        self.delete_options(question_id).await
    }

    async fn get_options(&self, question_ids: &[i32]) -> Result<HashMap<i32, Vec<String>>> {
        self.get_options(question_ids).await
    }
}
