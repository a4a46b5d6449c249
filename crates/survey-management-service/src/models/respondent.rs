//! 回答者与回答内容实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::QuestionType;

/// 回答者
///
/// 每次回答尝试一行，`submitted_at` 为空表示仍在填写中
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Respondent {
    pub response_id: i32,
    pub questionnaire_id: i32,
    pub user_traqid: String,
    pub modified_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Respondent {
    pub fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }
}

/// 单个问题的回答
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub response_id: i32,
    pub question_id: i32,
    pub body: Option<String>,
    pub modified_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// 待写入的回答
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub question_id: i32,
    /// 回答内容，None 写入 NULL（如跳过的非必答题）
    pub data: Option<String>,
}

/// 回答内容与对应问题类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub question_id: i32,
    #[sqlx(rename = "type")]
    pub question_type: QuestionType,
    pub body: Option<String>,
}
