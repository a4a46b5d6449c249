//! 问卷实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::enums::ResSharedTo;

/// 问卷
///
/// 根实体，`deleted_at` 非空表示已软删除
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Questionnaire {
    pub id: i32,
    pub title: String,
    pub description: String,
    /// 回答截止时间，None 表示不限期
    pub res_time_limit: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub res_shared_to: ResSharedTo,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Questionnaire {
    /// 截止时间已过（不限期的问卷永不过期）
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.res_time_limit.is_some_and(|limit| now > limit)
    }
}

/// 问卷列表项，附带当前用户是否为回答对象
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub questionnaire: Questionnaire,
    pub is_targeted: bool,
}

/// 面向回答对象的问卷视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetedQuestionnaire {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub res_time_limit: Option<DateTime<Utc>>,
    pub res_shared_to: ResSharedTo,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    /// 该用户最近一次提交时间，未提交为 None
    pub responded_at: Option<DateTime<Utc>>,
}

impl TargetedQuestionnaire {
    pub fn from_questionnaire(
        questionnaire: Questionnaire,
        responded_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: questionnaire.id,
            title: questionnaire.title,
            description: questionnaire.description,
            res_time_limit: questionnaire.res_time_limit,
            res_shared_to: questionnaire.res_shared_to,
            created_at: questionnaire.created_at,
            modified_at: questionnaire.modified_at,
            responded_at,
        }
    }
}

/// 标题与截止时间
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TitleAndLimit {
    pub title: String,
    pub res_time_limit: Option<DateTime<Utc>>,
}

/// 创建 / 更新问卷的参数
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireInput {
    #[validate(length(min = 1, max = 50, message = "标题长度必须在1-50个字符之间"))]
    pub title: String,
    pub description: String,
    pub res_time_limit: Option<DateTime<Utc>>,
    #[serde(default)]
    pub res_shared_to: ResSharedTo,
}
