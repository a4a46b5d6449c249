//! 问题与选项实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::enums::QuestionType;

/// 问题
///
/// 属于一个问卷，按 (page_num, question_num) 排序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i32,
    pub questionnaire_id: i32,
    pub page_num: i32,
    pub question_num: i32,
    #[sqlx(rename = "type")]
    pub question_type: QuestionType,
    pub body: String,
    pub is_required: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// 创建 / 更新问题的参数
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    #[validate(range(min = 1, message = "页码必须为正数"))]
    pub page_num: i32,
    #[validate(range(min = 1, message = "题号必须为正数"))]
    pub question_num: i32,
    pub question_type: QuestionType,
    pub body: String,
    #[serde(default)]
    pub is_required: bool,
}

/// 选项
///
/// (question_id, option_num) 唯一，body 允许为 NULL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub id: i32,
    pub question_id: i32,
    pub option_num: i32,
    pub body: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_input_validation() {
        let input = QuestionInput {
            page_num: 0,
            question_num: 1,
            question_type: QuestionType::Text,
            body: "What?".to_string(),
            is_required: true,
        };
        assert!(input.validate().is_err());

        let input = QuestionInput {
            page_num: 1,
            ..input
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_question_input_deserialize_defaults() {
        let input: QuestionInput = serde_json::from_str(
            r#"{"pageNum":1,"questionNum":2,"questionType":"Checkbox","body":"Pick"}"#,
        )
        .unwrap();
        assert_eq!(input.question_type, QuestionType::Checkbox);
        assert!(!input.is_required);
    }
}
