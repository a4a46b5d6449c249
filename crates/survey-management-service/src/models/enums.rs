//! 问卷服务枚举类型定义
//!
//! 所有枚举都支持数据库（sqlx）和 JSON（serde）序列化

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SurveyError;

/// 回答结果的公开范围
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum ResSharedTo {
    /// 所有人可见
    Public,
    /// 已回答者可见
    Respondents,
    /// 仅管理员可见
    #[default]
    Administrators,
}

impl ResSharedTo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Respondents => "respondents",
            Self::Administrators => "administrators",
        }
    }
}

impl fmt::Display for ResSharedTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResSharedTo {
    type Err = SurveyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "respondents" => Ok(Self::Respondents),
            "administrators" | "" => Ok(Self::Administrators),
            other => Err(SurveyError::invalid_argument(
                "res_shared_to",
                format!("unknown scope '{}'", other),
            )),
        }
    }
}

/// 问题类型
///
/// 数据库中按变体名原样存储（如 "MultipleChoice"）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "varchar")]
pub enum QuestionType {
    Text,
    TextArea,
    Number,
    MultipleChoice,
    Checkbox,
    LinearScale,
    Dropdown,
}

impl FromStr for QuestionType {
    type Err = SurveyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Text" => Ok(Self::Text),
            "TextArea" => Ok(Self::TextArea),
            "Number" => Ok(Self::Number),
            "MultipleChoice" => Ok(Self::MultipleChoice),
            "Checkbox" => Ok(Self::Checkbox),
            "LinearScale" => Ok(Self::LinearScale),
            "Dropdown" => Ok(Self::Dropdown),
            other => Err(SurveyError::invalid_argument(
                "question_type",
                format!("unknown question type '{}'", other),
            )),
        }
    }
}
