//! 服务层数据传输对象

use serde::Serialize;

use crate::models::{Questionnaire, Respondent, ResponseBody};

/// 问卷详情，附带成员列表
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireInfo {
    #[serde(flatten)]
    pub questionnaire: Questionnaire,
    pub targets: Vec<String>,
    pub administrators: Vec<String>,
    /// 回答者（去重，包含填写中的用户）
    pub respondents: Vec<String>,
}

/// 单次回答的详情
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondentDetail {
    #[serde(flatten)]
    pub respondent: Respondent,
    pub responses: Vec<ResponseBody>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QuestionType, ResSharedTo};
    use chrono::Utc;

    #[test]
    fn test_questionnaire_info_flattens_questionnaire() {
        let now = Utc::now();
        let info = QuestionnaireInfo {
            questionnaire: Questionnaire {
                id: 3,
                title: "Q1".to_string(),
                description: String::new(),
                res_time_limit: None,
                deleted_at: None,
                res_shared_to: ResSharedTo::Public,
                created_at: now,
                modified_at: now,
            },
            targets: vec![],
            administrators: vec!["alice".to_string()],
            respondents: vec!["bob".to_string()],
        };

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["resSharedTo"], "public");
        assert_eq!(json["administrators"][0], "alice");
        assert!(json.get("questionnaire").is_none());
    }

    #[test]
    fn test_respondent_detail_serialization() {
        let now = Utc::now();
        let detail = RespondentDetail {
            respondent: Respondent {
                response_id: 9,
                questionnaire_id: 3,
                user_traqid: "bob".to_string(),
                modified_at: now,
                submitted_at: None,
                deleted_at: None,
            },
            responses: vec![ResponseBody {
                question_id: 1,
                question_type: QuestionType::Text,
                body: Some("hello".to_string()),
            }],
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["responseId"], 9);
        assert!(json["submittedAt"].is_null());
        assert_eq!(json["responses"][0]["body"], "hello");
    }
}
