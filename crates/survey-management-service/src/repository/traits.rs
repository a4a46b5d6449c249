//! 仓储 Trait 定义
//!
//! 定义仓储接口，便于服务层依赖抽象而非具体实现，支持 mock 测试

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{
    Question, QuestionInput, Questionnaire, QuestionnaireInput, QuestionnaireSort,
    QuestionnaireSummary, ResSharedTo, Respondent, Response, ResponseBody, ResponseMeta,
    TitleAndLimit,
};

/// 问卷仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionnaireRepositoryTrait: Send + Sync {
    async fn insert_questionnaire(&self, input: &QuestionnaireInput) -> Result<i32>;
    async fn update_questionnaire(&self, id: i32, input: &QuestionnaireInput) -> Result<()>;
    async fn delete_questionnaire(&self, id: i32) -> Result<()>;
    async fn purge_questionnaire(&self, id: i32) -> Result<()>;

    async fn get_questionnaire(&self, id: i32) -> Result<Questionnaire>;
    async fn get_all_questionnaires(
        &self,
        sort: Option<QuestionnaireSort>,
    ) -> Result<Vec<Questionnaire>>;
    async fn get_questionnaires(
        &self,
        user_id: &str,
        sort: &str,
        search: &str,
        page: &str,
        nontargeted: bool,
    ) -> Result<(Vec<QuestionnaireSummary>, i64)>;

    async fn get_questionnaire_limit(&self, id: i32) -> Result<Option<DateTime<Utc>>>;
    async fn get_title_and_limit(&self, id: i32) -> Result<Option<TitleAndLimit>>;
    async fn get_res_shared(&self, id: i32) -> Result<ResSharedTo>;
}

/// 管理员仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdministratorRepositoryTrait: Send + Sync {
    async fn insert_administrators(&self, questionnaire_id: i32, users: &[String]) -> Result<()>;
    async fn delete_administrators(&self, questionnaire_id: i32) -> Result<()>;
    async fn get_administrators(&self, questionnaire_id: i32) -> Result<Vec<String>>;
    async fn get_admin_questionnaire_ids(&self, user_id: &str) -> Result<Vec<i32>>;
    async fn check_questionnaire_admin(&self, user_id: &str, questionnaire_id: i32)
    -> Result<bool>;
}

/// 回答对象仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TargetRepositoryTrait: Send + Sync {
    async fn insert_targets(&self, questionnaire_id: i32, users: &[String]) -> Result<()>;
    async fn delete_targets(&self, questionnaire_id: i32) -> Result<()>;
    async fn get_targets(&self, questionnaire_id: i32) -> Result<Vec<String>>;
    async fn get_targeted_questionnaire_ids(&self, user_id: &str) -> Result<Vec<i32>>;
    async fn check_target(&self, user_id: &str, questionnaire_id: i32) -> Result<bool>;
}

/// 问题仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepositoryTrait: Send + Sync {
    async fn insert_question(&self, questionnaire_id: i32, input: &QuestionInput) -> Result<i32>;
    async fn update_question(&self, id: i32, input: &QuestionInput) -> Result<()>;
    async fn delete_question(&self, id: i32) -> Result<()>;
    async fn get_questions(&self, questionnaire_id: i32) -> Result<Vec<Question>>;
    async fn check_question_admin(&self, user_id: &str, question_id: i32) -> Result<bool>;
}

/// 选项仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OptionRepositoryTrait: Send + Sync {
    async fn insert_option(&self, question_id: i32, option_num: i32, body: &str) -> Result<()>;
    async fn update_options(&self, question_id: i32, bodies: &[String]) -> Result<()>;
    async fn delete_options(&self, question_id: i32) -> Result<()>;
    async fn get_options(&self, question_ids: &[i32]) -> Result<HashMap<i32, Vec<String>>>;
}

/// 回答者仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RespondentRepositoryTrait: Send + Sync {
    async fn insert_respondent(
        &self,
        user_id: &str,
        questionnaire_id: i32,
        submitted_at: Option<DateTime<Utc>>,
    ) -> Result<i32>;
    async fn update_submitted_at(&self, response_id: i32) -> Result<()>;
    async fn delete_respondent(&self, response_id: i32) -> Result<()>;
    async fn get_respondent(&self, response_id: i32) -> Result<Respondent>;
    async fn get_respondents(&self, questionnaire_id: i32) -> Result<Vec<String>>;
    async fn responded_at(
        &self,
        questionnaire_id: i32,
        user_id: &str,
    ) -> Result<Option<DateTime<Utc>>>;
    async fn get_latest_submissions(&self, user_id: &str) -> Result<HashMap<i32, DateTime<Utc>>>;
    async fn check_respondent(&self, user_id: &str, response_id: i32) -> Result<bool>;
}

/// 回答内容仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResponseRepositoryTrait: Send + Sync {
    async fn insert_responses(&self, response_id: i32, metas: &[ResponseMeta]) -> Result<()>;
    async fn delete_responses(&self, response_id: i32) -> Result<()>;
    async fn get_responses(&self, response_id: i32) -> Result<Vec<Response>>;
    async fn get_response_bodies(&self, response_id: i32) -> Result<Vec<ResponseBody>>;
}
