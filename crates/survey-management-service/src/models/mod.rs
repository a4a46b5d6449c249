//! 问卷服务领域模型
//!
//! 包含问卷系统的所有核心实体定义

pub mod enums;
pub mod query;
pub mod question;
pub mod questionnaire;
pub mod respondent;

pub use enums::{QuestionType, ResSharedTo};
pub use query::{PAGE_SIZE, PageRequest, QuestionnaireSort, compile_search, title_matches};
pub use question::{Question, QuestionInput, QuestionOption};
pub use questionnaire::{
    Questionnaire, QuestionnaireInput, QuestionnaireSummary, TargetedQuestionnaire,
    TitleAndLimit,
};
pub use respondent::{Respondent, Response, ResponseBody, ResponseMeta};

/// 通配用户标识
///
/// 作为 target 或 administrator 写入时匹配所有用户
pub const WILDCARD_USER: &str = "traP";
