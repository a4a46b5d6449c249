//! 服务层
//!
//! 在仓储之上组合多表查询，实现面向回答对象的问卷聚合。
//!
//! ## 模块结构
//!
//! - `dto`: 数据传输对象定义
//! - `questionnaire_service`: 问卷创建、详情与回答对象视图
//! - `response_service`: 回答详情聚合

pub mod dto;
pub mod questionnaire_service;
pub mod response_service;

pub use dto::*;
pub use questionnaire_service::QuestionnaireService;
pub use response_service::ResponseService;
