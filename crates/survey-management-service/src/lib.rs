//! 问卷管理服务
//!
//! 问卷系统的数据访问层，封装问卷、成员、问题、选项和回答的持久化与聚合查询。
//!
//! ## 核心功能
//!
//! - **问卷管理**：创建、更新、软删除和彻底删除问卷
//! - **分页列表**：按排序键、标题正则和回答对象筛选的分页查询
//! - **成员管理**：管理员和回答对象，支持通配用户 `traP`
//! - **问题与选项**：按页码和题号组织问题，选项按位置整体替换
//! - **回答记录**：回答者、回答内容与最近提交时间
//! - **回答对象视图**：面向用户的待回答问卷列表
//!
//! ## 模块结构
//!
//! - `models`: 领域模型定义
//! - `error`: 错误类型定义
//! - `repository`: 数据库仓储层
//! - `service`: 聚合服务层

pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use error::{ErrorKind, Result, SurveyError};
pub use models::*;
pub use repository::{
    AdministratorRepository, OptionRepository, QuestionRepository, QuestionnaireRepository,
    RespondentRepository, ResponseRepository, TargetRepository,
};
pub use service::{QuestionnaireService, ResponseService, dto};

/// 数据库迁移，目录为 crate 下的 `migrations/`
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
