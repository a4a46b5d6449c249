//! 数据库仓储层
//!
//! 提供问卷、成员、问题、选项和回答的数据访问接口，封装 SQL 操作细节。
//!
//! ## 设计原则
//!
//! - 仓储只负责数据持久化，聚合逻辑放在服务层
//! - 使用 SQLx 进行类型安全的数据库操作
//! - 批量写入在仓储内部使用事务，单条写入直接走连接池
//! - 定义 trait 接口以支持 mock 测试

mod administrator_repo;
mod option_repo;
mod question_repo;
mod questionnaire_repo;
mod respondent_repo;
mod response_repo;
mod target_repo;
mod traits;

pub use administrator_repo::AdministratorRepository;
pub use option_repo::OptionRepository;
pub use question_repo::QuestionRepository;
pub use questionnaire_repo::QuestionnaireRepository;
pub use respondent_repo::RespondentRepository;
pub use response_repo::ResponseRepository;
pub use target_repo::TargetRepository;
pub use traits::*;
