//! 回答服务

use std::sync::Arc;

use tracing::instrument;

use crate::error::Result;
use crate::repository::{RespondentRepositoryTrait, ResponseRepositoryTrait};
use crate::service::dto::RespondentDetail;

/// 回答服务
pub struct ResponseService<RR, RSR>
where
    RR: RespondentRepositoryTrait,
    RSR: ResponseRepositoryTrait,
{
    respondent_repo: Arc<RR>,
    response_repo: Arc<RSR>,
}

impl<RR, RSR> ResponseService<RR, RSR>
where
    RR: RespondentRepositoryTrait,
    RSR: ResponseRepositoryTrait,
{
    pub fn new(respondent_repo: Arc<RR>, response_repo: Arc<RSR>) -> Self {
        Self {
            respondent_repo,
            response_repo,
        }
    }

    /// 获取单次回答的详情，回答内容按问题顺序排列
    #[instrument(skip(self))]
    pub async fn get_respondent_detail(&self, response_id: i32) -> Result<RespondentDetail> {
        let respondent = self.respondent_repo.get_respondent(response_id).await?;
        let responses = self.response_repo.get_response_bodies(response_id).await?;

        Ok(RespondentDetail {
            respondent,
            responses,
        })
    }
}
