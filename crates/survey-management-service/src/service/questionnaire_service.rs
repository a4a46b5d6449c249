//! 问卷服务
//!
//! 组合问卷、管理员、回答对象和回答者仓储，提供：
//!
//! - 问卷创建（问卷本体 + 回答对象 + 管理员）
//! - 问卷详情（附带成员列表）
//! - 面向回答对象的问卷列表

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};
use validator::Validate;

use crate::error::{Result, SurveyError};
use crate::models::{Questionnaire, QuestionnaireInput, TargetedQuestionnaire};
use crate::repository::{
    AdministratorRepositoryTrait, QuestionnaireRepositoryTrait, RespondentRepositoryTrait,
    TargetRepositoryTrait,
};
use crate::service::dto::QuestionnaireInfo;

/// 筛选出仍可回答的目标问卷，并附上该用户最近一次提交时间
fn collect_targeted(
    questionnaires: Vec<Questionnaire>,
    targeted_ids: &HashSet<i32>,
    latest_submissions: &HashMap<i32, DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Vec<TargetedQuestionnaire> {
    questionnaires
        .into_iter()
        .filter(|q| targeted_ids.contains(&q.id) && !q.is_expired(now))
        .map(|q| {
            let responded_at = latest_submissions.get(&q.id).copied();
            TargetedQuestionnaire::from_questionnaire(q, responded_at)
        })
        .collect()
}

/// 有截止时间的按截止时间升序排在前面，不限期的按修改时间降序排在后面
fn compare_targeted(a: &TargetedQuestionnaire, b: &TargetedQuestionnaire) -> Ordering {
    match (a.res_time_limit, b.res_time_limit) {
        (Some(x), Some(y)) => x.cmp(&y).then(a.id.cmp(&b.id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.modified_at.cmp(&a.modified_at).then(a.id.cmp(&b.id)),
    }
}

/// 问卷服务
pub struct QuestionnaireService<QR, AR, TR, RR>
where
    QR: QuestionnaireRepositoryTrait,
    AR: AdministratorRepositoryTrait,
    TR: TargetRepositoryTrait,
    RR: RespondentRepositoryTrait,
{
    questionnaire_repo: Arc<QR>,
    administrator_repo: Arc<AR>,
    target_repo: Arc<TR>,
    respondent_repo: Arc<RR>,
}

impl<QR, AR, TR, RR> QuestionnaireService<QR, AR, TR, RR>
where
    QR: QuestionnaireRepositoryTrait,
    AR: AdministratorRepositoryTrait,
    TR: TargetRepositoryTrait,
    RR: RespondentRepositoryTrait,
{
    pub fn new(
        questionnaire_repo: Arc<QR>,
        administrator_repo: Arc<AR>,
        target_repo: Arc<TR>,
        respondent_repo: Arc<RR>,
    ) -> Self {
        Self {
            questionnaire_repo,
            administrator_repo,
            target_repo,
            respondent_repo,
        }
    }

    /// 创建问卷并登记回答对象和管理员，返回问卷 ID
    #[instrument(skip(self, input, targets, administrators), fields(title = %input.title))]
    pub async fn create_questionnaire(
        &self,
        input: &QuestionnaireInput,
        targets: &[String],
        administrators: &[String],
    ) -> Result<i32> {
        input.validate()?;

        let id = self.questionnaire_repo.insert_questionnaire(input).await?;
        self.target_repo.insert_targets(id, targets).await?;
        self.administrator_repo
            .insert_administrators(id, administrators)
            .await?;

        info!(
            questionnaire_id = id,
            targets = targets.len(),
            administrators = administrators.len(),
            "Questionnaire created"
        );
        Ok(id)
    }

    /// 获取问卷详情
    ///
    /// 问卷不存在或已删除时返回 QuestionnaireNotFound
    #[instrument(skip(self))]
    pub async fn get_questionnaire_info(&self, questionnaire_id: i32) -> Result<QuestionnaireInfo> {
        let questionnaire = self
            .questionnaire_repo
            .get_questionnaire(questionnaire_id)
            .await?;

        let (targets, administrators, respondents) = tokio::try_join!(
            self.target_repo.get_targets(questionnaire_id),
            self.administrator_repo.get_administrators(questionnaire_id),
            self.respondent_repo.get_respondents(questionnaire_id),
        )?;

        Ok(QuestionnaireInfo {
            questionnaire,
            targets,
            administrators,
            respondents,
        })
    }

    /// 获取用户作为回答对象的全部问卷
    ///
    /// 已过截止时间的问卷不返回；结果为空时返回 NotFound
    #[instrument(skip(self))]
    pub async fn get_targeted_questionnaires(
        &self,
        user_id: &str,
    ) -> Result<Vec<TargetedQuestionnaire>> {
        let mut items = self.load_targeted(user_id).await?;
        items.sort_by(compare_targeted);

        if items.is_empty() {
            return Err(SurveyError::NotFound(format!(
                "targeted questionnaires for {}",
                user_id
            )));
        }
        Ok(items)
    }

    /// 获取用户尚未回答且设有截止时间的问卷，按截止时间升序
    #[instrument(skip(self))]
    pub async fn get_targeted_questionnaires_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<TargetedQuestionnaire>> {
        let mut items: Vec<_> = self
            .load_targeted(user_id)
            .await?
            .into_iter()
            .filter(|q| q.responded_at.is_none() && q.res_time_limit.is_some())
            .collect();
        items.sort_by(compare_targeted);

        if items.is_empty() {
            return Err(SurveyError::NotFound(format!(
                "unanswered questionnaires for {}",
                user_id
            )));
        }
        Ok(items)
    }

    async fn load_targeted(&self, user_id: &str) -> Result<Vec<TargetedQuestionnaire>> {
        let targeted_ids: HashSet<i32> = self
            .target_repo
            .get_targeted_questionnaire_ids(user_id)
            .await?
            .into_iter()
            .collect();
        if targeted_ids.is_empty() {
            return Ok(Vec::new());
        }

        let (questionnaires, latest_submissions) = tokio::try_join!(
            self.questionnaire_repo.get_all_questionnaires(None),
            self.respondent_repo.get_latest_submissions(user_id),
        )?;

        Ok(collect_targeted(
            questionnaires,
            &targeted_ids,
            &latest_submissions,
            Utc::now(),
        ))
    }
}
