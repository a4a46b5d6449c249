//! 问卷仓储集成测试
//!
//! 需要 PostgreSQL，运行方式：`DATABASE_URL=... cargo test -- --ignored`

mod common;

use std::collections::HashSet;

use survey_management::{
    PAGE_SIZE, QuestionnaireRepository, QuestionnaireSummary, ResSharedTo, SurveyError,
    TargetRepository, WILDCARD_USER,
};
use survey_shared::test_utils::{test_user_id, unique_title};

/// 创建 count 个标题共享同一前缀的问卷，返回 (前缀, id 列表)
async fn seed_questionnaires(repo: &QuestionnaireRepository, count: usize) -> (String, Vec<i32>) {
    let token = test_user_id("walk");
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let mut input = common::questionnaire("walk");
        input.title = format!("{} {:02}", token, i);
        ids.push(repo.insert_questionnaire(&input).await.unwrap());
    }
    (token, ids)
}

/// 从第 1 页翻到最后一页，除最后一页外每页都必须是满页
async fn walk_pages_as(
    repo: &QuestionnaireRepository,
    user_id: &str,
    sort: &str,
    search: &str,
    nontargeted: bool,
) -> Vec<QuestionnaireSummary> {
    let mut rows = Vec::new();
    let mut page = 1;
    loop {
        let (items, page_max) = repo
            .get_questionnaires(user_id, sort, search, &page.to_string(), nontargeted)
            .await
            .unwrap();
        assert!(!items.is_empty());
        if page < page_max {
            assert_eq!(items.len() as i64, PAGE_SIZE, "page {} is not full", page);
        } else {
            assert!(items.len() as i64 <= PAGE_SIZE);
        }
        rows.extend(items);
        if page >= page_max {
            break;
        }
        page += 1;
    }
    rows
}

async fn walk_all_pages(
    repo: &QuestionnaireRepository,
    sort: &str,
    search: &str,
) -> Vec<QuestionnaireSummary> {
    walk_pages_as(repo, "dave", sort, search, false).await
}

fn ids_of(rows: &[QuestionnaireSummary]) -> Vec<i32> {
    rows.iter().map(|r| r.questionnaire.id).collect()
}

#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_page_walk_covers_filtered_set() {
    let _guard = common::LISTING_LOCK.lock().await;
    let pool = common::setup().await;
    let repo = QuestionnaireRepository::new(pool.clone());
    let (token, ids) = seed_questionnaires(&repo, 45).await;

    let (first, page_max) = repo
        .get_questionnaires("dave", "", &token, "", false)
        .await
        .unwrap();
    assert_eq!(page_max, 3);
    assert_eq!(first.len(), 20);

    let (last, _) = repo
        .get_questionnaires("dave", "", &token, "3", false)
        .await
        .unwrap();
    assert_eq!(last.len(), 5);

    let rows = walk_all_pages(&repo, "", &token).await;
    let seen: HashSet<i32> = rows.iter().map(|r| r.questionnaire.id).collect();
    assert_eq!(rows.len(), 45);
    assert_eq!(seen, ids.iter().copied().collect::<HashSet<_>>());

    let err = repo
        .get_questionnaires("dave", "", &token, "4", false)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    common::purge_all(&pool, &ids).await;
}

#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_title_sort_reverses() {
    let _guard = common::LISTING_LOCK.lock().await;
    let pool = common::setup().await;
    let repo = QuestionnaireRepository::new(pool.clone());
    let (token, ids) = seed_questionnaires(&repo, 25).await;

    let ascending: Vec<i32> = walk_all_pages(&repo, "title", &token)
        .await
        .iter()
        .map(|r| r.questionnaire.id)
        .collect();
    let mut descending: Vec<i32> = walk_all_pages(&repo, "-title", &token)
        .await
        .iter()
        .map(|r| r.questionnaire.id)
        .collect();
    descending.reverse();

    assert_eq!(ascending.len(), 25);
    assert_eq!(ascending, descending);
    assert_eq!(ascending, ids);

    common::purge_all(&pool, &ids).await;
}

#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_invalid_listing_arguments() {
    let _guard = common::LISTING_LOCK.lock().await;
    let pool = common::setup().await;
    let repo = QuestionnaireRepository::new(pool);

    for page in ["0", "-1", "abc"] {
        let err = repo
            .get_questionnaires("dave", "", "", page, false)
            .await
            .unwrap_err();
        assert!(
            matches!(err, SurveyError::InvalidArgument { .. }),
            "page {:?} should be rejected",
            page
        );
    }

    let err = repo
        .get_questionnaires("dave", "popularity", "", "1", false)
        .await
        .unwrap_err();
    assert!(matches!(err, SurveyError::InvalidArgument { .. }));

    let err = repo
        .get_questionnaires("dave", "", "(unclosed", "1", false)
        .await
        .unwrap_err();
    assert!(matches!(err, SurveyError::InvalidArgument { .. }));

    let err = repo
        .get_questionnaires("dave", "", &unique_title("no match"), "1", false)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_targeted_flag_and_nontargeted_filter() {
    let _guard = common::LISTING_LOCK.lock().await;
    let pool = common::setup().await;
    let repo = QuestionnaireRepository::new(pool.clone());
    let target_repo = TargetRepository::new(pool.clone());
    let (token, ids) = seed_questionnaires(&repo, 3).await;
    let erin = test_user_id("erin");

    target_repo
        .insert_targets(ids[0], &[erin.clone()])
        .await
        .unwrap();
    target_repo
        .insert_targets(ids[1], &[WILDCARD_USER.to_string()])
        .await
        .unwrap();

    let (rows, _) = repo
        .get_questionnaires(&erin, "", &token, "1", false)
        .await
        .unwrap();
    let targeted: Vec<bool> = rows.iter().map(|r| r.is_targeted).collect();
    assert_eq!(targeted, vec![true, true, false]);

    let (rows, page_max) = repo
        .get_questionnaires(&erin, "", &token, "1", true)
        .await
        .unwrap();
    assert_eq!(page_max, 1);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].questionnaire.id, ids[2]);

    common::purge_all(&pool, &ids).await;
}

#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_questionnaire_lifecycle() {
    let _guard = common::LISTING_LOCK.lock().await;
    let pool = common::setup().await;
    let repo = QuestionnaireRepository::new(pool.clone());

    let mut input = common::questionnaire_due_in("life", chrono::Duration::hours(2));
    let title = input.title.clone();
    let id = repo.insert_questionnaire(&input).await.unwrap();

    let stored = repo.get_questionnaire(id).await.unwrap();
    assert_eq!(stored.title, title);
    assert_eq!(stored.res_shared_to, ResSharedTo::Public);
    assert!(repo.get_questionnaire_limit(id).await.unwrap().is_some());

    // 清除截止时间
    input.res_time_limit = None;
    input.res_shared_to = ResSharedTo::Respondents;
    repo.update_questionnaire(id, &input).await.unwrap();
    assert_eq!(repo.get_questionnaire_limit(id).await.unwrap(), None);
    assert_eq!(
        repo.get_res_shared(id).await.unwrap(),
        ResSharedTo::Respondents
    );

    let title_and_limit = repo.get_title_and_limit(id).await.unwrap().unwrap();
    assert_eq!(title_and_limit.title, title);
    assert_eq!(title_and_limit.res_time_limit, None);

    // 重名冲突
    let err = repo.insert_questionnaire(&input).await.unwrap_err();
    assert!(matches!(err, SurveyError::Conflict(_)));

    repo.delete_questionnaire(id).await.unwrap();
    let err = repo.get_questionnaire(id).await.unwrap_err();
    assert!(matches!(err, SurveyError::QuestionnaireNotFound(_)));
    assert_eq!(repo.get_title_and_limit(id).await.unwrap(), None);

    repo.purge_questionnaire(id).await.unwrap();
    let err = repo.purge_questionnaire(id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_unsearched_page_walk_under_each_sort() {
    let _guard = common::LISTING_LOCK.lock().await;
    let pool = common::setup().await;
    let repo = QuestionnaireRepository::new(pool.clone());
    let (_, ids) = seed_questionnaires(&repo, 25).await;
    let seeded: HashSet<i32> = ids.iter().copied().collect();

    let live =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questionnaires WHERE deleted_at IS NULL")
            .fetch_one(&pool)
            .await
            .unwrap();

    let sorts = [
        "",
        "created_at",
        "-created_at",
        "title",
        "-title",
        "modified_at",
        "-modified_at",
    ];
    for sort in sorts {
        let walked = ids_of(&walk_pages_as(&repo, "dave", sort, "", false).await);
        let unique: HashSet<i32> = walked.iter().copied().collect();

        assert_eq!(walked.len() as i64, live, "sort {:?} lost or repeated rows", sort);
        assert_eq!(unique.len(), walked.len(), "sort {:?} repeated a row", sort);
        assert!(seeded.is_subset(&unique), "sort {:?} skipped seeded rows", sort);
    }

    // 无排序键时按 id 升序
    let by_id = ids_of(&walk_pages_as(&repo, "dave", "", "", false).await);
    let mut sorted = by_id.clone();
    sorted.sort_unstable();
    assert_eq!(by_id, sorted);

    let (_, page_max) = repo
        .get_questionnaires("dave", "", "", "1", false)
        .await
        .unwrap();
    let err = repo
        .get_questionnaires("dave", "", "", &(page_max + 1).to_string(), false)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    common::purge_all(&pool, &ids).await;
}

#[tokio::test]
#[ignore] // 需要数据库连接
async fn test_unsearched_listing_targeting() {
    let _guard = common::LISTING_LOCK.lock().await;
    let pool = common::setup().await;
    let repo = QuestionnaireRepository::new(pool.clone());
    let target_repo = TargetRepository::new(pool.clone());
    let (_, ids) = seed_questionnaires(&repo, 3).await;
    let frank = test_user_id("frank");

    target_repo
        .insert_targets(ids[0], &[frank.clone()])
        .await
        .unwrap();
    target_repo
        .insert_targets(ids[1], &[WILDCARD_USER.to_string()])
        .await
        .unwrap();

    let rows = walk_pages_as(&repo, &frank, "-created_at", "", false).await;
    let flag = |id: i32| {
        rows.iter()
            .find(|r| r.questionnaire.id == id)
            .map(|r| r.is_targeted)
            .unwrap()
    };
    assert!(flag(ids[0]));
    assert!(flag(ids[1]));
    assert!(!flag(ids[2]));

    let nontargeted = walk_pages_as(&repo, &frank, "", "", true).await;
    assert!(nontargeted.iter().all(|r| !r.is_targeted));
    let listed: HashSet<i32> = ids_of(&nontargeted).into_iter().collect();
    assert!(!listed.contains(&ids[0]));
    assert!(!listed.contains(&ids[1]));
    assert!(listed.contains(&ids[2]));

    common::purge_all(&pool, &ids).await;
}
