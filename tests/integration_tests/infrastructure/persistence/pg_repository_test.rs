#[path = "../../../helpers/test_postgres.rs"]
mod test_postgres;

use call_quality::application::ports::{
    CallRepository, ChecklistProvider, ChecklistRepository, RepositoryError, StatusUpdate,
};
use call_quality::domain::{
    AnalysisStatus, Call, ChecklistItem, ChecklistItemId, ChecklistItemPatch, CriterionScore,
    RunToken, Score, UserId,
};

use test_postgres::TestPostgres;

async fn seed(test_pg: &TestPostgres, count: usize) -> (Call, Vec<ChecklistItem>) {
    let mut items = Vec::with_capacity(count);
    for i in 0..count {
        let item = ChecklistItem::new(format!("Категория {i}"), format!("Критерий {i}"), i as i32);
        test_pg
            .checklist_repository
            .create(&item)
            .await
            .expect("Failed to create checklist item");
        items.push(item);
    }

    let call = Call::new(UserId::new(), None, "local://m/1-call.mp3".to_string());
    test_pg
        .call_repository
        .create(&call)
        .await
        .expect("Failed to create call");

    (call, items)
}

async fn begin_analyzing(test_pg: &TestPostgres, call: &Call) -> RunToken {
    let token = RunToken::new();
    let repo = &test_pg.call_repository;
    repo.begin_run(call.id, token).await.unwrap();
    repo.update_status(call.id, token, StatusUpdate::to(AnalysisStatus::Analyzing))
        .await
        .unwrap();
    token
}

fn rows(call: &Call, items: &[ChecklistItem]) -> Vec<CriterionScore> {
    items
        .iter()
        .map(|i| CriterionScore {
            call_id: call.id,
            criterion_id: i.id,
            passed: true,
            ai_comment: format!("ok {}", i.criterion),
        })
        .collect()
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn given_new_call_when_creating_and_retrieving_then_call_is_persisted_pending() {
    let test_pg = TestPostgres::new().await;
    let (call, _) = seed(&test_pg, 0).await;

    let retrieved = test_pg
        .call_repository
        .get_by_id(call.id)
        .await
        .expect("Failed to retrieve call")
        .expect("Call not found");

    assert_eq!(retrieved.id, call.id);
    assert_eq!(retrieved.manager_id, call.manager_id);
    assert_eq!(retrieved.status, AnalysisStatus::Pending);
    assert!(retrieved.run_token.is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn given_full_run_when_completing_then_scores_are_replaced_atomically() {
    let test_pg = TestPostgres::new().await;
    let (call, items) = seed(&test_pg, 5).await;
    let repo = &test_pg.call_repository;

    let first = RunToken::new();
    repo.begin_run(call.id, first).await.unwrap();
    repo.update_status(
        call.id,
        first,
        StatusUpdate::to(AnalysisStatus::Analyzing).with_transcript("первый"),
    )
    .await
    .unwrap();
    repo.complete_run(
        call.id,
        first,
        Score::new(90).unwrap(),
        "первый",
        &rows(&call, &items),
    )
    .await
    .unwrap();
    assert_eq!(repo.criterion_scores(call.id).await.unwrap().len(), 5);

    let second = begin_analyzing(&test_pg, &call).await;
    repo.complete_run(
        call.id,
        second,
        Score::new(40).unwrap(),
        "второй",
        &rows(&call, &items[..3]),
    )
    .await
    .unwrap();

    let stored = repo.get_by_id(call.id).await.unwrap().unwrap();
    assert_eq!(stored.status, AnalysisStatus::Done);
    assert_eq!(stored.score.map(|s| s.value()), Some(40));
    assert_eq!(stored.summary.as_deref(), Some("второй"));
    assert!(stored.transcript.is_none());

    let views = repo.criterion_scores(call.id).await.unwrap();
    assert_eq!(views.len(), 3);
    assert_eq!(views[0].category, "Категория 0");
    assert_eq!(views[0].ai_comment, "ok Критерий 0");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn given_stale_token_when_completing_then_nothing_is_written() {
    let test_pg = TestPostgres::new().await;
    let (call, items) = seed(&test_pg, 2).await;
    let repo = &test_pg.call_repository;

    let old = RunToken::new();
    repo.begin_run(call.id, old).await.unwrap();
    repo.begin_run(call.id, RunToken::new()).await.unwrap();

    let result = repo
        .complete_run(
            call.id,
            old,
            Score::new(10).unwrap(),
            "late",
            &rows(&call, &items),
        )
        .await;

    assert!(matches!(result, Err(RepositoryError::StaleRun(_))));
    let stored = repo.get_by_id(call.id).await.unwrap().unwrap();
    assert_eq!(stored.status, AnalysisStatus::Transcribing);
    assert!(repo.criterion_scores(call.id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn given_unknown_criterion_when_completing_then_transaction_rolls_back() {
    let test_pg = TestPostgres::new().await;
    let (call, items) = seed(&test_pg, 2).await;
    let repo = &test_pg.call_repository;

    let token = begin_analyzing(&test_pg, &call).await;

    let mut scores = rows(&call, &items);
    scores.push(CriterionScore {
        call_id: call.id,
        criterion_id: ChecklistItemId::new(),
        passed: false,
        ai_comment: String::new(),
    });

    let result = repo
        .complete_run(call.id, token, Score::new(50).unwrap(), "s", &scores)
        .await;

    assert!(matches!(
        result,
        Err(RepositoryError::ConstraintViolation(_))
    ));
    let stored = repo.get_by_id(call.id).await.unwrap().unwrap();
    assert_eq!(stored.status, AnalysisStatus::Analyzing);
    assert!(stored.score.is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn given_error_update_when_applied_then_summary_is_kept_and_score_stays_null() {
    let test_pg = TestPostgres::new().await;
    let (call, _) = seed(&test_pg, 0).await;
    let repo = &test_pg.call_repository;

    let token = RunToken::new();
    repo.begin_run(call.id, token).await.unwrap();
    repo.update_status(
        call.id,
        token,
        StatusUpdate::to(AnalysisStatus::Error).with_summary("Чеклист пуст"),
    )
    .await
    .unwrap();

    let stored = repo.get_by_id(call.id).await.unwrap().unwrap();
    assert_eq!(stored.status, AnalysisStatus::Error);
    assert_eq!(stored.summary.as_deref(), Some("Чеклист пуст"));
    assert!(stored.score.is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn given_checklist_edits_when_reading_active_then_order_and_activity_are_respected() {
    let test_pg = TestPostgres::new().await;
    let (call, items) = seed(&test_pg, 3).await;
    let checklist = &test_pg.checklist_repository;

    checklist
        .update(
            items[0].id,
            ChecklistItemPatch {
                is_active: Some(false),
                ..ChecklistItemPatch::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    checklist
        .update(
            items[2].id,
            ChecklistItemPatch {
                order_index: Some(-1),
                ..ChecklistItemPatch::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    let active = checklist.active_criteria().await.unwrap();
    let ids: Vec<ChecklistItemId> = active.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![items[2].id, items[1].id]);

    let token = begin_analyzing(&test_pg, &call).await;
    let repo = &test_pg.call_repository;
    repo.complete_run(
        call.id,
        token,
        Score::new(100).unwrap(),
        "s",
        &rows(&call, &items[1..]),
    )
    .await
    .unwrap();

    assert!(checklist.delete(items[1].id).await.unwrap());
    assert!(!checklist.delete(items[1].id).await.unwrap());
    assert_eq!(repo.criterion_scores(call.id).await.unwrap().len(), 1);
    assert_eq!(checklist.list_all().await.unwrap().len(), 2);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn given_transcribing_call_when_completing_then_transition_is_rejected_and_rolled_back() {
    let test_pg = TestPostgres::new().await;
    let (call, items) = seed(&test_pg, 2).await;
    let repo = &test_pg.call_repository;

    let token = RunToken::new();
    repo.begin_run(call.id, token).await.unwrap();

    let result = repo
        .complete_run(call.id, token, Score::new(60).unwrap(), "s", &rows(&call, &items))
        .await;

    assert!(matches!(
        result,
        Err(RepositoryError::InvalidTransition {
            from: AnalysisStatus::Transcribing,
            to: AnalysisStatus::Done,
            ..
        })
    ));
    let stored = repo.get_by_id(call.id).await.unwrap().unwrap();
    assert_eq!(stored.status, AnalysisStatus::Transcribing);
    assert!(repo.criterion_scores(call.id).await.unwrap().is_empty());
}
