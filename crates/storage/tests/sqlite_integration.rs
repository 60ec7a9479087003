use course_core::model::{
    AnswerKey, BadgeId, LessonId, ProjectSubmission, QuizSubmission, ReviewDecision, Topic,
    TopicResults,
};
use course_core::time::fixed_now;
use serde_json::json;
use storage::keys;
use storage::{KeyValueStore, SqliteStore, Storage};

fn pending(topic: &str, answers: Vec<u8>) -> QuizSubmission {
    let key = AnswerKey::new(vec![0; answers.len()]);
    QuizSubmission::new_pending(Topic::new(topic).unwrap(), "Alae", answers, &key, fixed_now())
        .unwrap()
}

#[tokio::test]
async fn sqlite_kv_get_set_and_overwrite() {
    let store = SqliteStore::connect("sqlite:file:memdb_kv?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("migrate");

    assert_eq!(store.get("missing").await.unwrap(), None);

    store.set("k", json!([1, 2, 3])).await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), Some(json!([1, 2, 3])));

    store.set("k", json!({"a": true})).await.unwrap();
    assert_eq!(store.get("k").await.unwrap(), Some(json!({"a": true})));
}

#[tokio::test]
async fn sqlite_migrate_is_idempotent() {
    let store = SqliteStore::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("first migrate");
    store.set("k", json!("v")).await.unwrap();
    store.migrate().await.expect("second migrate");
    assert_eq!(store.get("k").await.unwrap(), Some(json!("v")));
}

#[tokio::test]
async fn sqlite_storage_persists_course_state() {
    let storage = Storage::sqlite("sqlite:file:memdb_state?mode=memory&cache=shared")
        .await
        .expect("storage");

    storage
        .save_completed_lessons(&[
            LessonId::new("html-basics").unwrap(),
            LessonId::new("css-basics").unwrap(),
        ])
        .await
        .unwrap();

    let mut submission = pending("html", vec![0, 0, 1]);
    let result = submission
        .review(ReviewDecision::Pass, 2, "Tatawi", Some("good"), fixed_now())
        .unwrap();
    let mut results = TopicResults::new();
    results.insert(submission.topic.clone(), vec![result]);
    storage
        .record_review(&results, &[submission.clone(), pending("css", vec![1])])
        .await
        .unwrap();

    let project = ProjectSubmission::new("<main></main>", "", "", fixed_now());
    storage
        .record_project(&[project.clone()], &[BadgeId::new("project-completed").unwrap()])
        .await
        .unwrap();

    let snapshot = storage.profile_snapshot("Alae").await.unwrap();
    assert_eq!(snapshot.completed_lessons.len(), 2);
    assert_eq!(snapshot.results, results);
    assert_eq!(snapshot.badges.len(), 1);

    let submissions = storage.quiz_submissions().await.unwrap();
    assert_eq!(submissions.len(), 2);
    assert_eq!(submissions[0], submission);
    assert_eq!(storage.project_submissions().await.unwrap(), vec![project]);
}

#[tokio::test]
async fn sqlite_rows_hold_plain_json_text() {
    let store = SqliteStore::connect("sqlite:file:memdb_text?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("migrate");
    let storage = Storage::new(std::sync::Arc::new(store.clone()));
    storage
        .save_completed_lessons(&[LessonId::new("js-dom").unwrap()])
        .await
        .unwrap();

    let text: String = sqlx::query_scalar("SELECT value FROM kv WHERE key = ?1")
        .bind(keys::COMPLETED_LESSONS)
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(text, r#"["js-dom"]"#);
}

#[tokio::test]
async fn sqlite_set_many_writes_nothing_when_one_key_fails() {
    let store = SqliteStore::connect("sqlite:file:memdb_atomic?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("migrate");

    sqlx::query(
        r"
            CREATE TRIGGER reject_submissions BEFORE INSERT ON kv
            WHEN NEW.key = 'quizSubmissions'
            BEGIN
                SELECT RAISE(ABORT, 'submissions are read only');
            END;
        ",
    )
    .execute(store.pool())
    .await
    .unwrap();

    let err = store
        .set_many(vec![
            (keys::QUIZ_RESULTS, json!({"html": []})),
            (keys::QUIZ_SUBMISSIONS, json!([])),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, storage::StorageError::Connection(_)));

    assert_eq!(store.get(keys::QUIZ_RESULTS).await.unwrap(), None);
    assert_eq!(store.get(keys::QUIZ_SUBMISSIONS).await.unwrap(), None);
}
