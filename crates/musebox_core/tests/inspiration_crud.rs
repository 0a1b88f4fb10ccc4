use musebox_core::db::open_db_in_memory;
use musebox_core::{
    CreateTaskRequest, Inspiration, InspirationKind, InspirationListQuery, InspirationRepository,
    InspirationService, RepoError, SqliteInspirationRepository, SqliteTaskRepository, TaskService,
    ValidationError,
};

#[test]
fn create_and_get_roundtrip() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteInspirationRepository::try_new(&mut conn).unwrap();

    let mut inspiration = Inspiration::new(InspirationKind::Url, "rust blog post");
    inspiration.url = Some("https://example.com/post".to_string());
    let id = repo.create(&inspiration).unwrap();

    let loaded = repo.get(id).unwrap().unwrap();
    assert_eq!(loaded.uuid, inspiration.uuid);
    assert_eq!(loaded.kind, InspirationKind::Url);
    assert_eq!(loaded.title, "rust blog post");
    assert_eq!(loaded.url.as_deref(), Some("https://example.com/post"));
    assert_eq!(loaded.task_count, 0);
    assert!(!loaded.is_organized());
}

#[test]
fn create_rejects_invalid_records() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteInspirationRepository::try_new(&mut conn).unwrap();

    let blank_title = Inspiration::new(InspirationKind::Note, "   ");
    assert!(matches!(
        repo.create(&blank_title).unwrap_err(),
        RepoError::Validation(ValidationError::EmptyTitle { .. })
    ));

    let missing_url = Inspiration::new(InspirationKind::Video, "talk");
    assert!(matches!(
        repo.create(&missing_url).unwrap_err(),
        RepoError::Validation(ValidationError::MissingUrl { .. })
    ));
}

#[test]
fn update_replaces_fields_and_reports_missing_rows() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteInspirationRepository::try_new(&mut conn).unwrap();

    let mut inspiration = Inspiration::new(InspirationKind::Note, "draft");
    repo.create(&inspiration).unwrap();

    inspiration.title = "polished".to_string();
    inspiration.content = Some("body".to_string());
    repo.update(&inspiration).unwrap();

    let loaded = repo.get(inspiration.uuid).unwrap().unwrap();
    assert_eq!(loaded.title, "polished");
    assert_eq!(loaded.content.as_deref(), Some("body"));

    let missing = Inspiration::new(InspirationKind::Note, "ghost");
    assert!(matches!(
        repo.update(&missing).unwrap_err(),
        RepoError::NotFound(id) if id == missing.uuid
    ));
}

#[test]
fn list_filters_by_kind_and_orders_newest_first() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteInspirationRepository::try_new(&mut conn).unwrap();

    let mut older = Inspiration::new(InspirationKind::Note, "older note");
    older.created_at = 1_000;
    let mut newer = Inspiration::new(InspirationKind::Note, "newer note");
    newer.created_at = 2_000;
    let mut video = Inspiration::new(InspirationKind::Video, "video");
    video.url = Some("https://example.com/v".to_string());
    video.created_at = 3_000;

    repo.create(&older).unwrap();
    repo.create(&newer).unwrap();
    repo.create(&video).unwrap();

    let notes = repo
        .list(&InspirationListQuery {
            kind: Some(InspirationKind::Note),
            ..InspirationListQuery::default()
        })
        .unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].uuid, newer.uuid);
    assert_eq!(notes[1].uuid, older.uuid);

    let all = repo.list(&InspirationListQuery::default()).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].uuid, video.uuid);
}

#[test]
fn list_limit_defaults_to_20_and_caps_at_100() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let repo = SqliteInspirationRepository::try_new(&mut conn).unwrap();
        let service = InspirationService::new(repo);
        for idx in 0..120 {
            service.capture_note(format!("note {idx}"), None).unwrap();
        }
    }

    let repo = SqliteInspirationRepository::try_new(&mut conn).unwrap();
    let service = InspirationService::new(repo);

    let defaulted = service.list(None, None, None, 0).unwrap();
    assert_eq!(defaulted.applied_limit, 20);
    assert_eq!(defaulted.items.len(), 20);

    let capped = service.list(None, None, Some(500), 0).unwrap();
    assert_eq!(capped.applied_limit, 100);
    assert_eq!(capped.items.len(), 100);
}

#[test]
fn deleting_an_inspiration_unlinks_its_tasks() {
    let mut conn = open_db_in_memory().unwrap();

    let inspiration = {
        let repo = SqliteInspirationRepository::try_new(&mut conn).unwrap();
        let service = InspirationService::new(repo);
        service.capture_note("to organize", None).unwrap()
    };

    let task = {
        let repo = SqliteTaskRepository::try_new(&conn).unwrap();
        let service = TaskService::new(repo);
        service
            .create(CreateTaskRequest {
                title: "derived task".to_string(),
                inspiration: Some(inspiration.uuid),
                ..CreateTaskRequest::default()
            })
            .unwrap()
    };
    assert_eq!(task.inspiration_uuid, Some(inspiration.uuid));

    {
        let repo = SqliteInspirationRepository::try_new(&mut conn).unwrap();
        let organized = repo.count_organized().unwrap();
        assert_eq!(organized, 1);
        repo.delete(inspiration.uuid).unwrap();
        assert_eq!(repo.get(inspiration.uuid).unwrap(), None);
    }

    // The task survives with a cleared back-reference.
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let service = TaskService::new(repo);
    let survivor = service.get(task.uuid).unwrap().unwrap();
    assert_eq!(survivor.inspiration_uuid, None);
}

#[test]
fn delete_missing_inspiration_returns_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteInspirationRepository::try_new(&mut conn).unwrap();

    let ghost = Inspiration::new(InspirationKind::Note, "ghost");
    assert!(matches!(
        repo.delete(ghost.uuid).unwrap_err(),
        RepoError::NotFound(id) if id == ghost.uuid
    ));
}

#[test]
fn organized_and_unorganized_counts_partition_totals() {
    let mut conn = open_db_in_memory().unwrap();

    let (first, _second) = {
        let repo = SqliteInspirationRepository::try_new(&mut conn).unwrap();
        let service = InspirationService::new(repo);
        (
            service.capture_note("first", None).unwrap(),
            service.capture_note("second", None).unwrap(),
        )
    };

    {
        let repo = SqliteTaskRepository::try_new(&conn).unwrap();
        let service = TaskService::new(repo);
        service
            .create(CreateTaskRequest {
                title: "organize first".to_string(),
                inspiration: Some(first.uuid),
                ..CreateTaskRequest::default()
            })
            .unwrap();
    }

    let repo = SqliteInspirationRepository::try_new(&mut conn).unwrap();
    let total = repo.count_all().unwrap();
    let organized = repo.count_organized().unwrap();
    let unorganized = repo.count_unorganized().unwrap();
    assert_eq!(total, 2);
    assert_eq!(organized, 1);
    assert_eq!(organized + unorganized, total);

    let record = repo.get(first.uuid).unwrap().unwrap();
    assert!(record.is_organized());
}
