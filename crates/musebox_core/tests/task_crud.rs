use musebox_core::db::open_db_in_memory;
use musebox_core::{
    CreateTaskRequest, InspirationService, RepoError, SqliteInspirationRepository,
    SqliteTaskRepository, TaskItem, TaskListQuery, TaskRepository, TaskService, TaskServiceError,
    TaskStatus, ValidationError,
};

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let service = TaskService::new(repo);

    let created = service
        .create(CreateTaskRequest {
            title: "write outline".to_string(),
            details: Some("three sections".to_string()),
            due_at: Some(1_700_000_000_000),
            ..CreateTaskRequest::default()
        })
        .unwrap();

    assert_eq!(created.status, TaskStatus::Pending);
    assert_eq!(created.details.as_deref(), Some("three sections"));
    assert_eq!(created.due_at, Some(1_700_000_000_000));

    let loaded = service.get(created.uuid).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn create_rejects_blank_title() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let service = TaskService::new(repo);

    let err = service
        .create(CreateTaskRequest {
            title: "  ".to_string(),
            ..CreateTaskRequest::default()
        })
        .unwrap_err();
    assert!(matches!(
        err,
        TaskServiceError::Repo(RepoError::Validation(ValidationError::EmptyTitle { .. }))
    ));
}

#[test]
fn status_transitions_update_counts() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let service = TaskService::new(repo);

    let first = service
        .create(CreateTaskRequest {
            title: "first".to_string(),
            ..CreateTaskRequest::default()
        })
        .unwrap();
    let second = service
        .create(CreateTaskRequest {
            title: "second".to_string(),
            ..CreateTaskRequest::default()
        })
        .unwrap();
    service
        .create(CreateTaskRequest {
            title: "third".to_string(),
            ..CreateTaskRequest::default()
        })
        .unwrap();

    let started = service
        .set_status(first.uuid, TaskStatus::InProgress)
        .unwrap();
    assert_eq!(started.status, TaskStatus::InProgress);
    let finished = service
        .set_status(second.uuid, TaskStatus::Completed)
        .unwrap();
    assert_eq!(finished.status, TaskStatus::Completed);

    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let total = repo.count_all().unwrap();
    let pending = repo.count_by_status(TaskStatus::Pending).unwrap();
    let in_progress = repo.count_by_status(TaskStatus::InProgress).unwrap();
    let completed = repo.count_by_status(TaskStatus::Completed).unwrap();

    assert_eq!(total, 3);
    assert_eq!(pending + in_progress + completed, total);
    assert_eq!((pending, in_progress, completed), (1, 1, 1));
}

#[test]
fn list_filters_by_status_and_inspiration() {
    let mut conn = open_db_in_memory().unwrap();

    let inspiration = {
        let repo = SqliteInspirationRepository::try_new(&mut conn).unwrap();
        let service = InspirationService::new(repo);
        service.capture_note("source", None).unwrap()
    };

    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let service = TaskService::new(repo);

    let linked = service
        .create(CreateTaskRequest {
            title: "linked".to_string(),
            inspiration: Some(inspiration.uuid),
            ..CreateTaskRequest::default()
        })
        .unwrap();
    let standalone = service
        .create(CreateTaskRequest {
            title: "standalone".to_string(),
            ..CreateTaskRequest::default()
        })
        .unwrap();
    service
        .set_status(standalone.uuid, TaskStatus::Completed)
        .unwrap();

    let for_inspiration = service
        .list(&TaskListQuery {
            inspiration: Some(inspiration.uuid),
            ..TaskListQuery::default()
        })
        .unwrap();
    assert_eq!(for_inspiration.len(), 1);
    assert_eq!(for_inspiration[0].uuid, linked.uuid);

    let completed = service
        .list(&TaskListQuery {
            status: Some(TaskStatus::Completed),
            ..TaskListQuery::default()
        })
        .unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].uuid, standalone.uuid);
}

#[test]
fn link_and_unlink_inspiration() {
    let mut conn = open_db_in_memory().unwrap();

    let inspiration = {
        let repo = SqliteInspirationRepository::try_new(&mut conn).unwrap();
        let service = InspirationService::new(repo);
        service.capture_note("source", None).unwrap()
    };

    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let service = TaskService::new(repo);
    let task = service
        .create(CreateTaskRequest {
            title: "floating".to_string(),
            ..CreateTaskRequest::default()
        })
        .unwrap();
    assert_eq!(task.inspiration_uuid, None);

    let linked = service
        .link_inspiration(task.uuid, inspiration.uuid)
        .unwrap();
    assert_eq!(linked.inspiration_uuid, Some(inspiration.uuid));

    let unlinked = service.unlink_inspiration(task.uuid).unwrap();
    assert_eq!(unlinked.inspiration_uuid, None);
}

#[test]
fn update_replaces_fields_and_reports_missing_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let service = TaskService::new(repo);

    let mut task = service
        .create(CreateTaskRequest {
            title: "draft".to_string(),
            ..CreateTaskRequest::default()
        })
        .unwrap();

    task.title = "final".to_string();
    task.status = TaskStatus::InProgress;
    task.remind_at = Some(1_800_000_000_000);
    let updated = service.update(&task).unwrap();
    assert_eq!(updated.title, "final");
    assert_eq!(updated.status, TaskStatus::InProgress);
    assert_eq!(updated.remind_at, Some(1_800_000_000_000));

    let ghost = TaskItem::new("ghost");
    assert!(matches!(
        service.update(&ghost).unwrap_err(),
        TaskServiceError::NotFound(id) if id == ghost.uuid
    ));
}

#[test]
fn delete_removes_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let service = TaskService::new(repo);

    let task = service
        .create(CreateTaskRequest {
            title: "temp".to_string(),
            ..CreateTaskRequest::default()
        })
        .unwrap();
    service.delete(task.uuid).unwrap();
    assert_eq!(service.get(task.uuid).unwrap(), None);

    assert!(matches!(
        service.delete(task.uuid).unwrap_err(),
        TaskServiceError::NotFound(id) if id == task.uuid
    ));
}

#[test]
fn invalid_persisted_status_is_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let task = TaskItem::new("mangled");
    repo.create(&task).unwrap();

    conn.execute(
        "UPDATE tasks SET status = 'paused' WHERE uuid = ?1;",
        [task.uuid.to_string()],
    )
    .unwrap();

    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let err = repo.get(task.uuid).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
