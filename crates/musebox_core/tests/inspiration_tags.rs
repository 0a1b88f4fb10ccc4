use musebox_core::db::open_db_in_memory;
use musebox_core::{
    InspirationService, InspirationServiceError, SqliteInspirationRepository, SqliteTagRepository,
    Tag, TagRepository, TagService,
};

#[test]
fn set_tags_replaces_full_set_with_lowercase_normalization() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteInspirationRepository::try_new(&mut conn).unwrap();
    let mut service = InspirationService::new(repo);
    let created = service.capture_note("tag target", None).unwrap();

    let after_first = service
        .set_tags(
            created.uuid,
            vec![
                "Work".to_string(),
                "IMPORTANT".to_string(),
                "work".to_string(),
            ],
        )
        .unwrap();
    assert_eq!(
        after_first.tags,
        vec!["important".to_string(), "work".to_string()]
    );

    let after_replace = service
        .set_tags(created.uuid, vec!["Personal".to_string()])
        .unwrap();
    assert_eq!(after_replace.tags, vec!["personal".to_string()]);
}

#[test]
fn set_tags_rejects_blank_tag_values() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteInspirationRepository::try_new(&mut conn).unwrap();
    let mut service = InspirationService::new(repo);
    let created = service.capture_note("tag target", None).unwrap();

    let err = service
        .set_tags(created.uuid, vec!["   ".to_string()])
        .unwrap_err();
    assert!(matches!(err, InspirationServiceError::InvalidTag(_)));
}

#[test]
fn list_supports_single_tag_filter() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteInspirationRepository::try_new(&mut conn).unwrap();
    let mut service = InspirationService::new(repo);

    let tagged = service.capture_note("work note", None).unwrap();
    let other = service.capture_note("other note", None).unwrap();
    service
        .set_tags(tagged.uuid, vec!["Work".to_string()])
        .unwrap();
    service
        .set_tags(other.uuid, vec!["Personal".to_string()])
        .unwrap();

    let filtered = service
        .list(None, Some("WORK".to_string()), Some(10), 0)
        .unwrap();
    assert_eq!(filtered.items.len(), 1);
    assert_eq!(filtered.items[0].uuid, tagged.uuid);
}

#[test]
fn set_tags_reuses_existing_tag_rows() {
    let mut conn = open_db_in_memory().unwrap();

    let custom = {
        let tag_repo = SqliteTagRepository::try_new(&conn).unwrap();
        let tag_service = TagService::new(tag_repo);
        tag_service
            .create("Reading", Some("#FF6B00".to_string()))
            .unwrap()
    };

    {
        let repo = SqliteInspirationRepository::try_new(&mut conn).unwrap();
        let mut service = InspirationService::new(repo);
        let created = service.capture_note("article", None).unwrap();
        service
            .set_tags(created.uuid, vec!["READING".to_string()])
            .unwrap();
    }

    // Linking reuses the existing row instead of minting a duplicate, so
    // the user-picked color survives.
    let tag_repo = SqliteTagRepository::try_new(&conn).unwrap();
    let tag_service = TagService::new(tag_repo);
    let tags = tag_service.list().unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].uuid, custom.uuid);
    assert_eq!(tags[0].color, "#FF6B00");
}

#[test]
fn duplicate_tag_names_may_coexist() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTagRepository::try_new(&conn).unwrap();

    let mut first = Tag::new("inbox", None);
    first.created_at = 1_000;
    let mut second = Tag::new("Inbox", None);
    second.created_at = 2_000;
    repo.create(&first).unwrap();
    repo.create(&second).unwrap();

    let listed = repo.list().unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|tag| tag.name == "inbox"));

    // Name lookup resolves to the oldest row by convention.
    let resolved = repo.find_by_name("INBOX").unwrap().unwrap();
    assert_eq!(resolved.uuid, first.uuid);
}

#[test]
fn deleting_a_tag_drops_its_links_but_not_inspirations() {
    let mut conn = open_db_in_memory().unwrap();

    let inspiration = {
        let repo = SqliteInspirationRepository::try_new(&mut conn).unwrap();
        let mut service = InspirationService::new(repo);
        let created = service.capture_note("keep me", None).unwrap();
        service
            .set_tags(created.uuid, vec!["fleeting".to_string()])
            .unwrap()
    };

    {
        let tag_repo = SqliteTagRepository::try_new(&conn).unwrap();
        let tag_service = TagService::new(tag_repo);
        let tag = tag_service.find_by_name("fleeting").unwrap().unwrap();
        tag_service.delete(tag.uuid).unwrap();
    }

    let repo = SqliteInspirationRepository::try_new(&mut conn).unwrap();
    let service = InspirationService::new(repo);
    let reloaded = service.get(inspiration.uuid).unwrap().unwrap();
    assert!(reloaded.tags.is_empty());
}
