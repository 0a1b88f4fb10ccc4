//! FFI use-case API for the mobile shell.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Keep error semantics simple for UI integration.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Return values are plain-data envelopes with stable meaning.

use musebox_core::db::open_db;
use musebox_core::{
    core_version as core_version_inner, dashboard_snapshot, init_logging as init_logging_inner,
    needs_reminder, ping as ping_inner, scrape, CreateTaskRequest, InspirationKind,
    InspirationRecord, InspirationService, RecordingGateway, ReminderFrequency, ReminderScheduler,
    ReminderSettings, SettingsStore, SqliteInspirationRepository, SqliteTaskRepository,
    TaskService,
};
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

static STORE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Binds the process-wide store database path.
///
/// Must be called once before any capture/list/dashboard function.
/// Subsequent calls with the same path are idempotent.
#[flutter_rust_bridge::frb(sync)]
pub fn bind_store(db_path: String) -> String {
    let candidate = PathBuf::from(db_path);
    let bound = STORE_DB_PATH.get_or_init(|| candidate.clone());
    if bound == &candidate {
        String::new()
    } else {
        format!(
            "store already bound to `{}`; refusing to switch to `{}`",
            bound.display(),
            candidate.display()
        )
    }
}

/// Generic action response envelope for capture/convert flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Optional created record ID.
    pub uuid: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, uuid: String) -> Self {
        Self {
            ok: true,
            uuid: Some(uuid),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            uuid: None,
            message: message.into(),
        }
    }
}

/// Captures a free-form note inspiration.
#[flutter_rust_bridge::frb(sync)]
pub fn capture_note(title: String, content: Option<String>) -> ActionResponse {
    let result = with_store(|conn| {
        let repo = SqliteInspirationRepository::try_new(conn).map_err(|err| err.to_string())?;
        let service = InspirationService::new(repo);
        let record = service
            .capture_note(title.clone(), content.clone())
            .map_err(|err| err.to_string())?;
        Ok(record.uuid.to_string())
    });

    match result {
        Ok(uuid) => ActionResponse::success("note captured", uuid),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Captures a web-link inspiration.
///
/// When `title` is empty, a best-effort page-title scrape fills it in;
/// the URL itself is the fallback title.
#[flutter_rust_bridge::frb(sync)]
pub fn capture_url(title: String, url: String) -> ActionResponse {
    capture_link(title, url, InspirationKind::Url)
}

/// Captures a video-link inspiration with the same title fallback chain.
#[flutter_rust_bridge::frb(sync)]
pub fn capture_video(title: String, url: String) -> ActionResponse {
    capture_link(title, url, InspirationKind::Video)
}

fn capture_link(title: String, url: String, kind: InspirationKind) -> ActionResponse {
    let effective_title = if title.trim().is_empty() {
        scrape::fetch_page_title(&url).unwrap_or_else(|| url.clone())
    } else {
        title
    };

    let result = with_store(|conn| {
        let repo = SqliteInspirationRepository::try_new(conn).map_err(|err| err.to_string())?;
        let service = InspirationService::new(repo);
        let record = match kind {
            InspirationKind::Video => service.capture_video(effective_title.clone(), url.clone()),
            _ => service.capture_url(effective_title.clone(), url.clone()),
        }
        .map_err(|err| err.to_string())?;
        Ok(record.uuid.to_string())
    });

    match result {
        Ok(uuid) => ActionResponse::success("link captured", uuid),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Replaces the full tag set for one inspiration.
#[flutter_rust_bridge::frb(sync)]
pub fn set_inspiration_tags(uuid: String, tags: Vec<String>) -> ActionResponse {
    let id = match parse_uuid(&uuid) {
        Ok(id) => id,
        Err(message) => return ActionResponse::failure(message),
    };

    let result = with_store(|conn| {
        let repo = SqliteInspirationRepository::try_new(conn).map_err(|err| err.to_string())?;
        let mut service = InspirationService::new(repo);
        let record = service
            .set_tags(id, tags.clone())
            .map_err(|err| err.to_string())?;
        Ok(record.uuid.to_string())
    });

    match result {
        Ok(uuid) => ActionResponse::success("tags replaced", uuid),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Deletes one inspiration. Linked tasks become unassociated.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_inspiration(uuid: String) -> ActionResponse {
    let id = match parse_uuid(&uuid) {
        Ok(id) => id,
        Err(message) => return ActionResponse::failure(message),
    };

    let result = with_store(|conn| {
        let repo = SqliteInspirationRepository::try_new(conn).map_err(|err| err.to_string())?;
        let service = InspirationService::new(repo);
        service.delete(id).map_err(|err| err.to_string())
    });

    match result {
        Ok(()) => ActionResponse::success("inspiration deleted", uuid),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Converts an inspiration into a pending task linked back to it.
#[flutter_rust_bridge::frb(sync)]
pub fn convert_to_task(
    inspiration_uuid: String,
    title: String,
    details: Option<String>,
) -> ActionResponse {
    let id = match parse_uuid(&inspiration_uuid) {
        Ok(id) => id,
        Err(message) => return ActionResponse::failure(message),
    };

    let result = with_store(|conn| {
        let repo = SqliteTaskRepository::try_new(conn).map_err(|err| err.to_string())?;
        let service = TaskService::new(repo);
        let task = service
            .create(CreateTaskRequest {
                title: title.clone(),
                details: details.clone(),
                inspiration: Some(id),
                ..CreateTaskRequest::default()
            })
            .map_err(|err| err.to_string())?;
        Ok(ActionResponse::success("task created", task.uuid.to_string()))
    });

    result.unwrap_or_else(ActionResponse::failure)
}

/// List item projection for inspiration screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspirationItem {
    pub uuid: String,
    /// `note|image|url|video`.
    pub kind: String,
    pub title: String,
    pub content: Option<String>,
    pub url: Option<String>,
    pub created_at: i64,
    pub tags: Vec<String>,
    pub organized: bool,
}

/// List response envelope for inspiration screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspirationListResponse {
    pub items: Vec<InspirationItem>,
    pub message: String,
    pub applied_limit: u32,
}

/// Lists inspirations with optional kind/tag filters.
#[flutter_rust_bridge::frb(sync)]
pub fn list_inspirations(
    kind: Option<String>,
    tag: Option<String>,
    limit: Option<u32>,
    offset: u32,
) -> InspirationListResponse {
    let kind_filter = match kind.as_deref() {
        None => None,
        Some("note") => Some(InspirationKind::Note),
        Some("image") => Some(InspirationKind::Image),
        Some("url") => Some(InspirationKind::Url),
        Some("video") => Some(InspirationKind::Video),
        Some(other) => {
            return InspirationListResponse {
                items: Vec::new(),
                message: format!("unknown kind filter `{other}`"),
                applied_limit: 0,
            }
        }
    };

    let result = with_store(|conn| {
        let repo = SqliteInspirationRepository::try_new(conn).map_err(|err| err.to_string())?;
        let service = InspirationService::new(repo);
        let listed = service
            .list(kind_filter, tag.clone(), limit, offset)
            .map_err(|err| err.to_string())?;
        Ok(InspirationListResponse {
            items: listed.items.iter().map(to_item).collect(),
            message: String::new(),
            applied_limit: listed.applied_limit,
        })
    });

    result.unwrap_or_else(|message| InspirationListResponse {
        items: Vec::new(),
        message,
        applied_limit: 0,
    })
}

/// One day of the weekly capture histogram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCount {
    /// ISO `YYYY-MM-DD` in the local calendar.
    pub date: String,
    pub count: u32,
}

/// Flat dashboard snapshot for the overview screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardResponse {
    pub ok: bool,
    pub message: String,
    pub today_inspirations: u32,
    pub today_tasks: u32,
    pub total_inspirations: u32,
    pub total_tasks: u32,
    pub pending_tasks: u32,
    pub in_progress_tasks: u32,
    pub completed_tasks: u32,
    pub organized_inspirations: u32,
    pub unorganized_inspirations: u32,
    pub weekly_inspirations: Vec<DayCount>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub consecutive_days: u32,
}

/// Computes the dashboard snapshot from the bound store.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard() -> DashboardResponse {
    let result = with_store(|conn| {
        let snapshot = dashboard_snapshot(conn);
        Ok(DashboardResponse {
            ok: true,
            message: String::new(),
            today_inspirations: snapshot.today_inspirations,
            today_tasks: snapshot.today_tasks,
            total_inspirations: snapshot.total_inspirations,
            total_tasks: snapshot.total_tasks,
            pending_tasks: snapshot.pending_tasks,
            in_progress_tasks: snapshot.in_progress_tasks,
            completed_tasks: snapshot.completed_tasks,
            organized_inspirations: snapshot.organized_inspirations,
            unorganized_inspirations: snapshot.unorganized_inspirations,
            weekly_inspirations: snapshot
                .weekly_inspirations
                .iter()
                .map(|(date, count)| DayCount {
                    date: date.format("%Y-%m-%d").to_string(),
                    count: *count,
                })
                .collect(),
            current_streak: snapshot.current_streak,
            longest_streak: snapshot.longest_streak,
            consecutive_days: snapshot.consecutive_days,
        })
    });

    result.unwrap_or_else(|message| DashboardResponse {
        ok: false,
        message,
        today_inspirations: 0,
        today_tasks: 0,
        total_inspirations: 0,
        total_tasks: 0,
        pending_tasks: 0,
        in_progress_tasks: 0,
        completed_tasks: 0,
        organized_inspirations: 0,
        unorganized_inspirations: 0,
        weekly_inspirations: Vec::new(),
        current_streak: 0,
        longest_streak: 0,
        consecutive_days: 0,
    })
}

/// Reminder plan for the platform shell to enact.
///
/// The scheduler runs against a recording gateway; the shell performs the
/// actual notification-center calls from this plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderPlan {
    /// Identifiers to remove, stale variants included.
    pub cancel_identifiers: Vec<String>,
    /// Identifier of the one trigger to schedule, when any.
    pub schedule_identifier: Option<String>,
    /// `daily|weekly|monthly` repeat of the scheduled trigger, when any.
    pub schedule_repeat: Option<String>,
    /// Trigger weekday (1 = Sunday), weekly repeats only.
    pub schedule_weekday: Option<u8>,
    /// Trigger day of month, monthly repeats only.
    pub schedule_day: Option<u8>,
    pub schedule_hour: Option<u8>,
    pub schedule_minute: Option<u8>,
}

/// Computes the reminder plan from persisted settings.
///
/// `any_unorganized` mirrors the caller's current inspiration collection:
/// when false the plan only cancels, regardless of settings.
#[flutter_rust_bridge::frb(sync)]
pub fn reminder_plan(settings_path: String, any_unorganized: bool) -> ReminderPlan {
    let store = SettingsStore::load(settings_path);
    let settings = store.reminder().clone();

    let mut scheduler = ReminderScheduler::new(RecordingGateway::new());
    if any_unorganized {
        scheduler.apply(&settings);
    } else {
        scheduler.cancel_all();
    }

    let gateway = scheduler.into_gateway();
    let mut plan = ReminderPlan {
        cancel_identifiers: Vec::new(),
        schedule_identifier: None,
        schedule_repeat: None,
        schedule_weekday: None,
        schedule_day: None,
        schedule_hour: None,
        schedule_minute: None,
    };

    for op in gateway.ops() {
        match op {
            musebox_core::reminder::RecordedOp::Cancel(identifiers) => {
                plan.cancel_identifiers.extend(identifiers.iter().cloned());
            }
            musebox_core::reminder::RecordedOp::Schedule {
                identifier,
                trigger,
                ..
            } => {
                plan.schedule_identifier = Some(identifier.clone());
                match *trigger {
                    musebox_core::ReminderTrigger::Daily { hour, minute } => {
                        plan.schedule_repeat = Some("daily".to_string());
                        plan.schedule_hour = Some(hour);
                        plan.schedule_minute = Some(minute);
                    }
                    musebox_core::ReminderTrigger::Weekly {
                        weekday,
                        hour,
                        minute,
                    } => {
                        plan.schedule_repeat = Some("weekly".to_string());
                        plan.schedule_weekday = Some(weekday);
                        plan.schedule_hour = Some(hour);
                        plan.schedule_minute = Some(minute);
                    }
                    musebox_core::ReminderTrigger::Monthly { day, hour, minute } => {
                        plan.schedule_repeat = Some("monthly".to_string());
                        plan.schedule_day = Some(day);
                        plan.schedule_hour = Some(hour);
                        plan.schedule_minute = Some(minute);
                    }
                }
            }
        }
    }

    plan
}

/// Persists reminder settings, returning empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn save_reminder_settings(
    settings_path: String,
    enabled: bool,
    frequency: String,
    hour: u8,
    minute: u8,
    weekday: Option<u8>,
    day: Option<u8>,
) -> String {
    let frequency = match frequency.as_str() {
        "daily" => ReminderFrequency::Daily,
        "weekly" => ReminderFrequency::Weekly,
        "monthly" => ReminderFrequency::Monthly,
        other => return format!("unknown frequency `{other}`"),
    };

    let mut store = SettingsStore::load(settings_path);
    let result = store.set_reminder(ReminderSettings {
        enabled,
        frequency,
        hour,
        minute,
        weekday,
        day,
    });

    match result {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Returns whether any listed inspiration still needs organizing.
#[flutter_rust_bridge::frb(sync)]
pub fn any_unorganized() -> bool {
    with_store(|conn| {
        let repo = SqliteInspirationRepository::try_new(conn).map_err(|err| err.to_string())?;
        let service = InspirationService::new(repo);
        let listed = service
            .list(None, None, Some(100), 0)
            .map_err(|err| err.to_string())?;
        Ok(needs_reminder(&listed.items, InspirationRecord::is_organized))
    })
    .unwrap_or(false)
}

fn to_item(record: &InspirationRecord) -> InspirationItem {
    InspirationItem {
        uuid: record.uuid.to_string(),
        kind: match record.kind {
            InspirationKind::Note => "note",
            InspirationKind::Image => "image",
            InspirationKind::Url => "url",
            InspirationKind::Video => "video",
        }
        .to_string(),
        title: record.title.clone(),
        content: record.content.clone(),
        url: record.url.clone(),
        created_at: record.created_at,
        tags: record.tags.clone(),
        organized: record.is_organized(),
    }
}

fn parse_uuid(value: &str) -> Result<Uuid, String> {
    Uuid::parse_str(value).map_err(|_| format!("invalid uuid `{value}`"))
}

fn with_store<T>(
    body: impl FnOnce(&mut rusqlite::Connection) -> Result<T, String>,
) -> Result<T, String> {
    let path = STORE_DB_PATH
        .get()
        .ok_or_else(|| "store not bound; call bind_store first".to_string())?;
    let mut conn = open_db(path).map_err(|err| err.to_string())?;
    body(&mut conn)
}
