//! Unorganized-inspiration reminder rules.
//!
//! # Responsibility
//! - Decide whether the recurring "you have unorganized inspirations"
//!   notification should be active.
//! - Compute its trigger schedule from the user's reminder settings.
//!
//! # Invariants
//! - Scheduling is best-effort: gateway failures are logged, never
//!   surfaced to callers.
//! - Rescheduling always cancels every identifier variant that could
//!   exist, so no stale trigger survives a settings change.

pub mod scheduler;
pub mod settings;

pub use scheduler::{
    needs_reminder, AuthorizationStatus, GatewayError, NotificationContent, NotificationGateway,
    RecordedOp, RecordingGateway, ReminderScheduler, ReminderTrigger, REMINDER_BASE_ID,
};
pub use settings::{ReminderFrequency, ReminderSettings};
