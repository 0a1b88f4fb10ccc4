//! Reminder trigger computation and gateway orchestration.
//!
//! # Responsibility
//! - Map reminder settings to a recurring notification trigger and a
//!   stable identifier.
//! - Drive the platform notification service through the
//!   [`NotificationGateway`] seam.
//!
//! # Invariants
//! - `apply` cancels the base identifier plus every weekday/day variant
//!   before scheduling anything.
//! - Weekly and monthly identifiers embed their weekday/day so schedules
//!   for different parameters never collide.
//! - Gateway failures are logged and swallowed; callers get no error
//!   signal from this best-effort feature.

use std::error::Error;
use std::fmt::{Display, Formatter};

use chrono::{Datelike, NaiveDateTime};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::settings::{ReminderFrequency, ReminderSettings};

/// Stable base identifier for the unorganized-inspiration reminder.
pub const REMINDER_BASE_ID: &str = "musebox.reminder.unorganized";

/// Recurring trigger description handed to the platform service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "repeat", rename_all = "snake_case")]
pub enum ReminderTrigger {
    /// Every day at `hour:minute`.
    Daily { hour: u8, minute: u8 },
    /// Every week on `weekday` (1 = Sunday) at `hour:minute`.
    Weekly { weekday: u8, hour: u8, minute: u8 },
    /// Every month on `day` at `hour:minute`. Months without that day are
    /// skipped.
    Monthly { day: u8, hour: u8, minute: u8 },
}

impl ReminderTrigger {
    /// First wall-clock occurrence strictly after `after`.
    ///
    /// Returns `None` only for degenerate parameters (e.g. minute 75) or
    /// at the edges of the representable calendar.
    pub fn next_occurrence_after(&self, after: NaiveDateTime) -> Option<NaiveDateTime> {
        match *self {
            Self::Daily { hour, minute } => {
                let today = at_time(after.date(), hour, minute)?;
                if today > after {
                    Some(today)
                } else {
                    at_time(after.date().succ_opt()?, hour, minute)
                }
            }
            Self::Weekly {
                weekday,
                hour,
                minute,
            } => {
                // Scan the next 8 days; the matching weekday with a time
                // strictly after `after` is within that window.
                let mut date = after.date();
                for _ in 0..=7 {
                    if weekday_number(date) == weekday {
                        let candidate = at_time(date, hour, minute)?;
                        if candidate > after {
                            return Some(candidate);
                        }
                    }
                    date = date.succ_opt()?;
                }
                None
            }
            Self::Monthly { day, hour, minute } => {
                let mut year = after.date().year();
                let mut month = after.date().month();
                // 48 months covers every skip pattern, Feb 29 included.
                for _ in 0..48 {
                    if let Some(date) =
                        chrono::NaiveDate::from_ymd_opt(year, month, u32::from(day))
                    {
                        let candidate = at_time(date, hour, minute)?;
                        if candidate > after {
                            return Some(candidate);
                        }
                    }
                    month += 1;
                    if month > 12 {
                        month = 1;
                        year += 1;
                    }
                }
                None
            }
        }
    }
}

fn at_time(date: chrono::NaiveDate, hour: u8, minute: u8) -> Option<NaiveDateTime> {
    date.and_hms_opt(u32::from(hour), u32::from(minute), 0)
}

/// Calendar weekday as 1–7 with 1 = Sunday.
fn weekday_number(date: chrono::NaiveDate) -> u8 {
    (date.weekday().num_days_from_sunday() + 1) as u8
}

/// Notification payload for the reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

impl NotificationContent {
    /// Standard copy for the unorganized-inspiration reminder.
    pub fn unorganized_reminder() -> Self {
        Self {
            title: "Time to organize".to_string(),
            body: "You have inspirations waiting to become tasks.".to_string(),
        }
    }
}

/// Platform authorization state for local notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    NotDetermined,
    Denied,
    Authorized,
}

/// Error reported by a notification gateway implementation.
#[derive(Debug)]
pub struct GatewayError(pub String);

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "notification gateway error: {}", self.0)
    }
}

impl Error for GatewayError {}

/// Seam to the platform local-notification service.
///
/// The core only consumes this interface; delivery belongs to the shell.
pub trait NotificationGateway {
    fn authorization_status(&self) -> Result<AuthorizationStatus, GatewayError>;
    fn request_authorization(&mut self) -> Result<AuthorizationStatus, GatewayError>;
    fn schedule(
        &mut self,
        identifier: &str,
        trigger: &ReminderTrigger,
        content: &NotificationContent,
    ) -> Result<(), GatewayError>;
    fn cancel(&mut self, identifiers: &[String]) -> Result<(), GatewayError>;
}

/// Returns whether any inspiration still needs organizing.
///
/// The caller hands in its current collection and the organized predicate;
/// this check is deliberately decoupled from the scheduling action.
pub fn needs_reminder<T>(items: &[T], is_organized: impl Fn(&T) -> bool) -> bool {
    items.iter().any(|item| !is_organized(item))
}

/// Reminder orchestration over a notification gateway.
pub struct ReminderScheduler<G: NotificationGateway> {
    gateway: G,
}

impl<G: NotificationGateway> ReminderScheduler<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Borrows the underlying gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Consumes the scheduler and returns the gateway.
    pub fn into_gateway(self) -> G {
        self.gateway
    }

    /// Cancels the reminder when nothing is left to organize.
    ///
    /// Eligible collections are left untouched; scheduling stays an
    /// explicit, separate step via [`ReminderScheduler::apply`].
    pub fn reconcile<T>(&mut self, items: &[T], is_organized: impl Fn(&T) -> bool) {
        if !needs_reminder(items, is_organized) {
            debug!("event=reminder_reconcile module=reminder status=ok action=cancel_all reason=all_organized");
            self.cancel_all();
        }
    }

    /// Applies the settings: sweep-cancel, then schedule the one active
    /// trigger when enabled and fully parameterized.
    pub fn apply(&mut self, settings: &ReminderSettings) {
        self.cancel_all();

        if !settings.enabled {
            debug!("event=reminder_apply module=reminder status=ok action=disabled");
            return;
        }

        if !self.ensure_authorized() {
            return;
        }

        let (identifier, trigger) = match planned_trigger(settings) {
            Some(plan) => plan,
            None => {
                // Weekly/monthly without its weekday/day field: nothing to
                // schedule, the sweep above already ran.
                debug!("event=reminder_apply module=reminder status=ok action=noop reason=missing_field");
                return;
            }
        };

        match self
            .gateway
            .schedule(&identifier, &trigger, &NotificationContent::unorganized_reminder())
        {
            Ok(()) => {
                info!("event=reminder_apply module=reminder status=ok identifier={identifier}")
            }
            Err(err) => {
                warn!("event=reminder_apply module=reminder status=degraded identifier={identifier} error={err}")
            }
        }
    }

    /// Cancels the base identifier plus every weekday/day variant.
    ///
    /// The sweep guarantees no stale recurring trigger survives a
    /// frequency change without tracking which variant is active.
    pub fn cancel_all(&mut self) {
        let identifiers = all_reminder_identifiers();
        if let Err(err) = self.gateway.cancel(&identifiers) {
            warn!("event=reminder_cancel module=reminder status=degraded error={err}");
        }
    }

    fn ensure_authorized(&mut self) -> bool {
        let status = match self.gateway.authorization_status() {
            Ok(status) => status,
            Err(err) => {
                warn!("event=reminder_auth module=reminder status=degraded error={err}");
                return false;
            }
        };

        match status {
            AuthorizationStatus::Authorized => true,
            AuthorizationStatus::Denied => {
                info!("event=reminder_auth module=reminder status=ok result=denied");
                false
            }
            AuthorizationStatus::NotDetermined => match self.gateway.request_authorization() {
                Ok(AuthorizationStatus::Authorized) => true,
                Ok(_) => {
                    info!("event=reminder_auth module=reminder status=ok result=declined");
                    false
                }
                Err(err) => {
                    warn!("event=reminder_auth module=reminder status=degraded error={err}");
                    false
                }
            },
        }
    }
}

/// Identifier + trigger for the settings, or `None` when the frequency's
/// parameter field is absent.
pub fn planned_trigger(settings: &ReminderSettings) -> Option<(String, ReminderTrigger)> {
    match settings.frequency {
        ReminderFrequency::Daily => Some((
            REMINDER_BASE_ID.to_string(),
            ReminderTrigger::Daily {
                hour: settings.hour,
                minute: settings.minute,
            },
        )),
        ReminderFrequency::Weekly => settings.valid_weekday().map(|weekday| {
            (
                weekly_identifier(weekday),
                ReminderTrigger::Weekly {
                    weekday,
                    hour: settings.hour,
                    minute: settings.minute,
                },
            )
        }),
        ReminderFrequency::Monthly => settings.valid_day().map(|day| {
            (
                monthly_identifier(day),
                ReminderTrigger::Monthly {
                    day,
                    hour: settings.hour,
                    minute: settings.minute,
                },
            )
        }),
    }
}

/// Every identifier a reminder could have been scheduled under.
pub fn all_reminder_identifiers() -> Vec<String> {
    let mut identifiers = Vec::with_capacity(1 + 7 + 31);
    identifiers.push(REMINDER_BASE_ID.to_string());
    identifiers.extend((1..=7).map(weekly_identifier));
    identifiers.extend((1..=31).map(monthly_identifier));
    identifiers
}

fn weekly_identifier(weekday: u8) -> String {
    format!("{REMINDER_BASE_ID}.weekly.{weekday}")
}

fn monthly_identifier(day: u8) -> String {
    format!("{REMINDER_BASE_ID}.monthly.{day}")
}

/// One operation observed by [`RecordingGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedOp {
    Cancel(Vec<String>),
    Schedule {
        identifier: String,
        trigger: ReminderTrigger,
        content: NotificationContent,
    },
}

/// Gateway that records operations instead of performing them.
///
/// The FFI layer runs the scheduler against this gateway and returns the
/// recorded plan for the platform shell to enact; tests assert on it.
#[derive(Debug, Clone)]
pub struct RecordingGateway {
    authorization: AuthorizationStatus,
    ops: Vec<RecordedOp>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::with_authorization(AuthorizationStatus::Authorized)
    }

    pub fn with_authorization(authorization: AuthorizationStatus) -> Self {
        Self {
            authorization,
            ops: Vec::new(),
        }
    }

    /// All recorded operations, in order.
    pub fn ops(&self) -> &[RecordedOp] {
        &self.ops
    }

    /// Identifiers that would be active after replaying all operations.
    pub fn active_identifiers(&self) -> Vec<String> {
        let mut active: Vec<String> = Vec::new();
        for op in &self.ops {
            match op {
                RecordedOp::Cancel(identifiers) => {
                    active.retain(|id| !identifiers.contains(id));
                }
                RecordedOp::Schedule { identifier, .. } => {
                    if !active.contains(identifier) {
                        active.push(identifier.clone());
                    }
                }
            }
        }
        active
    }
}

impl Default for RecordingGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationGateway for RecordingGateway {
    fn authorization_status(&self) -> Result<AuthorizationStatus, GatewayError> {
        Ok(self.authorization)
    }

    fn request_authorization(&mut self) -> Result<AuthorizationStatus, GatewayError> {
        if self.authorization == AuthorizationStatus::NotDetermined {
            self.authorization = AuthorizationStatus::Authorized;
        }
        Ok(self.authorization)
    }

    fn schedule(
        &mut self,
        identifier: &str,
        trigger: &ReminderTrigger,
        content: &NotificationContent,
    ) -> Result<(), GatewayError> {
        self.ops.push(RecordedOp::Schedule {
            identifier: identifier.to_string(),
            trigger: *trigger,
            content: content.clone(),
        });
        Ok(())
    }

    fn cancel(&mut self, identifiers: &[String]) -> Result<(), GatewayError> {
        self.ops.push(RecordedOp::Cancel(identifiers.to_vec()));
        Ok(())
    }
}
