//! User-configurable reminder settings.

use serde::{Deserialize, Serialize};

/// How often the unorganized-inspiration reminder fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderFrequency {
    Daily,
    Weekly,
    Monthly,
}

/// Reminder configuration as edited on the settings screen.
///
/// `weekday` uses 1–7 with 1 = Sunday; `day` uses 1–31. Both are only
/// meaningful for the matching frequency and may be absent, in which case
/// no trigger is scheduled for that frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSettings {
    pub enabled: bool,
    pub frequency: ReminderFrequency,
    /// Wall-clock hour, 0–23.
    pub hour: u8,
    /// Wall-clock minute, 0–59.
    pub minute: u8,
    /// 1–7, 1 = Sunday. Used only for `Weekly`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<u8>,
    /// 1–31. Used only for `Monthly`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u8>,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            frequency: ReminderFrequency::Daily,
            hour: 9,
            minute: 0,
            weekday: None,
            day: None,
        }
    }
}

impl ReminderSettings {
    /// The weekday field, if present and in the valid 1–7 range.
    pub fn valid_weekday(&self) -> Option<u8> {
        self.weekday.filter(|value| (1..=7).contains(value))
    }

    /// The day-of-month field, if present and in the valid 1–31 range.
    pub fn valid_day(&self) -> Option<u8> {
        self.day.filter(|value| (1..=31).contains(value))
    }
}

#[cfg(test)]
mod tests {
    use super::{ReminderFrequency, ReminderSettings};

    #[test]
    fn defaults_are_disabled_daily_morning() {
        let settings = ReminderSettings::default();
        assert!(!settings.enabled);
        assert_eq!(settings.frequency, ReminderFrequency::Daily);
        assert_eq!((settings.hour, settings.minute), (9, 0));
    }

    #[test]
    fn out_of_range_fields_are_treated_as_absent() {
        let settings = ReminderSettings {
            weekday: Some(9),
            day: Some(40),
            ..ReminderSettings::default()
        };
        assert_eq!(settings.valid_weekday(), None);
        assert_eq!(settings.valid_day(), None);

        let valid = ReminderSettings {
            weekday: Some(3),
            day: Some(31),
            ..ReminderSettings::default()
        };
        assert_eq!(valid.valid_weekday(), Some(3));
        assert_eq!(valid.valid_day(), Some(31));
    }
}
