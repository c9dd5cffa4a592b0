use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_CYCLE_LENGTH: i64 = 28;

/// Physiological plausibility band for cycle length. Values outside it are
/// accepted but the record is marked low-confidence.
pub const MIN_PLAUSIBLE_CYCLE_LENGTH: i64 = 15;
pub const MAX_PLAUSIBLE_CYCLE_LENGTH: i64 = 45;

/// Hard upper bound on cycle length. Beyond it the record is rejected
/// outright instead of flagged; magnitudes past this would push the window
/// arithmetic out of chrono's representable date range.
pub const MAX_SUPPORTED_CYCLE_LENGTH: i64 = 365;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CycleError {
    #[error("invalid cycle length {cycle_length}: must be 1-{} days and at least the period length ({period_length} days)", MAX_SUPPORTED_CYCLE_LENGTH)]
    InvalidConfiguration {
        cycle_length: i64,
        period_length: i64,
    },
    #[error("period end {end} precedes start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// The per-user period baseline every prediction is derived from.
/// Constructed only through [`CycleRecord::new`] so the invariants
/// (end >= start, cycle covers the period) hold everywhere downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleRecord {
    pub last_period_start: NaiveDate,
    pub last_period_end: NaiveDate,
    pub cycle_length: i64,
    pub period_length: i64,
    pub low_confidence: bool,
}

impl CycleRecord {
    pub fn new(
        last_period_start: NaiveDate,
        last_period_end: NaiveDate,
        cycle_length: i64,
    ) -> Result<Self, CycleError> {
        if last_period_end < last_period_start {
            return Err(CycleError::InvalidRange {
                start: last_period_start,
                end: last_period_end,
            });
        }

        let period_length = (last_period_end - last_period_start).num_days();
        if cycle_length <= 0
            || cycle_length > MAX_SUPPORTED_CYCLE_LENGTH
            || cycle_length < period_length
        {
            return Err(CycleError::InvalidConfiguration {
                cycle_length,
                period_length,
            });
        }

        // The predicted window (start + cycle + period days) must itself be a
        // representable date, or the calculator would panic on a baseline
        // logged near chrono's calendar edge.
        if last_period_start
            .checked_add_signed(Duration::days(cycle_length + period_length))
            .is_none()
        {
            return Err(CycleError::InvalidConfiguration {
                cycle_length,
                period_length,
            });
        }

        let low_confidence = cycle_length < MIN_PLAUSIBLE_CYCLE_LENGTH
            || cycle_length > MAX_PLAUSIBLE_CYCLE_LENGTH;

        Ok(CycleRecord {
            last_period_start,
            last_period_end,
            cycle_length,
            period_length,
            low_confidence,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FertilityBand {
    VeryLow,
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Read-only view model handed to clients; recomputed on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleSummary {
    pub cycle_day: i64,
    pub phase: Phase,
    pub fertility_band: FertilityBand,
    pub days_until_next_period: i64,
    pub next_period_window: PeriodWindow,
    pub low_confidence: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomReport {
    pub name: String,
    pub intensity: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct SymptomLogEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub timestamp: DateTime<Local>,
    pub symptoms: Vec<SymptomReport>,
    pub mood: String,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    Daily,
    #[serde(rename = "Twice Daily")]
    TwiceDaily,
    Weekly,
    Monthly,
    #[serde(rename = "As Needed")]
    AsNeeded,
}

#[derive(Debug, Clone, Serialize)]
pub struct MedicationEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub dosage: String,
    pub frequency: Frequency,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub notes: String,
    pub completed: bool,
}

/// Partial medication update; `None` fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct MedicationPatch {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<Frequency>,
    #[serde(default, with = "hhmm_option")]
    pub time: Option<NaiveTime>,
    pub notes: Option<String>,
    pub completed: Option<bool>,
}

impl MedicationPatch {
    pub fn apply(self, entry: &mut MedicationEntry) {
        if let Some(name) = self.name {
            entry.name = name;
        }
        if let Some(dosage) = self.dosage {
            entry.dosage = dosage;
        }
        if let Some(frequency) = self.frequency {
            entry.frequency = frequency;
        }
        if let Some(time) = self.time {
            entry.time = time;
        }
        if let Some(notes) = self.notes {
            entry.notes = notes;
        }
        if let Some(completed) = self.completed {
            entry.completed = completed;
        }
    }
}

/// One-shot signal that a medication's time is inside the lead window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueSoon {
    pub user_id: Uuid,
    pub entry_id: Uuid,
    pub name: String,
    pub time: NaiveTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Local>,
    pub read: bool,
}

/// Serializes medication times as bare `HH:MM` wall-clock strings.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Deserialize-only counterpart for optional patch fields.
pub mod hhmm_option {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| {
            NaiveTime::parse_from_str(&s, super::hhmm::FORMAT).map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}
