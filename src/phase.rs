//! Cycle-phase and fertility arithmetic. Every derived value on the cycle
//! summary comes from these functions; they are pure over a validated
//! [`CycleRecord`] plus a reference date.

use chrono::{Duration, NaiveDate};

use crate::models::{CycleRecord, CycleSummary, FertilityBand, PeriodWindow, Phase};

/// Phase breakpoints are fixed calendar days, independent of the configured
/// cycle length. Known simplification for non-28-day cycles, kept as-is.
const FOLLICULAR_LAST_DAY: i64 = 13;
const OVULATION_LAST_DAY: i64 = 15;

/// Day within the current cycle, in `[1, cycle_length]`. The modulo is
/// normalized so a reference date before the logged start still lands in
/// range instead of going negative.
pub fn cycle_day(record: &CycleRecord, today: NaiveDate) -> i64 {
    let days_since = (today - record.last_period_start).num_days();
    days_since.rem_euclid(record.cycle_length) + 1
}

pub fn phase_for_day(cycle_day: i64, period_length: i64) -> Phase {
    if cycle_day <= period_length {
        Phase::Menstrual
    } else if cycle_day <= FOLLICULAR_LAST_DAY {
        Phase::Follicular
    } else if cycle_day <= OVULATION_LAST_DAY {
        Phase::Ovulation
    } else {
        Phase::Luteal
    }
}

pub fn fertility_band(cycle_day: i64) -> FertilityBand {
    match cycle_day {
        13..=15 => FertilityBand::High,
        11..=12 | 16..=17 => FertilityBand::Medium,
        8..=10 | 18..=20 => FertilityBand::Low,
        _ => FertilityBand::VeryLow,
    }
}

/// Predicted window of the next period, anchored on the logged baseline.
pub fn next_period_window(record: &CycleRecord) -> PeriodWindow {
    let start = record.last_period_start + Duration::days(record.cycle_length);
    PeriodWindow {
        start,
        end: start + Duration::days(record.period_length),
    }
}

/// Always in `[1, cycle_length]`; hits 1 the day before the predicted start
/// and wraps back to `cycle_length` on the predicted start date itself.
pub fn days_until_next_period(record: &CycleRecord, today: NaiveDate) -> i64 {
    let days_since = (today - record.last_period_start).num_days();
    record.cycle_length - days_since.rem_euclid(record.cycle_length)
}

pub fn summarize(record: &CycleRecord, today: NaiveDate) -> CycleSummary {
    let day = cycle_day(record, today);
    CycleSummary {
        cycle_day: day,
        phase: phase_for_day(day, record.period_length),
        fertility_band: fertility_band(day),
        days_until_next_period: days_until_next_period(record, today),
        next_period_window: next_period_window(record),
        low_confidence: record.low_confidence,
    }
}
