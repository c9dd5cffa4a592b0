//! Medication reminder scan. A fixed-interval tick re-evaluates the whole
//! medication list against the clock; everything is recomputed from the
//! current instant, so missed ticks are never replayed and a suspended
//! process resumes cleanly.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration as TickDuration;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Timelike};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::clock::Clock;
use crate::models::{hhmm, DueSoon, MedicationEntry};
use crate::store::Store;

pub const DEFAULT_LEAD_MINUTES: i64 = 5;
pub const DEFAULT_TICK_SECONDS: u64 = 60;
const MINUTES_PER_DAY: i64 = 1440;

/// Where due-soon events land. Fire and forget, no acknowledgment.
pub trait NotificationSink: Send + Sync {
    fn emit(&self, event: DueSoon);
}

/// Default sink: appends to the user's inbox and logs the emission.
pub struct InboxSink {
    store: Store,
    clock: Arc<dyn Clock>,
}

impl InboxSink {
    pub fn new(store: Store, clock: Arc<dyn Clock>) -> Self {
        InboxSink { store, clock }
    }
}

impl NotificationSink for InboxSink {
    fn emit(&self, event: DueSoon) {
        let message = format!(
            "Remember to take {} at {}",
            event.name,
            event.time.format(hhmm::FORMAT)
        );
        tracing::info!("🔔 {}", message);
        self.store.push_notification(
            event.user_id,
            "Upcoming Medication".to_string(),
            message,
            self.clock.now(),
        );
    }
}

/// Minutes until the entry's next daily occurrence, wrapping at midnight.
/// Shared by the scan and the next-medication lookup.
pub fn minutes_until_due(entry_time: NaiveTime, now: DateTime<Local>) -> i64 {
    let entry_minutes = i64::from(entry_time.hour()) * 60 + i64::from(entry_time.minute());
    let now_minutes = i64::from(now.hour()) * 60 + i64::from(now.minute());
    (entry_minutes - now_minutes).rem_euclid(MINUTES_PER_DAY)
}

/// Per-entry lifecycle: pending, emitted once inside the lead window,
/// completed by the user, pending again after the midnight rollover.
pub struct ReminderScheduler {
    lead_minutes: i64,
    emitted: HashSet<(Uuid, NaiveDate)>,
    current_day: Option<NaiveDate>,
}

impl ReminderScheduler {
    pub fn new(lead_minutes: i64) -> Self {
        ReminderScheduler {
            lead_minutes,
            emitted: HashSet::new(),
            current_day: None,
        }
    }

    /// Tracks the local date between ticks; returns true when it changed so
    /// the caller resets completion flags. Dedupe pairs for past occurrence
    /// days are dropped; pairs already recorded for the new day survive, so
    /// an emission just before midnight for a just-after-midnight dose is
    /// not repeated.
    pub fn observe_day(&mut self, today: NaiveDate) -> bool {
        let rolled = self
            .current_day
            .is_some_and(|last| last != today);
        if rolled {
            self.emitted.retain(|(_, day)| *day >= today);
        }
        self.current_day = Some(today);
        rolled
    }

    /// One pass over a medication snapshot: non-completed entries whose next
    /// occurrence is inside the lead window fire at most once per
    /// (entry, occurrence-day) pair.
    pub fn scan(&mut self, medications: &[MedicationEntry], now: DateTime<Local>) -> Vec<DueSoon> {
        let mut due = Vec::new();
        for entry in medications {
            if entry.completed {
                continue;
            }
            let wait = minutes_until_due(entry.time, now);
            if wait > self.lead_minutes {
                continue;
            }
            let occurrence = (now + chrono::Duration::minutes(wait)).date_naive();
            if self.emitted.insert((entry.id, occurrence)) {
                due.push(DueSoon {
                    user_id: entry.user_id,
                    entry_id: entry.id,
                    name: entry.name.clone(),
                    time: entry.time,
                });
            }
        }
        due
    }
}

/// Cancellation handle for the spawned tick loop. Dropping it also stops the
/// loop on its next wakeup.
pub struct ReminderHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReminderHandle {
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }
}

/// Spawns the reminder loop: every tick detects the midnight rollover,
/// snapshots the medication list, scans it, and forwards events to the sink.
pub fn spawn(
    store: Store,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn NotificationSink>,
    lead_minutes: i64,
    tick: TickDuration,
) -> ReminderHandle {
    let (stop, mut stopped) = watch::channel(false);
    let task = tokio::spawn(async move {
        let mut scheduler = ReminderScheduler::new(lead_minutes);
        let mut ticker = tokio::time::interval(tick);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = clock.now();
                    if scheduler.observe_day(now.date_naive()) {
                        tracing::info!("🌙 Midnight rollover, resetting completion flags");
                        store.reset_all_completed();
                    }
                    for event in scheduler.scan(&store.all_medications(), now) {
                        sink.emit(event);
                    }
                }
                _ = stopped.changed() => break,
            }
        }
    });
    ReminderHandle { stop, task }
}
