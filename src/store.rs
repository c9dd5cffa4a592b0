use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Local, NaiveTime};
use uuid::Uuid;

use crate::models::{
    CycleRecord, Frequency, MedicationEntry, MedicationPatch, Notification, SymptomLogEntry,
    SymptomReport,
};

#[derive(Default)]
struct UserRecords {
    cycle: Option<CycleRecord>,
    symptoms: Vec<SymptomLogEntry>,
    medications: Vec<MedicationEntry>,
    notifications: Vec<Notification>,
}

/// In-process store, one bucket per user. Created once at startup, passed by
/// handle, and mutated only through these methods; readers get snapshots so a
/// reminder scan never observes a half-applied edit.
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<HashMap<Uuid, UserRecords>>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // ----- cycle baseline -----

    /// Logging a new period replaces the previous baseline.
    pub fn set_cycle(&self, user_id: Uuid, record: CycleRecord) {
        let mut users = self.inner.write().unwrap();
        users.entry(user_id).or_default().cycle = Some(record);
    }

    pub fn cycle(&self, user_id: Uuid) -> Option<CycleRecord> {
        let users = self.inner.read().unwrap();
        users.get(&user_id).and_then(|records| records.cycle.clone())
    }

    // ----- symptom log -----

    pub fn create_symptom_log(
        &self,
        user_id: Uuid,
        symptoms: Vec<SymptomReport>,
        mood: String,
        notes: String,
        timestamp: DateTime<Local>,
    ) -> SymptomLogEntry {
        let entry = SymptomLogEntry {
            id: Uuid::new_v4(),
            user_id,
            timestamp,
            symptoms,
            mood,
            notes,
        };
        let mut users = self.inner.write().unwrap();
        users
            .entry(user_id)
            .or_default()
            .symptoms
            .push(entry.clone());
        entry
    }

    /// Newest first.
    pub fn symptom_logs(&self, user_id: Uuid) -> Vec<SymptomLogEntry> {
        let users = self.inner.read().unwrap();
        let mut rows = users
            .get(&user_id)
            .map(|records| records.symptoms.clone())
            .unwrap_or_default();
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        rows
    }

    pub fn delete_symptom_log(&self, user_id: Uuid, id: Uuid) -> bool {
        let mut users = self.inner.write().unwrap();
        let Some(records) = users.get_mut(&user_id) else {
            return false;
        };
        let before = records.symptoms.len();
        records.symptoms.retain(|entry| entry.id != id);
        records.symptoms.len() < before
    }

    // ----- medications -----

    pub fn create_medication(
        &self,
        user_id: Uuid,
        name: String,
        dosage: String,
        frequency: Frequency,
        time: NaiveTime,
        notes: String,
    ) -> MedicationEntry {
        let entry = MedicationEntry {
            id: Uuid::new_v4(),
            user_id,
            name,
            dosage,
            frequency,
            time,
            notes,
            completed: false,
        };
        let mut users = self.inner.write().unwrap();
        users
            .entry(user_id)
            .or_default()
            .medications
            .push(entry.clone());
        entry
    }

    pub fn medications(&self, user_id: Uuid) -> Vec<MedicationEntry> {
        let users = self.inner.read().unwrap();
        users
            .get(&user_id)
            .map(|records| records.medications.clone())
            .unwrap_or_default()
    }

    pub fn update_medication(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: MedicationPatch,
    ) -> Option<MedicationEntry> {
        let mut users = self.inner.write().unwrap();
        let records = users.get_mut(&user_id)?;
        let entry = records.medications.iter_mut().find(|entry| entry.id == id)?;
        patch.apply(entry);
        Some(entry.clone())
    }

    pub fn delete_medication(&self, user_id: Uuid, id: Uuid) -> bool {
        let mut users = self.inner.write().unwrap();
        let Some(records) = users.get_mut(&user_id) else {
            return false;
        };
        let before = records.medications.len();
        records.medications.retain(|entry| entry.id != id);
        records.medications.len() < before
    }

    /// Snapshot of every user's medications for the reminder scan.
    pub fn all_medications(&self) -> Vec<MedicationEntry> {
        let users = self.inner.read().unwrap();
        users
            .values()
            .flat_map(|records| records.medications.iter().cloned())
            .collect()
    }

    /// Midnight rollover: every entry becomes pending again.
    pub fn reset_all_completed(&self) {
        let mut users = self.inner.write().unwrap();
        for records in users.values_mut() {
            for entry in &mut records.medications {
                entry.completed = false;
            }
        }
    }

    // ----- notification inbox -----

    pub fn push_notification(
        &self,
        user_id: Uuid,
        title: String,
        message: String,
        created_at: DateTime<Local>,
    ) -> Notification {
        let notification = Notification {
            id: Uuid::new_v4(),
            title,
            message,
            created_at,
            read: false,
        };
        let mut users = self.inner.write().unwrap();
        users
            .entry(user_id)
            .or_default()
            .notifications
            .push(notification.clone());
        notification
    }

    /// Newest first.
    pub fn notifications(&self, user_id: Uuid) -> Vec<Notification> {
        let users = self.inner.read().unwrap();
        let mut rows = users
            .get(&user_id)
            .map(|records| records.notifications.clone())
            .unwrap_or_default();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }

    pub fn mark_notifications_read(&self, user_id: Uuid) {
        let mut users = self.inner.write().unwrap();
        if let Some(records) = users.get_mut(&user_id) {
            for notification in &mut records.notifications {
                notification.read = true;
            }
        }
    }

    pub fn clear_notifications(&self, user_id: Uuid) {
        let mut users = self.inner.write().unwrap();
        if let Some(records) = users.get_mut(&user_id) {
            records.notifications.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::testing::local_datetime;
    use chrono::NaiveDate;

    fn sample_time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn cycle_baseline_replaces_on_new_log() {
        let store = Store::new();
        let user = Uuid::new_v4();
        assert!(store.cycle(user).is_none());

        let first = CycleRecord::new(
            NaiveDate::from_ymd_opt(2024, 9, 20).unwrap(),
            NaiveDate::from_ymd_opt(2024, 9, 25).unwrap(),
            28,
        )
        .unwrap();
        store.set_cycle(user, first);

        let second = CycleRecord::new(
            NaiveDate::from_ymd_opt(2024, 10, 18).unwrap(),
            NaiveDate::from_ymd_opt(2024, 10, 23).unwrap(),
            28,
        )
        .unwrap();
        store.set_cycle(user, second.clone());

        assert_eq!(store.cycle(user), Some(second));
    }

    #[test]
    fn symptom_logs_come_back_newest_first_and_delete_by_id() {
        let store = Store::new();
        let user = Uuid::new_v4();

        let older = store.create_symptom_log(
            user,
            vec![SymptomReport {
                name: "Cramps".into(),
                intensity: 4,
            }],
            "Tired".into(),
            String::new(),
            local_datetime(2024, 11, 1, 8, 0),
        );
        let newer = store.create_symptom_log(
            user,
            vec![SymptomReport {
                name: "Headache".into(),
                intensity: 2,
            }],
            "Calm".into(),
            String::new(),
            local_datetime(2024, 11, 2, 8, 0),
        );

        let rows = store.symptom_logs(user);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, newer.id);
        assert_eq!(rows[1].id, older.id);

        assert!(store.delete_symptom_log(user, older.id));
        assert!(!store.delete_symptom_log(user, older.id));
        assert_eq!(store.symptom_logs(user).len(), 1);
    }

    #[test]
    fn users_never_see_each_others_records() {
        let store = Store::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        store.create_medication(
            a,
            "Iron Supplement".into(),
            "65mg".into(),
            Frequency::Daily,
            sample_time(20, 0),
            "Take on empty stomach".into(),
        );

        assert_eq!(store.medications(a).len(), 1);
        assert!(store.medications(b).is_empty());
        assert!(store.symptom_logs(b).is_empty());

        let entry = store.medications(a).remove(0);
        assert!(!store.delete_medication(b, entry.id));
        assert!(store.delete_medication(a, entry.id));
    }

    #[test]
    fn medication_patch_applies_in_place() {
        let store = Store::new();
        let user = Uuid::new_v4();
        let entry = store.create_medication(
            user,
            "Prenatal Vitamins".into(),
            "1 tablet".into(),
            Frequency::Daily,
            sample_time(9, 0),
            "Take with food".into(),
        );

        let updated = store
            .update_medication(
                user,
                entry.id,
                MedicationPatch {
                    completed: Some(true),
                    dosage: Some("2 tablets".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(updated.completed);
        assert_eq!(updated.dosage, "2 tablets");
        assert_eq!(updated.name, "Prenatal Vitamins");

        let missing = store.update_medication(user, Uuid::new_v4(), MedicationPatch::default());
        assert!(missing.is_none());
    }

    #[test]
    fn rollover_resets_completed_for_every_user() {
        let store = Store::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        for user in [a, b] {
            let entry = store.create_medication(
                user,
                "Iron Supplement".into(),
                "65mg".into(),
                Frequency::Daily,
                sample_time(20, 0),
                String::new(),
            );
            store.update_medication(
                user,
                entry.id,
                MedicationPatch {
                    completed: Some(true),
                    ..Default::default()
                },
            );
        }

        store.reset_all_completed();

        for entry in store.all_medications() {
            assert!(!entry.completed);
        }
    }

    #[test]
    fn inbox_lists_newest_first_then_reads_and_clears() {
        let store = Store::new();
        let user = Uuid::new_v4();

        store.push_notification(
            user,
            "Upcoming Medication".into(),
            "Remember to take Iron Supplement at 20:00".into(),
            local_datetime(2024, 11, 1, 19, 55),
        );
        store.push_notification(
            user,
            "Upcoming Medication".into(),
            "Remember to take Prenatal Vitamins at 09:00".into(),
            local_datetime(2024, 11, 2, 8, 55),
        );

        let rows = store.notifications(user);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].message.contains("Prenatal"));
        assert!(rows.iter().all(|n| !n.read));

        store.mark_notifications_read(user);
        assert!(store.notifications(user).iter().all(|n| n.read));

        store.clear_notifications(user);
        assert!(store.notifications(user).is_empty());
    }
}
