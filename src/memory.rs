//! In-process store used for `STORE_BACKEND=memory` and as the test fake.
//!
//! Every operation takes the single table lock, so each call is atomic and the
//! account read-modify-write cannot interleave with another writer.

use std::collections::HashMap;

use async_trait::async_trait;
use time::Date;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::accounts::repo::AccountStore;
use crate::accounts::repo_types::{Account, AccountPatch};
use crate::activity::repo::ActivityStore;
use crate::activity::repo_types::ActivityRecord;
use crate::db::StoreError;
use crate::measurements::repo::MeasurementStore;
use crate::measurements::repo_types::BodyMeasurement;
use crate::snapshots::repo::SnapshotStore;
use crate::snapshots::repo_types::HealthSnapshot;

#[derive(Default)]
struct Tables {
    accounts: HashMap<Uuid, Account>,
    // position in the vec is the insertion sequence
    measurements: Vec<BodyMeasurement>,
    activities: HashMap<(Uuid, Date), ActivityRecord>,
    snapshots: Vec<HealthSnapshot>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn account_count(&self) -> usize {
        self.tables.read().await.accounts.len()
    }

    #[cfg(test)]
    pub async fn snapshot_count(&self) -> usize {
        self.tables.read().await.snapshots.len()
    }

    #[cfg(test)]
    pub async fn delete_measurement(&self, id: Uuid) {
        self.tables.write().await.measurements.retain(|m| m.id != id);
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.tables.read().await.accounts.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().find(|a| a.username == username).cloned())
    }

    async fn insert(&self, account: Account) -> Result<Account, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.accounts.values().any(|a| a.username == account.username) {
            return Err(StoreError::UniqueViolation("username".into()));
        }
        tables.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(&self, id: Uuid, patch: &AccountPatch) -> Result<Option<Account>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(existing) = tables.accounts.get(&id).cloned() else {
            return Ok(None);
        };

        let merged = patch.apply(existing);
        let clash = tables
            .accounts
            .values()
            .any(|a| a.id != id && a.username == merged.username);
        if clash {
            return Err(StoreError::UniqueViolation("username".into()));
        }

        tables.accounts.insert(id, merged.clone());
        Ok(Some(merged))
    }
}

#[async_trait]
impl MeasurementStore for MemoryStore {
    async fn latest_for(&self, account_id: Uuid) -> Result<Option<BodyMeasurement>, StoreError> {
        let tables = self.tables.read().await;
        let latest = tables
            .measurements
            .iter()
            .enumerate()
            .filter(|(_, m)| m.account_id == account_id)
            .max_by_key(|(seq, m)| (m.measured_at, *seq))
            .map(|(_, m)| m.clone());
        Ok(latest)
    }

    async fn get(&self, id: Uuid) -> Result<Option<BodyMeasurement>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.measurements.iter().find(|m| m.id == id).cloned())
    }

    async fn insert(&self, measurement: BodyMeasurement) -> Result<BodyMeasurement, StoreError> {
        self.tables.write().await.measurements.push(measurement.clone());
        Ok(measurement)
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn for_account_and_date(
        &self,
        account_id: Uuid,
        date: Date,
    ) -> Result<Option<ActivityRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.activities.get(&(account_id, date)).cloned())
    }

    async fn get(&self, id: Uuid) -> Result<Option<ActivityRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.activities.values().find(|a| a.id == id).cloned())
    }

    async fn upsert_steps(
        &self,
        account_id: Uuid,
        date: Date,
        steps: i32,
    ) -> Result<ActivityRecord, StoreError> {
        let mut tables = self.tables.write().await;
        let record = tables
            .activities
            .entry((account_id, date))
            .and_modify(|r| r.steps = steps)
            .or_insert_with(|| ActivityRecord {
                id: Uuid::new_v4(),
                account_id,
                record_date: date,
                steps,
            });
        Ok(record.clone())
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn insert(&self, snapshot: HealthSnapshot) -> Result<HealthSnapshot, StoreError> {
        self.tables.write().await.snapshots.push(snapshot.clone());
        Ok(snapshot)
    }

    async fn get(&self, id: Uuid) -> Result<Option<HealthSnapshot>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.snapshots.iter().find(|s| s.id == id).cloned())
    }
}
