use async_trait::async_trait;
use time::Date;
use uuid::Uuid;

use crate::activity::repo_types::ActivityRecord;
use crate::db::{PgStore, StoreError};

#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn for_account_and_date(
        &self,
        account_id: Uuid,
        date: Date,
    ) -> Result<Option<ActivityRecord>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<ActivityRecord>, StoreError>;

    /// Create or replace the step count for `(account_id, date)`. An existing
    /// record keeps its id.
    async fn upsert_steps(
        &self,
        account_id: Uuid,
        date: Date,
        steps: i32,
    ) -> Result<ActivityRecord, StoreError>;
}

#[async_trait]
impl ActivityStore for PgStore {
    async fn for_account_and_date(
        &self,
        account_id: Uuid,
        date: Date,
    ) -> Result<Option<ActivityRecord>, StoreError> {
        let row = sqlx::query_as::<_, ActivityRecord>(
            r#"
            SELECT id, account_id, record_date, steps
              FROM activity_records
             WHERE account_id = $1 AND record_date = $2
            "#,
        )
        .bind(account_id)
        .bind(date)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ActivityRecord>, StoreError> {
        let row = sqlx::query_as::<_, ActivityRecord>(
            r#"
            SELECT id, account_id, record_date, steps
              FROM activity_records
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn upsert_steps(
        &self,
        account_id: Uuid,
        date: Date,
        steps: i32,
    ) -> Result<ActivityRecord, StoreError> {
        let row = sqlx::query_as::<_, ActivityRecord>(
            r#"
            INSERT INTO activity_records (id, account_id, record_date, steps)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (account_id, record_date)
            DO UPDATE SET steps = EXCLUDED.steps, updated_at = now()
            RETURNING id, account_id, record_date, steps
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(account_id)
        .bind(date)
        .bind(steps)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }
}
