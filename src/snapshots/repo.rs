use async_trait::async_trait;
use uuid::Uuid;

use crate::db::{PgStore, StoreError};
use crate::snapshots::repo_types::HealthSnapshot;

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Single-row atomic insert. Never updates an existing snapshot.
    async fn insert(&self, snapshot: HealthSnapshot) -> Result<HealthSnapshot, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<HealthSnapshot>, StoreError>;
}

#[async_trait]
impl SnapshotStore for PgStore {
    async fn insert(&self, s: HealthSnapshot) -> Result<HealthSnapshot, StoreError> {
        let row = sqlx::query_as::<_, HealthSnapshot>(
            r#"
            INSERT INTO health_snapshots
                (id, account_id, generated_at, measurement_id, activity_id, weight_kg, bmi, steps)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, account_id, generated_at, measurement_id, activity_id, weight_kg, bmi, steps
            "#,
        )
        .bind(s.id)
        .bind(s.account_id)
        .bind(s.generated_at)
        .bind(s.measurement_id) // Option<Uuid> → NULL allowed
        .bind(s.activity_id)
        .bind(s.weight_kg)
        .bind(s.bmi)
        .bind(s.steps)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<HealthSnapshot>, StoreError> {
        let row = sqlx::query_as::<_, HealthSnapshot>(
            r#"
            SELECT id, account_id, generated_at, measurement_id, activity_id, weight_kg, bmi, steps
              FROM health_snapshots
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }
}
