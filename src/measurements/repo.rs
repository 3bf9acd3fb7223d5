use async_trait::async_trait;
use uuid::Uuid;

use crate::db::{PgStore, StoreError};
use crate::measurements::repo_types::BodyMeasurement;

#[async_trait]
pub trait MeasurementStore: Send + Sync {
    /// Latest measurement by `measured_at`; equal timestamps resolve to the one
    /// recorded last.
    async fn latest_for(&self, account_id: Uuid) -> Result<Option<BodyMeasurement>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<BodyMeasurement>, StoreError>;

    async fn insert(&self, measurement: BodyMeasurement) -> Result<BodyMeasurement, StoreError>;
}

#[async_trait]
impl MeasurementStore for PgStore {
    async fn latest_for(&self, account_id: Uuid) -> Result<Option<BodyMeasurement>, StoreError> {
        let row = sqlx::query_as::<_, BodyMeasurement>(
            r#"
            SELECT id, account_id, measured_at, weight_kg, height_cm, bmi,
                   fat_percentage, muscle_percentage
              FROM body_measurements
             WHERE account_id = $1
             ORDER BY measured_at DESC, seq DESC
             LIMIT 1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<BodyMeasurement>, StoreError> {
        let row = sqlx::query_as::<_, BodyMeasurement>(
            r#"
            SELECT id, account_id, measured_at, weight_kg, height_cm, bmi,
                   fat_percentage, muscle_percentage
              FROM body_measurements
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn insert(&self, m: BodyMeasurement) -> Result<BodyMeasurement, StoreError> {
        let row = sqlx::query_as::<_, BodyMeasurement>(
            r#"
            INSERT INTO body_measurements
                (id, account_id, measured_at, weight_kg, height_cm, bmi, fat_percentage, muscle_percentage)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, account_id, measured_at, weight_kg, height_cm, bmi,
                      fat_percentage, muscle_percentage
            "#,
        )
        .bind(m.id)
        .bind(m.account_id)
        .bind(m.measured_at)
        .bind(m.weight_kg)
        .bind(m.height_cm)
        .bind(m.bmi)
        .bind(m.fat_percentage)
        .bind(m.muscle_percentage)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }
}
