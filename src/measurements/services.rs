use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::accounts::repo::AccountStore;
use crate::accounts::services::{check_body_metrics, check_scale};
use crate::clock::Clock;
use crate::error::AppError;
use crate::measurements::repo::MeasurementStore;
use crate::measurements::repo_types::BodyMeasurement;
use crate::snapshots::services::compute_bmi;

#[derive(Debug, Clone)]
pub struct NewMeasurement {
    pub measured_at: Option<OffsetDateTime>,
    pub weight_kg: Decimal,
    pub height_cm: Decimal,
    pub fat_percentage: Decimal,
    pub muscle_percentage: Decimal,
}

fn check_percentage(name: &str, value: Decimal) -> Result<(), AppError> {
    check_scale(name, value)?;
    if value.is_sign_negative() || value > Decimal::ONE_HUNDRED {
        return Err(AppError::validation(format!("{name} must be between 0 and 100")));
    }
    Ok(())
}

/// Append a measurement for an existing account. The stored BMI is derived
/// from the measurement's own weight and height.
pub async fn record_measurement(
    accounts: &dyn AccountStore,
    measurements: &dyn MeasurementStore,
    clock: &dyn Clock,
    account_id: Uuid,
    input: NewMeasurement,
) -> Result<BodyMeasurement, AppError> {
    check_body_metrics(input.height_cm, input.weight_kg)?;
    check_percentage("fat percentage", input.fat_percentage)?;
    check_percentage("muscle percentage", input.muscle_percentage)?;

    if accounts.get(account_id).await?.is_none() {
        return Err(AppError::not_found("account not found"));
    }

    let saved = measurements
        .insert(BodyMeasurement {
            id: Uuid::new_v4(),
            account_id,
            measured_at: input.measured_at.unwrap_or_else(|| clock.now()),
            weight_kg: input.weight_kg,
            height_cm: input.height_cm,
            bmi: compute_bmi(input.weight_kg, input.height_cm),
            fat_percentage: input.fat_percentage,
            muscle_percentage: input.muscle_percentage,
        })
        .await?;

    info!(%account_id, measurement_id = %saved.id, "measurement recorded");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::accounts::repo_types::Account;
    use crate::clock::FixedClock;
    use crate::memory::MemoryStore;

    async fn seeded() -> (MemoryStore, Uuid) {
        let store = MemoryStore::new();
        let account = AccountStore::insert(
            &store,
            Account {
                id: Uuid::new_v4(),
                username: "mei".into(),
                password_hash: "$argon2id$stub".into(),
                phone: "+8613800138000".into(),
                height_cm: Decimal::new(170, 0),
                weight_kg: Decimal::new(68, 0),
                birthdate: None,
                created_at: datetime!(2024-01-01 0:00 UTC),
            },
        )
        .await
        .unwrap();
        (store, account.id)
    }

    fn input() -> NewMeasurement {
        NewMeasurement {
            measured_at: None,
            weight_kg: Decimal::new(80, 0),
            height_cm: Decimal::new(200, 0),
            fat_percentage: Decimal::new(185, 1),
            muscle_percentage: Decimal::new(41, 0),
        }
    }

    #[tokio::test]
    async fn derives_bmi_and_defaults_timestamp() {
        let (store, id) = seeded().await;
        let clock = FixedClock(datetime!(2024-03-10 07:15 UTC));

        let m = record_measurement(&store, &store, &clock, id, input()).await.unwrap();
        assert_eq!(m.bmi, Decimal::new(20, 0));
        assert_eq!(m.measured_at, clock.0);
        assert_eq!(store.latest_for(id).await.unwrap(), Some(m));
    }

    #[tokio::test]
    async fn rejects_out_of_range_percentages() {
        let (store, id) = seeded().await;
        let clock = FixedClock(datetime!(2024-03-10 07:15 UTC));
        let mut bad = input();
        bad.fat_percentage = Decimal::new(101, 0);

        let err = record_measurement(&store, &store, &clock, id, bad).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.latest_for(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejects_values_finer_than_two_places() {
        let (store, id) = seeded().await;
        let clock = FixedClock(datetime!(2024-03-10 07:15 UTC));

        let mut bad = input();
        bad.weight_kg = "80.125".parse().unwrap();
        let err = record_measurement(&store, &store, &clock, id, bad).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.starts_with("weight")));

        let mut bad = input();
        bad.muscle_percentage = "41.001".parse().unwrap();
        let err = record_measurement(&store, &store, &clock, id, bad).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.starts_with("muscle percentage")));

        assert!(store.latest_for(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_account_is_not_found() {
        let (store, _) = seeded().await;
        let clock = FixedClock(datetime!(2024-03-10 07:15 UTC));
        let err = record_measurement(&store, &store, &clock, Uuid::new_v4(), input())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
