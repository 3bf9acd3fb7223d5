use time::Date;
use tracing::info;
use uuid::Uuid;

use crate::accounts::repo::AccountStore;
use crate::activity::repo::ActivityStore;
use crate::activity::repo_types::ActivityRecord;
use crate::clock::Clock;
use crate::error::AppError;

/// Set the step count for `date` (the server's today when omitted).
/// Repeated calls for the same day replace the count.
pub async fn record_steps(
    accounts: &dyn AccountStore,
    activities: &dyn ActivityStore,
    clock: &dyn Clock,
    account_id: Uuid,
    date: Option<Date>,
    steps: i64,
) -> Result<ActivityRecord, AppError> {
    let steps = i32::try_from(steps)
        .ok()
        .filter(|s| *s >= 0)
        .ok_or_else(|| AppError::validation("steps must be a non-negative integer"))?;

    if accounts.get(account_id).await?.is_none() {
        return Err(AppError::not_found("account not found"));
    }

    let date = date.unwrap_or_else(|| clock.today());
    let record = activities.upsert_steps(account_id, date, steps).await?;

    info!(%account_id, activity_id = %record.id, %date, steps, "steps recorded");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use time::macros::{date, datetime};

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

    #[tokio::test]
    async fn defaults_to_the_server_day() {
        let (store, id) = seeded().await;
        let clock = FixedClock(datetime!(2024-03-10 23:59 UTC));

        let rec = record_steps(&store, &store, &clock, id, None, 10_250).await.unwrap();
        assert_eq!(rec.record_date, date!(2024 - 03 - 10));
        assert_eq!(rec.steps, 10_250);
    }

    #[tokio::test]
    async fn rejects_negative_and_oversized_counts() {
        let (store, id) = seeded().await;
        let clock = FixedClock(datetime!(2024-03-10 12:00 UTC));

        for steps in [-1, i64::from(i32::MAX) + 1] {
            let err = record_steps(&store, &store, &clock, id, None, steps).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
        assert!(store
            .for_account_and_date(id, date!(2024 - 03 - 10))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn unknown_account_is_not_found() {
        let (store, _) = seeded().await;
        let clock = FixedClock(datetime!(2024-03-10 12:00 UTC));
        let err = record_steps(&store, &store, &clock, Uuid::new_v4(), None, 5)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
