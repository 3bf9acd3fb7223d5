use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;
use rust_decimal::{Decimal, RoundingStrategy};
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::accounts::repo::AccountStore;
use crate::accounts::repo_types::Account;
use crate::activity::repo::ActivityStore;
use crate::activity::repo_types::ActivityRecord;
use crate::clock::Clock;
use crate::error::{with_deadline, AppError};
use crate::measurements::repo::MeasurementStore;
use crate::measurements::repo_types::BodyMeasurement;
use crate::snapshots::repo::SnapshotStore;
use crate::snapshots::repo_types::HealthSnapshot;
use crate::state::AppState;

const BMI_SCALE: u32 = 2;

/// Body-mass index, `weight / (height / 100)^2`, rounded to two places.
///
/// Heights of zero or below yield zero rather than an error, as do inputs so
/// small that the divisor underflows.
pub fn compute_bmi(weight_kg: Decimal, height_cm: Decimal) -> Decimal {
    if height_cm <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let metres = height_cm / Decimal::ONE_HUNDRED;
    metres
        .checked_mul(metres)
        .and_then(|sq| weight_kg.checked_div(sq))
        .map(|bmi| bmi.round_dp_with_strategy(BMI_SCALE, RoundingStrategy::MidpointAwayFromZero))
        .unwrap_or(Decimal::ZERO)
}

/// Build the snapshot row from the facts gathered for one account.
fn assemble(
    account: &Account,
    measurement: Option<&BodyMeasurement>,
    activity: Option<&ActivityRecord>,
    generated_at: OffsetDateTime,
) -> HealthSnapshot {
    HealthSnapshot {
        id: Uuid::new_v4(),
        account_id: account.id,
        generated_at,
        measurement_id: measurement.map(|m| m.id),
        activity_id: activity.map(|a| a.id),
        weight_kg: account.weight_kg,
        // the account profile, not the measurement, drives BMI
        bmi: compute_bmi(account.weight_kg, account.height_cm),
        steps: activity.map_or(0, |a| a.steps),
    }
}

/// A snapshot together with whatever its weak references still resolve to.
#[derive(Debug, Clone)]
pub struct ResolvedSnapshot {
    pub snapshot: HealthSnapshot,
    pub measurement: Option<BodyMeasurement>,
    pub activity: Option<ActivityRecord>,
}

/// Gathers account, latest measurement and today's activity, then writes one
/// new [`HealthSnapshot`].
#[derive(Clone)]
pub struct SnapshotEngine {
    accounts: Arc<dyn AccountStore>,
    measurements: Arc<dyn MeasurementStore>,
    activities: Arc<dyn ActivityStore>,
    snapshots: Arc<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
    deadline: Duration,
}

impl FromRef<AppState> for SnapshotEngine {
    fn from_ref(state: &AppState) -> Self {
        Self {
            accounts: state.accounts.clone(),
            measurements: state.measurements.clone(),
            activities: state.activities.clone(),
            snapshots: state.snapshots.clone(),
            clock: state.clock.clone(),
            deadline: state.config.request_timeout,
        }
    }
}

impl SnapshotEngine {
    #[cfg(test)]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Generate and persist a new snapshot for `account_id`.
    ///
    /// Not idempotent: each successful call inserts exactly one row. An unknown
    /// account fails with `NotFound` before anything is written.
    #[instrument(skip(self))]
    pub async fn generate(&self, account_id: Uuid) -> Result<HealthSnapshot, AppError> {
        with_deadline(self.deadline, self.generate_inner(account_id)).await
    }

    async fn generate_inner(&self, account_id: Uuid) -> Result<HealthSnapshot, AppError> {
        let today = self.clock.today();

        let (account, measurement, activity) = tokio::try_join!(
            self.accounts.get(account_id),
            self.measurements.latest_for(account_id),
            self.activities.for_account_and_date(account_id, today),
        )?;

        let Some(account) = account else {
            warn!(%account_id, "snapshot requested for unknown account");
            return Err(AppError::not_found("account not found"));
        };
        debug!(
            %account_id,
            measurement = ?measurement.as_ref().map(|m| m.id),
            activity = ?activity.as_ref().map(|a| a.id),
            %today,
            "snapshot inputs loaded"
        );

        let snapshot = assemble(
            &account,
            measurement.as_ref(),
            activity.as_ref(),
            self.clock.now(),
        );
        let saved = self.snapshots.insert(snapshot).await?;

        info!(%account_id, snapshot_id = %saved.id, bmi = %saved.bmi, steps = saved.steps, "snapshot generated");
        Ok(saved)
    }

    /// Load one of the account's snapshots and follow its weak references.
    #[instrument(skip(self))]
    pub async fn lookup(
        &self,
        account_id: Uuid,
        snapshot_id: Uuid,
    ) -> Result<ResolvedSnapshot, AppError> {
        with_deadline(self.deadline, async {
            let snapshot = self
                .snapshots
                .get(snapshot_id)
                .await?
                .filter(|s| s.account_id == account_id)
                .ok_or_else(|| AppError::not_found("snapshot not found"))?;

            let measurement = async {
                match snapshot.measurement_id {
                    Some(id) => self.measurements.get(id).await,
                    None => Ok(None),
                }
            };
            let activity = async {
                match snapshot.activity_id {
                    Some(id) => self.activities.get(id).await,
                    None => Ok(None),
                }
            };
            let (measurement, activity) = tokio::try_join!(measurement, activity)?;

            Ok::<_, AppError>(ResolvedSnapshot {
                snapshot,
                measurement,
                activity,
            })
        })
        .await
    }
}
