use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    activity::dto::ActivityResponse,
    measurements::dto::MeasurementResponse,
    snapshots::{repo_types::HealthSnapshot, services::ResolvedSnapshot},
};

/// Wire form of a snapshot. Decimals are rendered as strings so no precision
/// is lost in transit.
#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub snapshot_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    pub weight: Decimal,
    pub bmi: Decimal,
    pub steps: i32,
    pub measurement_id: Option<Uuid>,
    pub activity_id: Option<Uuid>,
}

impl From<HealthSnapshot> for SnapshotResponse {
    fn from(s: HealthSnapshot) -> Self {
        Self {
            snapshot_id: s.id,
            generated_at: s.generated_at,
            weight: s.weight_kg,
            bmi: s.bmi,
            steps: s.steps,
            measurement_id: s.measurement_id,
            activity_id: s.activity_id,
        }
    }
}

/// Snapshot plus the source rows it still points at. A reference whose row
/// is gone serializes as `null`.
#[derive(Debug, Serialize)]
pub struct SnapshotDetailsResponse {
    #[serde(flatten)]
    pub snapshot: SnapshotResponse,
    pub measurement: Option<MeasurementResponse>,
    pub activity: Option<ActivityResponse>,
}

impl From<ResolvedSnapshot> for SnapshotDetailsResponse {
    fn from(r: ResolvedSnapshot) -> Self {
        Self {
            snapshot: r.snapshot.into(),
            measurement: r.measurement.map(Into::into),
            activity: r.activity.map(Into::into),
        }
    }
}
