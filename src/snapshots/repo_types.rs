use rust_decimal::Decimal;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Immutable health rollup. Every generation writes a new row.
///
/// `measurement_id` and `activity_id` are lookup-only references: the rows
/// they name may disappear without touching the snapshot.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct HealthSnapshot {
    pub id: Uuid,
    pub account_id: Uuid,
    pub generated_at: OffsetDateTime,
    pub measurement_id: Option<Uuid>,
    pub activity_id: Option<Uuid>,
    pub weight_kg: Decimal,
    pub bmi: Decimal,
    pub steps: i32,
}
