use rust_decimal::Decimal;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// One body-measurement event. Append-only.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct BodyMeasurement {
    pub id: Uuid,
    pub account_id: Uuid,
    pub measured_at: OffsetDateTime,
    pub weight_kg: Decimal,
    pub height_cm: Decimal,
    pub bmi: Decimal,
    pub fat_percentage: Decimal,
    pub muscle_percentage: Decimal,
}
