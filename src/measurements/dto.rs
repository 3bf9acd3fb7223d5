use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::measurements::{repo_types::BodyMeasurement, services::NewMeasurement};

#[derive(Debug, Deserialize)]
pub struct RecordMeasurementRequest {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub measured_at: Option<OffsetDateTime>,
    pub weight: Decimal, // kg
    pub height: Decimal, // cm
    #[serde(default)]
    pub fat_percentage: Decimal,
    #[serde(default)]
    pub muscle_percentage: Decimal,
}

impl From<RecordMeasurementRequest> for NewMeasurement {
    fn from(r: RecordMeasurementRequest) -> Self {
        Self {
            measured_at: r.measured_at,
            weight_kg: r.weight,
            height_cm: r.height,
            fat_percentage: r.fat_percentage,
            muscle_percentage: r.muscle_percentage,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeasurementResponse {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub measured_at: OffsetDateTime,
    pub weight: Decimal,
    pub height: Decimal,
    pub bmi: Decimal,
    pub fat_percentage: Decimal,
    pub muscle_percentage: Decimal,
}

impl From<BodyMeasurement> for MeasurementResponse {
    fn from(m: BodyMeasurement) -> Self {
        Self {
            id: m.id,
            measured_at: m.measured_at,
            weight: m.weight_kg,
            height: m.height_cm,
            bmi: m.bmi,
            fat_percentage: m.fat_percentage,
            muscle_percentage: m.muscle_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_default_to_zero() {
        let req: RecordMeasurementRequest =
            serde_json::from_str(r#"{"weight":"72","height":"175"}"#).unwrap();
        let input = NewMeasurement::from(req);
        assert!(input.measured_at.is_none());
        assert_eq!(input.fat_percentage, Decimal::ZERO);
        assert_eq!(input.muscle_percentage, Decimal::ZERO);
    }

    #[test]
    fn explicit_timestamp_is_parsed() {
        let req: RecordMeasurementRequest = serde_json::from_str(
            r#"{"measured_at":"2024-03-09T07:00:00Z","weight":72,"height":175}"#,
        )
        .unwrap();
        assert_eq!(
            req.measured_at,
            Some(time::macros::datetime!(2024-03-09 07:00 UTC))
        );
    }
}
