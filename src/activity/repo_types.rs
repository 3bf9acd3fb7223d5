use sqlx::FromRow;
use time::Date;
use uuid::Uuid;

/// Step count for one account on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ActivityRecord {
    pub id: Uuid,
    pub account_id: Uuid,
    pub record_date: Date,
    pub steps: i32,
}
