use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::activity::repo_types::ActivityRecord;

/// `PUT /activity` body. `date` falls back to the server's today.
#[derive(Debug, Deserialize)]
pub struct RecordStepsRequest {
    #[serde(default, with = "crate::serde_date::calendar_date::option")]
    pub date: Option<Date>,
    pub steps: i64,
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub id: Uuid,
    #[serde(with = "crate::serde_date::calendar_date")]
    pub date: Date,
    pub steps: i32,
}

impl From<ActivityRecord> for ActivityResponse {
    fn from(r: ActivityRecord) -> Self {
        Self {
            id: r.id,
            date: r.record_date,
            steps: r.steps,
        }
    }
}
