use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::accounts::repo_types::{Account, AccountPatch};

/// Public view of an account. The credential hash never leaves the server.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub username: String,
    pub phone: String,
    pub height: Decimal,
    pub weight: Decimal,
    #[serde(with = "crate::serde_date::calendar_date::option")]
    pub birthdate: Option<Date>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Account> for AccountResponse {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            username: a.username,
            phone: a.phone,
            height: a.height_cm,
            weight: a.weight_kg,
            birthdate: a.birthdate,
            created_at: a.created_at,
        }
    }
}

/// `PUT /me` body. Omitted or null text fields keep their stored value;
/// `height` and `weight` must always be sent.
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, with = "crate::serde_date::calendar_date::option")]
    pub birthdate: Option<Date>,
    pub height: Decimal,
    pub weight: Decimal,
}

impl From<UpdateAccountRequest> for AccountPatch {
    fn from(r: UpdateAccountRequest) -> Self {
        Self {
            username: r.username,
            phone: r.phone,
            birthdate: r.birthdate,
            height_cm: r.height,
            weight_kg: r.weight,
        }
    }
}
