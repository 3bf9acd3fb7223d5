use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::accounts::services::Registration;

/// Request body for account registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub phone: String,
    pub height: Decimal, // cm
    pub weight: Decimal, // kg
    #[serde(default, with = "crate::serde_date::calendar_date::option")]
    pub birthdate: Option<Date>,
}

impl From<RegisterRequest> for Registration {
    fn from(r: RegisterRequest) -> Self {
        Self {
            username: r.username,
            password: r.password,
            phone: r.phone,
            height_cm: r.height,
            weight_kg: r.weight,
            birthdate: r.birthdate,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub username: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: RegisterResponse,
}
