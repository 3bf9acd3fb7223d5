use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use time::Date;
use tracing::{info, warn};
use uuid::Uuid;

use crate::accounts::repo::AccountStore;
use crate::accounts::repo_types::{Account, AccountPatch};
use crate::auth::password::{check_password_policy, hash_password};
use crate::clock::Clock;
use crate::error::AppError;

pub const USERNAME_MAX_LEN: usize = 50;
const MAX_HEIGHT_CM: i64 = 300;
const MAX_WEIGHT_KG: i64 = 1000;
/// Decimal places kept by the `NUMERIC(_, 2)` body-metric columns.
pub(crate) const METRIC_SCALE: u32 = 2;

#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub phone: String,
    pub height_cm: Decimal,
    pub weight_kg: Decimal,
    pub birthdate: Option<Date>,
}

pub(crate) fn is_valid_phone(phone: &str) -> bool {
    lazy_static! {
        static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9][0-9\- ]{4,19}$").unwrap();
    }
    phone.len() <= 20 && PHONE_RE.is_match(phone)
}

fn normalize_username(raw: &str) -> Result<String, AppError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(AppError::validation("username is required"));
    }
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(AppError::validation(format!(
            "username must be at most {USERNAME_MAX_LEN} characters"
        )));
    }
    Ok(username.to_string())
}

fn normalize_phone(raw: &str) -> Result<String, AppError> {
    let phone = raw.trim();
    if phone.is_empty() {
        return Err(AppError::validation("phone is required"));
    }
    if !is_valid_phone(phone) {
        return Err(AppError::validation("invalid phone number"));
    }
    Ok(phone.to_string())
}

/// Reject values the store would have to round. `68.50` passes, `68.555` does not.
pub(crate) fn check_scale(name: &str, value: Decimal) -> Result<(), AppError> {
    if value.normalize().scale() > METRIC_SCALE {
        return Err(AppError::validation(format!(
            "{name} allows at most {METRIC_SCALE} decimal places"
        )));
    }
    Ok(())
}

pub(crate) fn check_body_metrics(height_cm: Decimal, weight_kg: Decimal) -> Result<(), AppError> {
    check_scale("height", height_cm)?;
    check_scale("weight", weight_kg)?;
    if height_cm.is_sign_negative() || height_cm > Decimal::from(MAX_HEIGHT_CM) {
        return Err(AppError::validation("height must be between 0 and 300 cm"));
    }
    if weight_kg.is_sign_negative() || weight_kg > Decimal::from(MAX_WEIGHT_KG) {
        return Err(AppError::validation("weight must be between 0 and 1000 kg"));
    }
    Ok(())
}

/// Create an account. The pre-check gives a friendly error; the store's
/// unique constraint still decides when two registrations race.
pub async fn register(
    accounts: &dyn AccountStore,
    clock: &dyn Clock,
    req: Registration,
) -> Result<Account, AppError> {
    let username = normalize_username(&req.username)?;
    let phone = normalize_phone(&req.phone)?;
    check_password_policy(&req.password).map_err(AppError::Validation)?;
    check_body_metrics(req.height_cm, req.weight_kg)?;

    if accounts.find_by_username(&username).await?.is_some() {
        warn!(%username, "username already registered");
        return Err(AppError::Conflict("username already exists".into()));
    }

    let password_hash = hash_password(&req.password)?;
    let account = accounts
        .insert(Account {
            id: Uuid::new_v4(),
            username,
            password_hash,
            phone,
            height_cm: req.height_cm,
            weight_kg: req.weight_kg,
            birthdate: req.birthdate,
            created_at: clock.now(),
        })
        .await?;

    info!(account_id = %account.id, username = %account.username, "account registered");
    Ok(account)
}

pub async fn get_account(accounts: &dyn AccountStore, id: Uuid) -> Result<Account, AppError> {
    accounts
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found("account not found"))
}

/// Apply `patch` to the account. Username, phone and birthdate change only when
/// present; height and weight are always written.
pub async fn update_account(
    accounts: &dyn AccountStore,
    id: Uuid,
    mut patch: AccountPatch,
) -> Result<(), AppError> {
    patch.username = patch.username.as_deref().map(normalize_username).transpose()?;
    patch.phone = patch.phone.as_deref().map(normalize_phone).transpose()?;
    check_body_metrics(patch.height_cm, patch.weight_kg)?;

    match accounts.update(id, &patch).await? {
        Some(account) => {
            info!(account_id = %account.id, "account updated");
            Ok(())
        }
        None => {
            warn!(account_id = %id, "update for unknown account");
            Err(AppError::not_found("account not found"))
        }
    }
}
