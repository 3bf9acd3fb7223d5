use rust_decimal::Decimal;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Account row. Holds the current profile used for BMI.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String, // argon2 PHC string, never the plaintext
    pub phone: String,
    pub height_cm: Decimal,
    pub weight_kg: Decimal,
    pub birthdate: Option<Date>,
    pub created_at: OffsetDateTime,
}

/// Sparse update for an [`Account`].
///
/// `None` means "not sent" and keeps the stored value. Height and weight are
/// not optional: this path always overwrites them, zero included.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountPatch {
    pub username: Option<String>,
    pub phone: Option<String>,
    pub birthdate: Option<Date>,
    pub height_cm: Decimal,
    pub weight_kg: Decimal,
}

impl AccountPatch {
    /// Merge the patch over `existing` and return the resulting account.
    pub fn apply(&self, existing: Account) -> Account {
        Account {
            username: self.username.clone().unwrap_or(existing.username),
            phone: self.phone.clone().unwrap_or(existing.phone),
            birthdate: self.birthdate.or(existing.birthdate),
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            ..existing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn account() -> Account {
        Account {
            id: Uuid::new_v4(),
            username: "mei".into(),
            password_hash: "$argon2id$stub".into(),
            phone: "+8613800138000".into(),
            height_cm: Decimal::new(170, 0),
            weight_kg: Decimal::new(68, 0),
            birthdate: Some(date!(1990 - 05 - 01)),
            created_at: datetime!(2024-01-01 0:00 UTC),
        }
    }

    #[test]
    fn absent_fields_keep_stored_values() {
        let before = account();
        let patch = AccountPatch {
            username: Some("mei_l".into()),
            phone: None,
            birthdate: None,
            height_cm: Decimal::new(170, 0),
            weight_kg: Decimal::new(68, 0),
        };

        let after = patch.apply(before.clone());
        assert_eq!(after.username, "mei_l");
        assert_eq!(after.phone, before.phone);
        assert_eq!(after.birthdate, before.birthdate);
        assert_eq!(after.id, before.id);
        assert_eq!(after.password_hash, before.password_hash);
        assert_eq!(after.created_at, before.created_at);
    }

    #[test]
    fn height_and_weight_are_always_overwritten() {
        let patch = AccountPatch {
            username: None,
            phone: None,
            birthdate: None,
            height_cm: Decimal::ZERO,
            weight_kg: Decimal::ZERO,
        };

        let after = patch.apply(account());
        assert_eq!(after.height_cm, Decimal::ZERO);
        assert_eq!(after.weight_kg, Decimal::ZERO);
        assert_eq!(after.username, "mei");
    }

    #[test]
    fn present_empty_values_are_not_treated_as_absent() {
        let patch = AccountPatch {
            username: None,
            phone: Some(String::new()),
            birthdate: None,
            height_cm: Decimal::new(170, 0),
            weight_kg: Decimal::new(68, 0),
        };
        assert_eq!(patch.apply(account()).phone, "");
    }
}
