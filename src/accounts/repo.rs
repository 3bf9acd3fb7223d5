use async_trait::async_trait;
use uuid::Uuid;

use crate::accounts::repo_types::{Account, AccountPatch};
use crate::db::{PgStore, StoreError};

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;

    /// Insert a new account. A taken username yields `UniqueViolation("username")`
    /// even when two inserts race.
    async fn insert(&self, account: Account) -> Result<Account, StoreError>;

    /// Read-modify-write of one account under row isolation.
    /// Returns `None` when the account does not exist.
    async fn update(&self, id: Uuid, patch: &AccountPatch) -> Result<Option<Account>, StoreError>;
}

#[async_trait]
impl AccountStore for PgStore {
    async fn get(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, password_hash, phone, height_cm, weight_kg, birthdate, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(account)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, password_hash, phone, height_cm, weight_kg, birthdate, created_at
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(account)
    }

    async fn insert(&self, account: Account) -> Result<Account, StoreError> {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (id, username, password_hash, phone, height_cm, weight_kg, birthdate, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, username, password_hash, phone, height_cm, weight_kg, birthdate, created_at
            "#,
        )
        .bind(account.id)
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(&account.phone)
        .bind(account.height_cm)
        .bind(account.weight_kg)
        .bind(account.birthdate)
        .bind(account.created_at)
        .fetch_one(&self.db)
        .await
        .map_err(|e| StoreError::from_write(e, "username"))
    }

    async fn update(&self, id: Uuid, patch: &AccountPatch) -> Result<Option<Account>, StoreError> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, password_hash, phone, height_cm, weight_kg, birthdate, created_at
            FROM accounts
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(existing) = existing else {
            tx.rollback().await?;
            return Ok(None);
        };

        let merged = patch.apply(existing);
        let updated = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
               SET username = $2, phone = $3, height_cm = $4, weight_kg = $5, birthdate = $6
             WHERE id = $1
            RETURNING id, username, password_hash, phone, height_cm, weight_kg, birthdate, created_at
            "#,
        )
        .bind(id)
        .bind(&merged.username)
        .bind(&merged.phone)
        .bind(merged.height_cm)
        .bind(merged.weight_kg)
        .bind(merged.birthdate)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| StoreError::from_write(e, "username"))?;

        tx.commit().await?;
        Ok(Some(updated))
    }
}
