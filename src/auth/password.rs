use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::{error, warn};

pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 100;

/// Length rules for a new credential, counted in characters.
pub fn check_password_policy(plain: &str) -> Result<(), String> {
    let len = plain.chars().count();
    if len < PASSWORD_MIN_LEN {
        return Err(format!("password must be at least {PASSWORD_MIN_LEN} characters"));
    }
    if len > PASSWORD_MAX_LEN {
        return Err(format!("password must be at most {PASSWORD_MAX_LEN} characters"));
    }
    Ok(())
}

/// One-way salted hash of a credential, as an argon2id PHC string.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Check `plain` against a stored PHC string. Inputs longer than any
/// password we accept are refused without running argon2.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    if plain.chars().count() > PASSWORD_MAX_LEN {
        warn!("password over maximum length offered for verification");
        return Ok(false);
    }
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
