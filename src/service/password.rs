use crate::config::PasswordConfig;
use crate::error::VerseError;
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tokio::task;

fn hasher(cfg: &PasswordConfig) -> Result<Argon2<'static>, VerseError> {
    let params = Params::new(cfg.memory_kib, cfg.cost, cfg.parallelism, None)
        .map_err(|e| VerseError::PasswordHash(format!("invalid Argon2 params: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Reject work parameters Argon2 would refuse, without hashing anything.
pub fn check_params(cfg: &PasswordConfig) -> Result<(), VerseError> {
    hasher(cfg).map(|_| ())
}

/// Hash `password` with Argon2id and a fresh random salt, returning a PHC string.
pub fn hash_password(password: &str, cfg: &PasswordConfig) -> Result<String, VerseError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher(cfg)?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| VerseError::PasswordHash(format!("failed to hash password: {e}")))?;
    Ok(hash.to_string())
}

/// Check `password` against a stored PHC string. Work parameters are read from the hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, VerseError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| VerseError::PasswordHash(format!("invalid password hash format: {e}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(VerseError::PasswordHash(format!(
            "password verification failed: {e}"
        ))),
    }
}

/// [`verify_password`] on a blocking thread, for request handlers.
pub async fn verify_password_blocking(password: &str, hash: &str) -> Result<bool, VerseError> {
    let password = password.to_string();
    let hash = hash.to_string();
    task::spawn_blocking(move || verify_password(&password, &hash)).await?
}
