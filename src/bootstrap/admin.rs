use crate::config::{InitialAdmin, PasswordConfig};
use crate::db::store::read_list;
use crate::db::{DocumentStore, SeedDocument, User};
use crate::error::VerseError;
use crate::service::password::hash_password;
use serde_json::Value;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminOutcome {
    Created { username: String },
    Skipped { existing_users: usize },
}

/// Seed the first administrator when the user store is an empty list.
/// A non-empty store is left alone without hashing or role checks.
pub fn ensure_admin(
    store: &dyn DocumentStore,
    admin: &InitialAdmin,
    password_cfg: &PasswordConfig,
) -> Result<AdminOutcome, VerseError> {
    let name = SeedDocument::Users.file_name();
    let mut users = read_list(store, name)?;

    if !users.is_empty() {
        debug!(existing_users = users.len(), "user store populated; admin step skipped");
        return Ok(AdminOutcome::Skipped {
            existing_users: users.len(),
        });
    }

    let (username, password) = admin.credentials()?;
    let password_hash = hash_password(password, password_cfg)?;
    users.push(serde_json::to_value(User::admin(1, username, password_hash))?);
    store.replace(name, &Value::Array(users))?;

    info!(username = %username, "[AUTH] admin created");
    Ok(AdminOutcome::Created {
        username: username.to_string(),
    })
}
