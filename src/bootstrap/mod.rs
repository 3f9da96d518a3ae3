//! Startup provisioning for the on-disk store.
//!
//! `initialize` must complete before the HTTP listener binds. It runs, in order:
//! - a read-only preflight (existing documents parse, admin credentials present when needed)
//! - `directories`: data, public and uploads roots
//! - `seed`: create-if-absent for every seed document
//! - `admin`: first administrator when the user store is empty
//!
//! Concurrent bootstrap of one data directory from several processes is unsupported.

pub mod admin;
pub mod directories;
pub mod seed;

pub use admin::AdminOutcome;

use crate::config::Config;
use crate::db::store::as_list;
use crate::db::{DocumentStore, SeedDocument};
use crate::error::VerseError;
use crate::service::password;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BootstrapState {
    Unstarted,
    DirectoriesReady,
    FilesReady,
    AdminEnsured,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub state: BootstrapState,
    pub created_dirs: Vec<PathBuf>,
    pub seeded: Vec<SeedDocument>,
    pub admin: Option<AdminOutcome>,
}

impl BootstrapReport {
    fn new() -> Self {
        Self {
            state: BootstrapState::Unstarted,
            created_dirs: Vec::new(),
            seeded: Vec::new(),
            admin: None,
        }
    }
}

/// Prepare directories, seed documents and the first admin. Idempotent:
/// a second run over a provisioned store changes nothing.
pub fn initialize(cfg: &Config, store: &dyn DocumentStore) -> Result<BootstrapReport, VerseError> {
    info!("Initializing AnimeVerse-Pro system");
    preflight(cfg, store)?;

    let mut report = BootstrapReport::new();

    report.created_dirs = directories::ensure_directories(&cfg.storage.directories())?;
    report.state = BootstrapState::DirectoriesReady;

    report.seeded = seed::ensure_documents(store)?;
    report.state = BootstrapState::FilesReady;

    report.admin = Some(admin::ensure_admin(
        store,
        &cfg.initial_admin,
        &cfg.password,
    )?);
    report.state = BootstrapState::AdminEnsured;

    report.state = BootstrapState::Complete;
    info!(
        created_dirs = report.created_dirs.len(),
        seeded = report.seeded.len(),
        "system initialized"
    );
    Ok(report)
}

/// Fail before any write when an existing document is unreadable or when the
/// admin step would need credentials that are not configured.
fn preflight(cfg: &Config, store: &dyn DocumentStore) -> Result<(), VerseError> {
    let mut users_empty = true;
    for doc in SeedDocument::ALL {
        let Some(value) = store.read(doc.file_name())? else {
            continue;
        };
        if doc == SeedDocument::Users {
            users_empty = as_list(doc.file_name(), value)?.is_empty();
        }
    }

    if users_empty {
        cfg.initial_admin.credentials()?;
        password::check_params(&cfg.password)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InitialAdmin, PasswordConfig, StorageConfig};
    use crate::db::MemoryStore;

    fn config(base: &std::path::Path) -> Config {
        Config {
            storage: StorageConfig::rooted_at(base),
            initial_admin: InitialAdmin {
                username: Some("root_admin".to_string()),
                password: Some("Secret123!".to_string()),
            },
            password: PasswordConfig {
                cost: 1,
                memory_kib: 1024,
                parallelism: 1,
            },
            ..Config::default()
        }
    }

    #[test]
    fn runs_to_complete_on_fresh_store() {
        let tmp = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();

        let report = initialize(&config(tmp.path()), &store).unwrap();
        assert_eq!(report.state, BootstrapState::Complete);
        assert_eq!(report.created_dirs.len(), 3);
        assert_eq!(report.seeded.len(), 5);
        assert!(matches!(report.admin, Some(AdminOutcome::Created { .. })));
    }

    #[test]
    fn missing_credentials_fail_before_any_write() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cfg = config(&tmp.path().join("app"));
        cfg.initial_admin = InitialAdmin::default();
        let store = MemoryStore::new();

        let err = initialize(&cfg, &store).unwrap_err();
        assert!(matches!(err, VerseError::Configuration(_)));
        assert!(store.names().is_empty());
        assert!(!tmp.path().join("app").exists());
    }

    #[test]
    fn corrupt_settings_abort_before_seeding() {
        let tmp = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();
        store.insert_raw("site_settings.json", "{broken");

        let err = initialize(&config(tmp.path()), &store).unwrap_err();
        assert!(matches!(err, VerseError::Parse { ref file, .. } if file == "site_settings.json"));
        assert_eq!(store.names(), vec!["site_settings.json".to_string()]);
    }

    #[test]
    fn populated_store_needs_no_credentials() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cfg = config(tmp.path());
        cfg.initial_admin = InitialAdmin::default();
        let store = MemoryStore::new();
        store.insert_raw("users.json", "[{\"id\":1}]");

        let report = initialize(&cfg, &store).unwrap();
        assert_eq!(
            report.admin,
            Some(AdminOutcome::Skipped { existing_users: 1 })
        );
    }
}
