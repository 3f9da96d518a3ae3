use crate::error::VerseError;
use axum_extra::extract::cookie::Key;
use figment::{
    Figment,
    providers::{Env, Format, Json},
    value::{Uncased, UncasedStr},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const ENV_PREFIX: &str = "ANIMEVERSE_";

/// Minimum secret length accepted for deriving the cookie key.
pub const MIN_SECRET_KEY_LEN: usize = 32;

const COOKIE_KEY_SALT: &[u8] = b"animeverse-pro/cookie-key";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub server: ServerConfig,
    pub initial_admin: InitialAdmin,
    pub storage: StorageConfig,
    pub password: PasswordConfig,
    pub tracker: TrackerConfig,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            initial_admin: InitialAdmin::default(),
            storage: StorageConfig::default(),
            password: PasswordConfig::default(),
            tracker: TrackerConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub port: u16,
    pub secret_key: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 24961,
            secret_key: String::new(),
        }
    }
}

/// First-run administrator credentials. Only consulted when the user store is empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitialAdmin {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl InitialAdmin {
    /// Both credentials, or a configuration error naming the missing key.
    pub fn credentials(&self) -> Result<(&str, &str), VerseError> {
        let username = self
            .username
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                VerseError::Configuration("initialAdmin.username is required".to_string())
            })?;
        let password = self
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                VerseError::Configuration("initialAdmin.password is required".to_string())
            })?;
        Ok((username, password))
    }

    /// Drop the plaintext password once bootstrap has consumed it.
    pub fn discard_password(&mut self) {
        self.password = None;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub public_dir: PathBuf,
    pub uploads_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            public_dir: PathBuf::from("public"),
            uploads_dir: PathBuf::from("public/uploads"),
        }
    }
}

impl StorageConfig {
    /// All storage roots rooted under `base`.
    pub fn rooted_at(base: &Path) -> Self {
        Self {
            data_dir: base.join("data"),
            public_dir: base.join("public"),
            uploads_dir: base.join("public").join("uploads"),
        }
    }

    /// Directories provisioned at startup, in creation order.
    pub fn directories(&self) -> [&Path; 3] {
        [&self.data_dir, &self.public_dir, &self.uploads_dir]
    }
}

/// Argon2id work parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordConfig {
    /// Iteration count (time cost).
    pub cost: u32,
    pub memory_kib: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            cost: 10,
            memory_kib: 19 * 1024,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackerConfig {
    pub enabled: bool,
    pub interval_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 300,
        }
    }
}

impl Config {
    /// Layer `config.json` (if present) and `ANIMEVERSE_*` env vars over the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VerseError> {
        let cfg = Figment::new()
            .merge(Json::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).map(env_key))
            .extract::<Config>()?;
        Ok(cfg)
    }

    /// Path from `ANIMEVERSE_CONFIG`, falling back to `config.json`.
    pub fn default_path() -> PathBuf {
        std::env::var_os(format!("{ENV_PREFIX}CONFIG"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Cookie key for sessions and flash messages, derived from `server.secretKey`.
    pub fn cookie_key(&self) -> Result<Key, VerseError> {
        let secret = self.server.secret_key.as_bytes();
        if secret.len() < MIN_SECRET_KEY_LEN {
            return Err(VerseError::Configuration(format!(
                "server.secretKey must be at least {MIN_SECRET_KEY_LEN} bytes"
            )));
        }
        let mut master = [0u8; 64];
        argon2::Argon2::default()
            .hash_password_into(secret, COOKIE_KEY_SALT, &mut master)
            .map_err(|e| VerseError::Configuration(format!("cookie key derivation failed: {e}")))?;
        Ok(Key::from(&master[..]))
    }
}

/// `Env` hands over the variable name in its original case, e.g. `PORT`.
fn env_key(key: &UncasedStr) -> Uncased<'_> {
    match key.as_str().to_ascii_lowercase().as_str() {
        "port" => Uncased::from("server.port"),
        "secret_key" => Uncased::from("server.secretKey"),
        "admin_username" => Uncased::from("initialAdmin.username"),
        "admin_password" => Uncased::from("initialAdmin.password"),
        "data_dir" => Uncased::from("storage.dataDir"),
        "public_dir" => Uncased::from("storage.publicDir"),
        "uploads_dir" => Uncased::from("storage.uploadsDir"),
        "log_level" => Uncased::from("logLevel"),
        _ => Uncased::from(key.as_str()),
    }
}
