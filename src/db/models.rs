use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub username: String,
    /// PHC-format hash. Older stores wrote this under `password`.
    #[serde(alias = "password")]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn admin(id: u64, username: impl Into<String>, password_hash: String) -> Self {
        Self {
            id,
            username: username.into(),
            password_hash,
            role: Role::Admin,
            created_at: Utc::now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub site_name: String,
    pub theme_color: String,
    pub logo_url: Option<String>,
    pub maintenance_mode: bool,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "AnimeVerse Pro".to_string(),
            theme_color: "#3498db".to_string(),
            logo_url: None,
            maintenance_mode: false,
        }
    }
}
