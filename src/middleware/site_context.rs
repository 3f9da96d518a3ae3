use super::session::{Flash, SessionUser, current_user, take_flash};
use crate::db::{DocumentStore, SeedDocument, SiteSettings};
use crate::error::VerseError;
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Serialize;

/// Values every rendered page receives: site settings, the session user and
/// the flash messages consumed by this request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    pub site: SiteSettings,
    pub user: Option<SessionUser>,
    #[serde(flatten)]
    pub flash: Flash,
}

impl PageContext {
    pub fn load(
        store: &dyn DocumentStore,
        jar: PrivateCookieJar,
    ) -> Result<(Self, PrivateCookieJar), VerseError> {
        let site = load_site_settings(store)?;
        let user = current_user(&jar);
        let (flash, jar) = take_flash(jar);
        Ok((Self { site, user, flash }, jar))
    }

    /// Maintenance mode hides the site from everyone but admins.
    pub fn blocked_by_maintenance(&self) -> bool {
        self.site.maintenance_mode && !self.user.as_ref().is_some_and(SessionUser::is_admin)
    }
}

pub fn load_site_settings(store: &dyn DocumentStore) -> Result<SiteSettings, VerseError> {
    let name = SeedDocument::SiteSettings.file_name();
    match store.read(name)? {
        Some(value) => serde_json::from_value(value).map_err(|e| VerseError::parse(name, e)),
        None => Ok(SiteSettings::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, Role};

    fn context(maintenance: bool, role: Option<Role>) -> PageContext {
        PageContext {
            site: SiteSettings {
                maintenance_mode: maintenance,
                ..SiteSettings::default()
            },
            user: role.map(|role| SessionUser {
                id: 1,
                username: "u".to_string(),
                role,
            }),
            flash: Flash::default(),
        }
    }

    #[test]
    fn maintenance_blocks_everyone_but_admins() {
        assert!(!context(false, None).blocked_by_maintenance());
        assert!(context(true, None).blocked_by_maintenance());
        assert!(context(true, Some(Role::User)).blocked_by_maintenance());
        assert!(!context(true, Some(Role::Admin)).blocked_by_maintenance());
    }

    #[test]
    fn settings_fall_back_to_defaults_when_absent() {
        let store = MemoryStore::new();
        assert_eq!(load_site_settings(&store).unwrap(), SiteSettings::default());

        store.insert_raw(
            "site_settings.json",
            r##"{"siteName":"Otaku Hub","themeColor":"#000000","logoUrl":"/uploads/logo.png","maintenanceMode":true}"##,
        );
        let site = load_site_settings(&store).unwrap();
        assert_eq!(site.site_name, "Otaku Hub");
        assert_eq!(site.logo_url.as_deref(), Some("/uploads/logo.png"));
    }
}
