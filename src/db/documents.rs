use super::models::SiteSettings;
use serde_json::{Value, json};

/// The documents every install must have before a request is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedDocument {
    Users,
    AnimeLibrary,
    TrackerQueue,
    Notifications,
    SiteSettings,
}

impl SeedDocument {
    pub const ALL: [SeedDocument; 5] = [
        SeedDocument::Users,
        SeedDocument::AnimeLibrary,
        SeedDocument::TrackerQueue,
        SeedDocument::Notifications,
        SeedDocument::SiteSettings,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            SeedDocument::Users => "users.json",
            SeedDocument::AnimeLibrary => "anime_library.json",
            SeedDocument::TrackerQueue => "tracker_queue.json",
            SeedDocument::Notifications => "notifications.json",
            SeedDocument::SiteSettings => "site_settings.json",
        }
    }

    pub fn default_value(self) -> Value {
        match self {
            SeedDocument::SiteSettings => {
                serde_json::to_value(SiteSettings::default()).unwrap_or_else(|_| json!({}))
            }
            _ => json!([]),
        }
    }

    /// Collections are JSON lists; the settings document is a singleton object.
    pub fn is_list(self) -> bool {
        !matches!(self, SeedDocument::SiteSettings)
    }
}

impl std::fmt::Display for SeedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collections_default_to_empty_lists() {
        for doc in SeedDocument::ALL.into_iter().filter(|d| d.is_list()) {
            assert_eq!(doc.default_value(), json!([]), "{doc}");
        }
    }

    #[test]
    fn settings_default_is_an_object() {
        let value = SeedDocument::SiteSettings.default_value();
        assert_eq!(value["siteName"], "AnimeVerse Pro");
        assert_eq!(value["logoUrl"], Value::Null);
    }
}
