use crate::db::{DocumentStore, SeedDocument};
use crate::error::VerseError;
use tracing::debug;

/// Write the default of every seed document that is missing. Existing
/// documents are left exactly as they are.
pub fn ensure_documents(store: &dyn DocumentStore) -> Result<Vec<SeedDocument>, VerseError> {
    let mut seeded = Vec::new();
    for doc in SeedDocument::ALL {
        if store.write_if_absent(doc.file_name(), &doc.default_value())? {
            debug!(document = %doc, "seeded document");
            seeded.push(doc);
        }
    }
    Ok(seeded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use serde_json::json;

    #[test]
    fn fresh_store_gets_every_default() {
        let store = MemoryStore::new();

        let seeded = ensure_documents(&store).unwrap();
        assert_eq!(seeded, SeedDocument::ALL.to_vec());
        for doc in SeedDocument::ALL {
            assert_eq!(
                store.read(doc.file_name()).unwrap(),
                Some(doc.default_value())
            );
        }
    }

    #[test]
    fn existing_documents_are_not_touched() {
        let store = MemoryStore::new();
        let custom = "{\"siteName\":\"Mine\"}";
        store.insert_raw("site_settings.json", custom);
        store.insert_raw("anime_library.json", "[{\"title\":\"Frieren\"}]");

        let seeded = ensure_documents(&store).unwrap();
        assert_eq!(
            seeded,
            vec![
                SeedDocument::Users,
                SeedDocument::TrackerQueue,
                SeedDocument::Notifications
            ]
        );
        assert_eq!(store.raw("site_settings.json").as_deref(), Some(custom));
        assert_eq!(
            store.read("anime_library.json").unwrap(),
            Some(json!([{"title": "Frieren"}]))
        );
    }
}
