use crate::error::VerseError;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Named JSON documents with create-if-absent semantics.
pub trait DocumentStore: Send + Sync {
    /// Parsed document, or `None` when it has never been written.
    fn read(&self, name: &str) -> Result<Option<Value>, VerseError>;

    /// Create `name` with `default` unless it already exists. Returns whether it wrote.
    fn write_if_absent(&self, name: &str, default: &Value) -> Result<bool, VerseError>;

    /// Overwrite `name` with `value`.
    fn replace(&self, name: &str, value: &Value) -> Result<(), VerseError>;
}

/// Pretty-print with four-space indentation; keys come out sorted.
pub fn to_pretty_json(value: &Value) -> Result<Vec<u8>, VerseError> {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Items of a list document; an absent document reads as empty.
pub fn read_list(store: &dyn DocumentStore, name: &str) -> Result<Vec<Value>, VerseError> {
    match store.read(name)? {
        Some(value) => as_list(name, value),
        None => Ok(Vec::new()),
    }
}

pub fn as_list(name: &str, value: Value) -> Result<Vec<Value>, VerseError> {
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(VerseError::NotAList {
            file: name.to_string(),
        }),
    }
}

fn parse_document(name: &str, text: &str) -> Result<Value, VerseError> {
    serde_json::from_str(text).map_err(|e| VerseError::parse(name, e))
}

/// One `<name>` file per document under a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl DocumentStore for JsonFileStore {
    fn read(&self, name: &str) -> Result<Option<Value>, VerseError> {
        let path = self.path_of(name);
        match fs::read_to_string(&path) {
            Ok(text) => parse_document(name, &text).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VerseError::filesystem(path, e)),
        }
    }

    fn write_if_absent(&self, name: &str, default: &Value) -> Result<bool, VerseError> {
        let bytes = to_pretty_json(default)?;
        create_new_with(&self.path_of(name), |file| {
            file.write_all(&bytes)?;
            file.sync_all()
        })
    }

    fn replace(&self, name: &str, value: &Value) -> Result<(), VerseError> {
        let path = self.path_of(name);
        let tmp = self.path_of(&format!("{name}.tmp"));
        let bytes = to_pretty_json(value)?;
        let written = fs::write(&tmp, &bytes)
            .map_err(|e| VerseError::filesystem(&tmp, e))
            .and_then(|_| fs::rename(&tmp, &path).map_err(|e| VerseError::filesystem(&path, e)));
        if written.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        written
    }
}

/// Create `path` only if it does not exist and fill it with `fill`.
/// A failed fill removes the file again.
fn create_new_with(
    path: &Path,
    fill: impl FnOnce(&mut fs::File) -> std::io::Result<()>,
) -> Result<bool, VerseError> {
    // `create_new` fails instead of truncating when the file already exists.
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(VerseError::filesystem(path, e)),
    };
    if let Err(e) = fill(&mut file) {
        drop(file);
        let _ = fs::remove_file(path);
        return Err(VerseError::filesystem(path, e));
    }
    Ok(true)
}

/// In-memory store keyed by document name, holding the raw serialized text.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document with arbitrary text, valid JSON or not.
    pub fn insert_raw(&self, name: &str, text: impl Into<String>) {
        self.docs().insert(name.to_string(), text.into());
    }

    pub fn raw(&self, name: &str) -> Option<String> {
        self.docs().get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.docs().keys().cloned().collect()
    }

    fn docs(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.docs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DocumentStore for MemoryStore {
    fn read(&self, name: &str) -> Result<Option<Value>, VerseError> {
        self.docs()
            .get(name)
            .map(|text| parse_document(name, text))
            .transpose()
    }

    fn write_if_absent(&self, name: &str, default: &Value) -> Result<bool, VerseError> {
        let mut docs = self.docs();
        if docs.contains_key(name) {
            return Ok(false);
        }
        let text = String::from_utf8_lossy(&to_pretty_json(default)?).into_owned();
        docs.insert(name.to_string(), text);
        Ok(true)
    }

    fn replace(&self, name: &str, value: &Value) -> Result<(), VerseError> {
        let text = String::from_utf8_lossy(&to_pretty_json(value)?).into_owned();
        self.docs().insert(name.to_string(), text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn file_store_never_overwrites_on_write_if_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        assert!(store.write_if_absent("doc.json", &json!([1])).unwrap());
        assert!(!store.write_if_absent("doc.json", &json!([2])).unwrap());
        assert_eq!(store.read("doc.json").unwrap(), Some(json!([1])));
    }

    #[test]
    fn file_store_reports_absent_and_corrupt_documents() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        assert_eq!(store.read("missing.json").unwrap(), None);

        fs::write(dir.path().join("bad.json"), "not-json").unwrap();
        let err = store.read("bad.json").unwrap_err();
        assert!(matches!(err, VerseError::Parse { ref file, .. } if file == "bad.json"));
    }

    #[test]
    fn file_store_writes_four_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        store.replace("doc.json", &json!({"a": [true]})).unwrap();
        let text = fs::read_to_string(dir.path().join("doc.json")).unwrap();
        assert_eq!(text, "{\n    \"a\": [\n        true\n    ]\n}");
        assert!(!dir.path().join("doc.json.tmp").exists());
    }

    #[test]
    fn failed_create_leaves_no_partial_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        let path = store.path_of("users.json");

        let err = create_new_with(&path, |file| {
            file.write_all(b"[")?;
            Err(std::io::Error::new(ErrorKind::StorageFull, "disk full"))
        })
        .unwrap_err();
        assert!(matches!(err, VerseError::Filesystem { .. }));
        assert!(!path.exists());

        assert_eq!(store.read("users.json").unwrap(), None);
        assert!(store.write_if_absent("users.json", &json!([])).unwrap());
        assert_eq!(store.read("users.json").unwrap(), Some(json!([])));
    }

    #[test]
    fn failed_replace_removes_its_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        // A non-empty directory in the way makes the rename fail.
        fs::create_dir_all(dir.path().join("doc.json").join("child")).unwrap();

        let err = store.replace("doc.json", &json!([1])).unwrap_err();
        assert!(matches!(err, VerseError::Filesystem { .. }));
        assert!(!dir.path().join("doc.json.tmp").exists());
        assert!(dir.path().join("doc.json").is_dir());
    }

    #[test]
    fn memory_store_keeps_raw_text() {
        let store = MemoryStore::new();
        store.insert_raw("users.json", "not-json");

        assert!(store.read("users.json").is_err());
        assert!(!store.write_if_absent("users.json", &json!([])).unwrap());
        assert_eq!(store.raw("users.json").as_deref(), Some("not-json"));
    }
}
