//! Document storage: models and the JSON document store.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring the persisted JSON documents
//! - `documents.rs`: the fixed seed table (file name + default value)
//! - `store.rs`: `DocumentStore` trait with file and in-memory backends

pub mod documents;
pub mod models;
pub mod store;

pub use documents::SeedDocument;
pub use models::{Role, SiteSettings, User};
pub use store::{DocumentStore, JsonFileStore, MemoryStore, read_list};
