pub mod bootstrap;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;

pub use bootstrap::initialize;
pub use config::Config;
pub use error::VerseError;
