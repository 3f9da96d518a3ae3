pub mod session;
pub mod site_context;

pub use session::{Flash, FlashKind, RequireAdmin, SessionUser};
pub use site_context::PageContext;
