pub mod password;
pub mod tracker;
