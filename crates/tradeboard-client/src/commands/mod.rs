pub(crate) mod common;
pub mod import;
pub mod indicators;
pub mod template;
pub mod vendors;
