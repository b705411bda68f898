pub mod commands;
pub mod contracts;
pub mod error;
pub mod identity;
pub mod import;
pub mod merge;
pub mod migrations;
pub mod model;
pub mod scorecard;
pub mod setup;
pub mod state;
pub mod store;
pub mod summary;
pub mod template;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult, StoreFault};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
