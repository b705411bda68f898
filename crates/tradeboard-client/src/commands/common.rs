use std::path::Path;

use chrono::{Datelike, Local};

use crate::setup::{SetupContext, ensure_initialized, ensure_initialized_at};
use crate::{ClientError, ClientResult};

pub(crate) fn load_setup(home_override: Option<&Path>) -> ClientResult<SetupContext> {
    if let Some(home) = home_override {
        return ensure_initialized_at(home);
    }
    ensure_initialized()
}

/// Local calendar year and 1-based month.
pub(crate) fn today() -> (i32, u8) {
    let now = Local::now();
    (now.year(), now.month() as u8)
}

pub(crate) fn validate_month(month: u8, command: &str) -> ClientResult<u8> {
    if (1..=12).contains(&month) {
        return Ok(month);
    }
    Err(ClientError::invalid_argument_for_command(
        &format!("Month must be between 1 and 12, got {month}."),
        Some(command),
    ))
}
