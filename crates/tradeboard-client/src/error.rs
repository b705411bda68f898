use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const IMPORT_HELP_COMMAND: &str = "tradeboard import create --help";

/// Every failure a command can report. `code` is the stable machine-readable
/// identifier; `data` carries structured detail such as import issues.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

/// Ways the local board database can fail to open, migrate or answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFault {
    Locked,
    Corrupt,
    PermissionDenied,
    MigrationFailed,
    InitFailed,
}

impl StoreFault {
    pub const ALL: [StoreFault; 5] = [
        StoreFault::Locked,
        StoreFault::Corrupt,
        StoreFault::PermissionDenied,
        StoreFault::MigrationFailed,
        StoreFault::InitFailed,
    ];

    pub fn code(self) -> &'static str {
        match self {
            StoreFault::Locked => "store_locked",
            StoreFault::Corrupt => "store_corrupt",
            StoreFault::PermissionDenied => "store_init_permission_denied",
            StoreFault::MigrationFailed => "migration_failed",
            StoreFault::InitFailed => "store_init_failed",
        }
    }

    fn summary(self, location: &str) -> String {
        match self {
            StoreFault::Locked => format!("Board database `{location}` is locked by another process"),
            StoreFault::Corrupt => format!("Board database `{location}` is not a valid tradeboard store"),
            StoreFault::PermissionDenied => format!("Board database `{location}` is not writable"),
            StoreFault::MigrationFailed => {
                format!("Board database `{location}` could not be brought to the current schema")
            }
            StoreFault::InitFailed => format!("Board database `{location}` could not be opened"),
        }
    }

    fn recovery(self, location: &str) -> Vec<String> {
        match self {
            StoreFault::Locked => vec![
                "Wait for the other tradeboard command to finish, then retry.".to_string(),
            ],
            StoreFault::Corrupt => vec![
                format!("Move `{location}` aside and re-import the latest workbook."),
            ],
            StoreFault::PermissionDenied => vec![format!(
                "Make `{location}` writable or point `TRADEBOARD_HOME` at another directory."
            )],
            StoreFault::MigrationFailed => vec![
                "Drop the conflicting tables named in the message or use a fresh `TRADEBOARD_HOME`."
                    .to_string(),
            ],
            StoreFault::InitFailed => Vec::new(),
        }
    }
}

impl ClientError {
    fn coded(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            recovery_steps: Vec::new(),
            data: None,
        }
    }

    pub fn with_recovery<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recovery_steps = steps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Failures that point at the store or at tradeboard itself rather than at
    /// what the caller typed or supplied.
    pub fn is_internal(&self) -> bool {
        self.code.starts_with("internal_")
            || StoreFault::ALL
                .iter()
                .any(|fault| fault.code() == self.code)
    }

    pub fn is_store_fault(&self, fault: StoreFault) -> bool {
        self.code == fault.code()
    }

    /// `detail` is the underlying io or sqlite message, when there is one.
    pub fn store(fault: StoreFault, path: &Path, detail: Option<&str>) -> Self {
        let location = path.display().to_string();
        let summary = fault.summary(&location);
        let message = match detail {
            Some(detail) => format!("{summary}: {detail}"),
            None => format!("{summary}."),
        };
        Self::coded(fault.code(), message).with_recovery(fault.recovery(&location))
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::coded("invalid_argument", message)
            .with_recovery(["Run `tradeboard --help` for usage."])
    }

    /// Names the subcommand in both the recovery hint and `data.command_hint`.
    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        match command {
            Some(command) => Self::coded("invalid_argument", message)
                .with_recovery([format!("Run `tradeboard {command} --help` for usage.")])
                .with_data(json!({ "command_hint": command })),
            None => Self::invalid_argument(message),
        }
    }

    /// The bytes could not be decoded as a workbook, or it has fewer than two
    /// sheets. `data` carries the serialized import result.
    pub fn workbook_unreadable(message: &str, data: Value) -> Self {
        Self::coded("workbook_unreadable", message)
            .with_recovery([
                "Save the file as .xlsx or .xls and retry.".to_string(),
                "Keep indicators on the first sheet and vendors on the second.".to_string(),
                format!("Run `{IMPORT_HELP_COMMAND}` to review the workbook layout."),
            ])
            .with_data(data)
    }

    /// One or both sheets failed validation. Nothing was applied.
    pub fn import_rejected(message: &str, data: Value) -> Self {
        Self::coded("import_rejected", message)
            .with_recovery([
                "Fix the listed sheet and line in the workbook.",
                "Rerun tradeboard import create --dry-run <path>.",
                "Then rerun tradeboard import create <path>.",
            ])
            .with_data(data)
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::coded("internal_serialization_error", message)
    }

    pub fn template_write_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::coded(
            "template_write_failed",
            format!("Could not write sample workbook to `{location}`: {detail}"),
        )
        .with_recovery([format!(
            "Check that the directory for `{location}` exists and is writable."
        )])
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
