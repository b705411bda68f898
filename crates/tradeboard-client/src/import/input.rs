use std::fs;
use std::io::{IsTerminal, Read};

use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SourceKind {
    File,
    Stdin,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Stdin => "stdin",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedSource {
    pub kind: SourceKind,
    /// File path as given; `None` for stdin.
    pub source_ref: Option<String>,
    pub bytes: Vec<u8>,
}

/// Reads the workbook bytes named by `path`. `-` reads stdin, or
/// `stdin_override` when one is supplied.
pub fn read_source(path: &str, stdin_override: Option<Vec<u8>>) -> ClientResult<ResolvedSource> {
    if path == "-" {
        let bytes = read_stdin(stdin_override)?;
        if bytes.is_empty() {
            return Err(
                ClientError::invalid_argument("Path `-` means stdin input, but stdin was empty.")
                    .with_recovery([
                        "Pipe an .xlsx or .xls workbook into the command.",
                        "Or pass the workbook path instead of `-`.",
                    ]),
            );
        }
        return Ok(ResolvedSource {
            kind: SourceKind::Stdin,
            source_ref: None,
            bytes,
        });
    }

    let bytes = fs::read(path).map_err(|error| {
        ClientError::invalid_argument(&format!("Could not read workbook `{path}`: {error}"))
            .with_recovery([
                "Verify the path exists and is readable.",
                "Rerun tradeboard import create <path>.",
            ])
    })?;

    Ok(ResolvedSource {
        kind: SourceKind::File,
        source_ref: Some(path.to_string()),
        bytes,
    })
}

fn read_stdin(stdin_override: Option<Vec<u8>>) -> ClientResult<Vec<u8>> {
    if let Some(value) = stdin_override {
        return Ok(value);
    }

    if std::io::stdin().is_terminal() {
        return Ok(Vec::new());
    }

    let mut buffer = Vec::new();
    std::io::stdin().read_to_end(&mut buffer).map_err(|error| {
        ClientError::invalid_argument(&format!("Could not read stdin: {error}"))
            .with_recovery(["Retry with an explicit workbook path."])
    })?;

    Ok(buffer)
}
