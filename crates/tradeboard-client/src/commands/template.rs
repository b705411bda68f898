use std::fs;
use std::path::Path;

use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::TemplateData;
use crate::template::{INDICATOR_SHEET_NAME, VENDOR_SHEET_NAME, sample_workbook};
use crate::{ClientError, ClientResult};

/// Writes the sample workbook to `path`, replacing any existing file.
pub fn write(path: &str) -> ClientResult<SuccessEnvelope> {
    let target = Path::new(path);
    let bytes = sample_workbook()
        .map_err(|error| ClientError::template_write_failed(target, &error.to_string()))?;
    fs::write(target, &bytes)
        .map_err(|error| ClientError::template_write_failed(target, &error.to_string()))?;
    tracing::info!(path, bytes = bytes.len(), "sample workbook written");

    success(
        "template",
        TemplateData {
            path: path.to_string(),
            bytes_written: bytes.len(),
            sheets: vec![
                INDICATOR_SHEET_NAME.to_string(),
                VENDOR_SHEET_NAME.to_string(),
            ],
        },
    )
}
