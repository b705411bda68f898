use std::io;

use serde::Serialize;
use serde_json::Value;
use tradeboard_client::{ClientError, FailureEnvelope, SuccessEnvelope};

const JSON_VERSION: &str = "v1";

/// Commands whose `data` is emitted inside the versioned envelope as is.
const ENVELOPED_COMMANDS: [&str; 6] = [
    "import",
    "indicators show",
    "indicators set",
    "indicators set-total",
    "vendors show",
    "template",
];

#[derive(Serialize)]
struct VersionedSuccess<'a> {
    ok: bool,
    version: &'static str,
    data: &'a Value,
}

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    let command = success.command.as_str();
    if command == "import list" {
        return to_pretty(&imports_newest_first(success.rows()));
    }
    if !ENVELOPED_COMMANDS.contains(&command) {
        return Err(io::Error::other(format!(
            "no JSON rendering for `{command}`"
        )));
    }

    to_pretty(&VersionedSuccess {
        ok: true,
        version: JSON_VERSION,
        data: &success.data,
    })
}

pub fn render_error_json(error: &ClientError) -> io::Result<String> {
    to_pretty(&FailureEnvelope::from(error))
}

/// `import list --json` is a bare array. Stamps are fixed-width RFC 3339,
/// so text order is time order; ties fall back to the import id.
fn imports_newest_first(rows: &[Value]) -> Vec<&Value> {
    let mut ordered = rows.iter().collect::<Vec<&Value>>();
    ordered.sort_by(|left, right| recency(right).cmp(&recency(left)));
    ordered
}

fn recency(row: &Value) -> (&str, &str) {
    (text_field(row, "created_at"), text_field(row, "import_id"))
}

fn text_field<'a>(row: &'a Value, key: &str) -> &'a str {
    row.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn to_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}
