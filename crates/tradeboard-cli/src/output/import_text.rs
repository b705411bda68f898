use std::io;

use chrono::{DateTime, Local};
use serde_json::Value;
use tradeboard_client::identity::UNRESOLVED_AREA;

use super::format::{self, Column};

pub fn render_import_run(data: &Value) -> io::Result<String> {
    let dry_run = data
        .get("dry_run")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let counts = data
        .get("counts")
        .and_then(Value::as_object)
        .ok_or_else(|| io::Error::other("import output requires counts"))?;

    let mut lines = vec![
        if dry_run {
            "Dry-run validation completed successfully.".to_string()
        } else {
            "Import completed successfully.".to_string()
        },
        String::new(),
        "Summary:".to_string(),
    ];

    let mut entries = Vec::new();
    if let Some(import_id) = data.get("import_id").and_then(Value::as_str) {
        entries.push(("Import ID:", import_id.to_string()));
    }
    entries.push(("Indicator rows:", count(counts.get("indicator_rows"))));
    entries.push(("Vendor rows:", count(counts.get("vendor_rows"))));
    entries.push(("Duplicates dropped:", count(counts.get("duplicates_dropped"))));
    entries.push(("Blank rows skipped:", count(counts.get("blank_rows_skipped"))));
    entries.push(("Merge mode:", merge_mode_label(data)));
    entries.push(("Stored years:", stored_years(data)));
    lines.extend(format::key_value_rows(&entries, 2));

    let unresolved = unresolved_vendors(data);
    if !unresolved.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "Vendors without a territory (shown as `{UNRESOLVED_AREA}`):"
        ));
        lines.extend(unresolved.iter().map(|name| format!("  {name}")));
    }

    if dry_run {
        lines.push(String::new());
        lines.push("Nothing was written because this was a dry run.".to_string());
    }

    lines.push(String::new());
    lines.push("Next step:".to_string());
    if let Some(next_step) = data.get("next_step").and_then(Value::as_object) {
        let label = next_step
            .get("label")
            .and_then(Value::as_str)
            .unwrap_or("Run the next command");
        let command = next_step
            .get("command")
            .and_then(Value::as_str)
            .unwrap_or("tradeboard --help");
        lines.push(format!("  {label}:"));
        lines.push(format!("  {command}"));
    }

    Ok(lines.join("\n"))
}

pub fn render_import_list(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("import list output requires rows"))?;

    if rows.is_empty() {
        return Ok([
            "No imports found yet.",
            "",
            "Run your first import:",
            "  1. tradeboard template board.xlsx",
            "  2. tradeboard import create --dry-run board.xlsx",
            "  3. tradeboard import create board.xlsx",
        ]
        .join("\n"));
    }

    let count_label = if rows.len() == 1 {
        "1 import found.".to_string()
    } else {
        format!("{} imports found.", rows.len())
    };

    let columns = [
        Column::left("Import ID"),
        Column::left("Status"),
        Column::left("Created (local)"),
        Column::left("Merge"),
        Column::right("Indicators"),
        Column::right("Vendors"),
        Column::right("Deduped"),
        Column::left("Source"),
    ];

    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                text(row, "import_id"),
                text(row, "status"),
                format_created_local(row),
                row.get("merge_mode")
                    .and_then(Value::as_str)
                    .unwrap_or("-")
                    .to_string(),
                count(row.get("indicator_rows")),
                count(row.get("vendor_rows")),
                count(row.get("duplicates_dropped")),
                row.get("source_ref")
                    .and_then(Value::as_str)
                    .or_else(|| row.get("source_kind").and_then(Value::as_str))
                    .unwrap_or("-")
                    .to_string(),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec![count_label, String::new(), "Imports:".to_string()];
    lines.extend(format::render_table_or_blocks(
        &columns,
        &table_rows,
        format::terminal_width(),
        "Import",
    ));

    Ok(lines.join("\n"))
}

pub fn render_template(data: &Value) -> io::Result<String> {
    let path = data
        .get("path")
        .and_then(Value::as_str)
        .ok_or_else(|| io::Error::other("template output requires path"))?;
    let sheets = data
        .get("sheets")
        .and_then(Value::as_array)
        .map(|sheets| {
            sheets
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<&str>>()
                .join(", ")
        })
        .unwrap_or_default();

    let mut lines = vec!["Sample workbook written.".to_string(), String::new()];
    lines.extend(format::key_value_rows(
        &[
            ("Path:", path.to_string()),
            ("Bytes:", count(data.get("bytes_written"))),
            ("Sheets:", sheets),
        ],
        2,
    ));
    lines.push(String::new());
    lines.push("Next step:".to_string());
    lines.push(format!("  tradeboard import create --dry-run {path}"));
    Ok(lines.join("\n"))
}

fn merge_mode_label(data: &Value) -> String {
    match data.get("merge_mode").and_then(Value::as_str) {
        Some("merge_months") => "month (only imported months replaced)".to_string(),
        Some("replace_year") => "year (imported years replaced)".to_string(),
        Some(other) => other.to_string(),
        None => "unknown".to_string(),
    }
}

fn stored_years(data: &Value) -> String {
    let years = data
        .get("stored_years")
        .and_then(Value::as_array)
        .map(|years| {
            years
                .iter()
                .filter_map(Value::as_i64)
                .map(|year| year.to_string())
                .collect::<Vec<String>>()
        })
        .unwrap_or_default();
    if years.is_empty() {
        "none".to_string()
    } else {
        years.join(", ")
    }
}

fn unresolved_vendors(data: &Value) -> Vec<String> {
    let Some(vendors) = data
        .get("result")
        .and_then(|result| result.get("vendorsData"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    let mut names = Vec::new();
    for vendor in vendors {
        if vendor.get("area").and_then(Value::as_str) != Some(UNRESOLVED_AREA) {
            continue;
        }
        if let Some(name) = vendor.get("name").and_then(Value::as_str)
            && !names.iter().any(|known: &String| known == name)
        {
            names.push(name.to_string());
        }
    }
    names
}

fn count(value: Option<&Value>) -> String {
    value.and_then(Value::as_i64).unwrap_or(0).to_string()
}

fn text(row: &Value, key: &str) -> String {
    row.get(key)
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}

fn format_created_local(row: &Value) -> String {
    row.get("created_at")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|moment| {
            moment
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{render_import_list, render_import_run, render_template};

    #[test]
    fn import_run_lists_counts_and_unresolved_vendors() {
        let data = json!({
            "dry_run": false,
            "path": "board.xlsx",
            "import_id": "imp_01J",
            "merge_mode": "replace_year",
            "message": "ok",
            "counts": {
                "indicator_rows": 12,
                "vendor_rows": 9,
                "duplicates_dropped": 1,
                "blank_rows_skipped": 0
            },
            "stored_years": [2023, 2024],
            "next_step": {"label": "Review the month", "command": "tradeboard indicators show"},
            "result": {
                "success": true,
                "vendorsData": [
                    {"name": "Luis Felipe", "area": "Área ?"},
                    {"name": "Jocimar", "area": "Área 1"}
                ]
            }
        });

        let rendered = render_import_run(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Import completed successfully."));
            assert!(text.contains("Import ID:"));
            assert!(text.contains("imp_01J"));
            assert!(text.contains("2023, 2024"));
            assert!(text.contains("  Luis Felipe"));
            assert!(!text.contains("  Jocimar"));
            assert!(text.contains("tradeboard indicators show"));
        }
    }

    #[test]
    fn dry_run_says_nothing_was_written() {
        let data = json!({
            "dry_run": true,
            "merge_mode": "merge_months",
            "counts": {"indicator_rows": 1, "vendor_rows": 0},
            "stored_years": [],
            "next_step": {"label": "Commit this import", "command": "tradeboard import create a.xlsx"}
        });

        let rendered = render_import_run(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Dry-run validation completed successfully."));
            assert!(!text.contains("Import ID:"));
            assert!(text.contains("month (only imported months replaced)"));
            assert!(text.contains("Nothing was written"));
        }
    }

    #[test]
    fn import_run_without_counts_is_an_error() {
        assert!(render_import_run(&json!({"dry_run": true})).is_err());
    }

    #[test]
    fn empty_import_list_points_to_first_import() {
        let rendered = render_import_list(&json!({"rows": []}));
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("No imports found yet."));
            assert!(text.contains("tradeboard template board.xlsx"));
        }
    }

    #[test]
    fn import_list_renders_one_row_per_run() {
        let data = json!({
            "rows": [
                {
                    "import_id": "imp_2",
                    "status": "rejected",
                    "created_at": "2024-01-01T00:00:00.000Z",
                    "indicator_rows": 0,
                    "vendor_rows": 0,
                    "duplicates_dropped": 0,
                    "source_kind": "stdin"
                },
                {
                    "import_id": "imp_1",
                    "status": "committed",
                    "created_at": "2023-12-31T22:00:00.000Z",
                    "merge_mode": "year",
                    "indicator_rows": 12,
                    "vendor_rows": 9,
                    "duplicates_dropped": 1,
                    "source_kind": "file",
                    "source_ref": "board.xlsx"
                }
            ]
        });

        let rendered = render_import_list(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("2 imports found."));
            assert!(text.contains("imp_2"));
            assert!(text.contains("rejected"));
            assert!(text.contains("board.xlsx"));
            assert!(text.contains("stdin"));
            assert!(!text.contains("unknown"));
        }
    }

    #[test]
    fn unparseable_timestamp_reads_unknown() {
        let data = json!({
            "rows": [{
                "import_id": "imp_9",
                "status": "committed",
                "created_at": "1704067200",
                "source_kind": "file"
            }]
        });
        let rendered = render_import_list(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("unknown"));
        }
    }

    #[test]
    fn template_output_suggests_dry_run() {
        let data = json!({
            "path": "board.xlsx",
            "bytes_written": 6000,
            "sheets": ["Indicadores", "Vendedores"]
        });
        let rendered = render_template(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("Indicadores, Vendedores"));
            assert!(text.contains("tradeboard import create --dry-run board.xlsx"));
        }
    }
}
