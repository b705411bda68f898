use std::io;

use serde_json::Value;

use super::format::{self, Column};

const METRIC_COLUMNS: [&str; 4] = ["PDV", "Fachadas", "PitStop", "Academia"];

pub fn render_vendors(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("vendors output requires rows"))?;

    let year = data.get("year").and_then(Value::as_i64).unwrap_or(0);
    let month = data.get("month").and_then(Value::as_i64).unwrap_or(0);
    let mut heading = format!("Vendor scorecard {year}-{month:02}");
    if let Some(team) = data.get("team").and_then(Value::as_str) {
        heading.push_str(&format!(", team {team}"));
    }
    if let Some(area) = data.get("area").and_then(Value::as_str) {
        heading.push_str(&format!(", {area}"));
    }
    let mut lines = vec![heading, String::new()];

    if rows.is_empty() {
        lines.push("  No vendors match this period and filter.".to_string());
        if let Some(hint) = period_hint(data) {
            lines.push(hint);
        }
        return Ok(lines.join("\n"));
    }

    let mut columns = vec![
        Column::left("Vendor"),
        Column::left("Team"),
        Column::left("Area"),
    ];
    columns.extend(METRIC_COLUMNS.iter().map(|name| Column::right(name)));
    let table_rows = rows
        .iter()
        .map(|row| {
            let mut cells = vec![
                text(row, "name"),
                text(row, "team"),
                text(row, "area"),
            ];
            cells.extend(metric_cells(row));
            cells
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(format::render_table_or_blocks(
        &columns,
        &table_rows,
        format::terminal_width(),
        "Vendor",
    ));

    if let Some(teams) = data.get("teams").and_then(Value::as_array) {
        let mut team_columns = vec![Column::left("Team")];
        team_columns.extend(METRIC_COLUMNS.iter().map(|name| Column::right(name)));
        let team_rows = teams
            .iter()
            .map(|team| {
                let name = team
                    .get("totals")
                    .map(|totals| text(totals, "team"))
                    .unwrap_or_else(|| "unknown".to_string());
                let mut cells = vec![name];
                cells.extend(metric_cells(team));
                cells
            })
            .collect::<Vec<Vec<String>>>();

        lines.push(String::new());
        lines.push("Team totals:".to_string());
        lines.extend(format::render_table_or_blocks(
            &team_columns,
            &team_rows,
            format::terminal_width(),
            "Team",
        ));
    }

    let overall = data.get("overall");
    lines.push(String::new());
    lines.extend(format::key_value_rows(
        &[(
            "Overall:",
            format!(
                "{}/{} ({}%)",
                number(overall.and_then(|value| value.get("real"))),
                number(overall.and_then(|value| value.get("meta"))),
                number(data.get("overall_percentage")),
            ),
        )],
        0,
    ));

    Ok(lines.join("\n"))
}

/// One cell per metric: `real/meta pct% light`.
fn metric_cells(row: &Value) -> Vec<String> {
    let metrics = row
        .get("metrics")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    METRIC_COLUMNS
        .iter()
        .map(|label| {
            let Some(score) = metrics
                .iter()
                .find(|metric| metric.get("label").and_then(Value::as_str) == Some(label))
                .and_then(|metric| metric.get("score"))
            else {
                return "-".to_string();
            };
            format!(
                "{}/{} {}% {}",
                number(score.get("real")),
                number(score.get("meta")),
                number(score.get("percentage")),
                score.get("light").and_then(Value::as_str).unwrap_or("?"),
            )
        })
        .collect()
}

fn period_hint(data: &Value) -> Option<String> {
    let years = data
        .get("available_years")
        .and_then(Value::as_array)?
        .iter()
        .filter_map(Value::as_i64)
        .map(|year| year.to_string())
        .collect::<Vec<String>>();
    if years.is_empty() {
        return Some("  Run `tradeboard import create <path>` to load vendors.".to_string());
    }
    Some(format!("  Years with vendor data: {}", years.join(", ")))
}

fn text(row: &Value, key: &str) -> String {
    row.get(key)
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}

fn number(value: Option<&Value>) -> String {
    value.and_then(Value::as_i64).unwrap_or(0).to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::render_vendors;

    fn metric(label: &str, meta: u32, real: u32, percentage: u32, light: &str) -> Value {
        json!({
            "metric": label.to_lowercase(),
            "label": label,
            "score": {
                "meta": meta,
                "real": real,
                "percentage": percentage,
                "deviation": i64::from(real) - i64::from(meta),
                "light": light
            }
        })
    }

    #[test]
    fn renders_vendor_rows_and_team_totals() {
        let metrics = vec![
            metric("PDV", 2, 2, 100, "green"),
            metric("Fachadas", 1, 0, 0, "red"),
            metric("PitStop", 0, 0, 0, "red"),
            metric("Academia", 1, 1, 100, "green"),
        ];
        let data = json!({
            "year": 2024,
            "month": 1,
            "team": "Manoel",
            "rows": [
                {"name": "Joaquim B.", "team": "Manoel", "area": "Área 1", "metrics": metrics}
            ],
            "teams": [
                {"totals": {"team": "Manoel"}, "metrics": metrics}
            ],
            "overall": {"meta": 4, "real": 3},
            "overall_percentage": 75,
            "available_years": [2024]
        });

        let rendered = render_vendors(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Vendor scorecard 2024-01, team Manoel"));
            assert!(text.contains("Joaquim B."));
            assert!(text.contains("2/2 100% green"));
            assert!(text.contains("0/1 0% red"));
            assert!(text.contains("Team totals:"));
            assert!(text.contains("Overall:  3/4 (75%)"));
        }
    }

    #[test]
    fn empty_period_points_to_years_with_data() {
        let data = json!({
            "year": 2022,
            "month": 5,
            "rows": [],
            "teams": [],
            "available_years": [2024, 2023]
        });

        let rendered = render_vendors(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("No vendors match"));
            assert!(text.contains("Years with vendor data: 2024, 2023"));
        }
    }
}
