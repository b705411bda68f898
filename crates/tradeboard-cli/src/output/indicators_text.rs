use std::io;

use serde_json::Value;

use super::format::{self, Column};

pub fn render_indicators(data: &Value) -> io::Result<String> {
    let summary = data
        .get("summary")
        .ok_or_else(|| io::Error::other("indicators output requires summary"))?;

    let mut lines = summary_lines(summary);

    if let Some(totals) = data.get("monthly_totals").and_then(Value::as_array) {
        let year = data.get("year").and_then(Value::as_i64).unwrap_or(0);
        let columns = totals
            .iter()
            .map(|total| Column::right(total.get("month").and_then(Value::as_str).unwrap_or("?")))
            .collect::<Vec<Column<'_>>>();
        let values = vec![
            totals
                .iter()
                .map(|total| number(total.get("value")))
                .collect::<Vec<String>>(),
        ];

        lines.push(String::new());
        lines.push(format!("Monthly totals {year}:"));
        lines.extend(format::render_table_or_blocks(
            &columns,
            &values,
            format::terminal_width(),
            "Year",
        ));
    }

    if let Some(years) = data.get("available_years").and_then(Value::as_array)
        && !years.is_empty()
    {
        let joined = years
            .iter()
            .filter_map(Value::as_i64)
            .map(|year| year.to_string())
            .collect::<Vec<String>>()
            .join(", ");
        lines.push(String::new());
        lines.push(format!("Years with data: {joined}"));
    }

    Ok(lines.join("\n"))
}

pub fn render_indicator_update(data: &Value) -> io::Result<String> {
    let summary = data
        .get("summary")
        .ok_or_else(|| io::Error::other("indicator update output requires summary"))?;
    let updated = data
        .get("updated")
        .and_then(Value::as_array)
        .map(|keys| {
            keys.iter()
                .filter_map(Value::as_str)
                .collect::<Vec<&str>>()
                .join(", ")
        })
        .unwrap_or_default();

    let mut lines = vec![format!("Updated: {updated}"), String::new()];
    lines.extend(summary_lines(summary));
    Ok(lines.join("\n"))
}

fn summary_lines(summary: &Value) -> Vec<String> {
    let month_name = summary
        .get("month_name")
        .and_then(Value::as_str)
        .unwrap_or("?");
    let year = summary.get("year").and_then(Value::as_i64).unwrap_or(0);
    let on_target = summary
        .get("on_target")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let mut lines = vec![format!("{month_name} {year}"), String::new()];

    let rows = summary
        .get("indicators")
        .and_then(Value::as_array)
        .map(|indicators| {
            indicators
                .iter()
                .map(|indicator| {
                    vec![
                        indicator
                            .get("name")
                            .and_then(Value::as_str)
                            .unwrap_or("?")
                            .to_string(),
                        number(indicator.get("value")),
                        number(indicator.get("target")),
                    ]
                })
                .collect::<Vec<Vec<String>>>()
        })
        .unwrap_or_default();
    lines.extend(format::render_table_or_blocks(
        &[
            Column::left("Indicator"),
            Column::right("Score"),
            Column::right("Target"),
        ],
        &rows,
        format::terminal_width(),
        "Indicator",
    ));

    lines.push(String::new());
    lines.extend(format::key_value_rows(
        &[
            (
                "Total:",
                format!(
                    "{} / {}",
                    number(summary.get("total")),
                    number(summary.get("meta_total"))
                ),
            ),
            (
                "Performance:",
                format!("{}%", number(summary.get("performance_pct"))),
            ),
            (
                "Status:",
                if on_target {
                    "on target".to_string()
                } else {
                    "below the pass line".to_string()
                },
            ),
            (
                "Evolução:",
                summary
                    .get("evolucao")
                    .and_then(Value::as_str)
                    .filter(|value| !value.is_empty())
                    .unwrap_or("-")
                    .to_string(),
            ),
        ],
        2,
    ));
    lines
}

fn number(value: Option<&Value>) -> String {
    value.and_then(Value::as_i64).unwrap_or(0).to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::{render_indicator_update, render_indicators};

    fn summary() -> Value {
        json!({
            "year": 2024,
            "month": 0,
            "month_name": "Janeiro",
            "indicators": [
                {"key": "itb", "name": "ITB", "value": 18, "target": 20},
                {"key": "pdv", "name": "PDV", "value": 22, "target": 25}
            ],
            "total": 83,
            "meta_total": 100,
            "performance_pct": 83,
            "on_target": true,
            "evolucao": ""
        })
    }

    #[test]
    fn renders_month_summary_and_totals() {
        let data = json!({
            "year": 2024,
            "month": 1,
            "summary": summary(),
            "monthly_totals": [{"month": "jan", "value": 83}, {"month": "fev", "value": 0}],
            "available_years": [2024, 2023]
        });

        let rendered = render_indicators(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Janeiro 2024"));
            assert!(text.contains("ITB"));
            assert!(text.contains("83 / 100"));
            assert!(text.contains("83%"));
            assert!(text.contains("on target"));
            assert!(text.contains("Monthly totals 2024:"));
            assert!(text.contains("jan"));
            assert!(text.contains("Years with data: 2024, 2023"));
        }
    }

    #[test]
    fn update_lists_changed_keys() {
        let data = json!({
            "year": 2024,
            "month": 1,
            "updated": ["itb"],
            "summary": summary()
        });

        let rendered = render_indicator_update(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("Updated: itb"));
            assert!(text.contains("Janeiro 2024"));
        }
    }

    #[test]
    fn missing_summary_is_an_error() {
        assert!(render_indicators(&json!({"year": 2024})).is_err());
    }
}
