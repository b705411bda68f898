use serde_json::Value;
use tradeboard_client::ClientError;

pub fn render_error(error: &ClientError) -> String {
    let mut lines = vec![
        "The command did not complete.".to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
    ];

    let issues = issue_lines(error.data.as_ref());
    if !issues.is_empty() {
        lines.push(String::new());
        lines.push("Issues:".to_string());
        lines.extend(issues);
    }

    lines.push(String::new());
    lines.push("What to do next:".to_string());
    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        for (index, step) in error.recovery_steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    lines.join("\n")
}

fn issue_lines(data: Option<&Value>) -> Vec<String> {
    let Some(issues) = data
        .and_then(|value| value.get("issues"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    issues
        .iter()
        .map(|issue| {
            let code = issue.get("code").and_then(Value::as_str).unwrap_or("issue");
            let location = match (
                issue.get("sheet").and_then(Value::as_str),
                issue.get("line").and_then(Value::as_u64),
            ) {
                (Some(sheet), Some(line)) => format!("{sheet} sheet, line {line}"),
                (Some(sheet), None) => format!("{sheet} sheet"),
                _ => "workbook".to_string(),
            };
            format!("  - [{code}] {location}")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tradeboard_client::ClientError;

    use super::render_error;

    #[test]
    fn renders_standard_error_layout() {
        let error =
            ClientError::invalid_argument("bad input").with_recovery(["run tradeboard --help"]);

        let rendered = render_error(&error);
        assert!(rendered.starts_with("The command did not complete."));
        assert!(rendered.contains("  Error:    invalid_argument"));
        assert!(rendered.contains("  Details:  bad input"));
        assert!(!rendered.contains("Issues:"));
        assert!(rendered.contains("What to do next:"));
        assert!(rendered.contains("  1. run tradeboard --help"));
    }

    #[test]
    fn lists_import_issues_with_sheet_and_line() {
        let error = ClientError::import_rejected(
            "Planilha 2 (Vendedores): Linha 3: mês inválido",
            json!({
                "issues": [
                    {"sheet": "vendors", "code": "month_out_of_range", "line": 3, "message": "x"}
                ]
            }),
        );

        let rendered = render_error(&error);
        assert!(rendered.contains("Issues:"));
        assert!(rendered.contains("  - [month_out_of_range] vendors sheet, line 3"));
        assert!(rendered.contains("  Error:    import_rejected"));
    }
}
