use std::cmp;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub name: &'a str,
    pub align: Align,
}

impl<'a> Column<'a> {
    pub fn left(name: &'a str) -> Self {
        Self {
            name,
            align: Align::Left,
        }
    }

    pub fn right(name: &'a str) -> Self {
        Self {
            name,
            align: Align::Right,
        }
    }
}

const INDENT: usize = 2;
const COLUMN_GAP: usize = 2;

pub fn terminal_width() -> usize {
    let from_env = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(120);
    cmp::max(from_env, 40)
}

pub fn key_value_rows(entries: &[(&str, String)], indent: usize) -> Vec<String> {
    let label_width = entries
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let padding = " ".repeat(indent);

    entries
        .iter()
        .map(|(label, value)| format!("{padding}{}  {value}", pad(label, label_width, Align::Left)))
        .collect()
}

/// Renders an aligned table, or one block per row when the table would not
/// fit in `max_width`.
pub fn render_table_or_blocks(
    columns: &[Column<'_>],
    rows: &[Vec<String>],
    max_width: usize,
    block_label: &str,
) -> Vec<String> {
    if columns.is_empty() {
        return Vec::new();
    }

    let widths = column_widths(columns, rows);
    let total = INDENT
        + widths.iter().sum::<usize>()
        + COLUMN_GAP * columns.len().saturating_sub(1);
    if total > max_width {
        return render_blocks(columns, rows, block_label);
    }

    let header = columns
        .iter()
        .map(|column| column.name.to_string())
        .collect::<Vec<String>>();
    let mut output = vec![format_row(columns, &header, &widths)];
    output.extend(rows.iter().map(|row| format_row(columns, row, &widths)));
    output
}

fn column_widths(columns: &[Column<'_>], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths = columns
        .iter()
        .map(|column| column.name.chars().count())
        .collect::<Vec<usize>>();

    for row in rows {
        for (index, value) in row.iter().enumerate() {
            if let Some(slot) = widths.get_mut(index) {
                *slot = cmp::max(*slot, value.chars().count());
            }
        }
    }

    widths
}

fn format_row(columns: &[Column<'_>], cells: &[String], widths: &[usize]) -> String {
    let pieces = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let value = cells.get(index).map(String::as_str).unwrap_or("");
            pad(value, widths.get(index).copied().unwrap_or(0), column.align)
        })
        .collect::<Vec<String>>();

    format!("{}{}", " ".repeat(INDENT), pieces.join("  "))
        .trim_end()
        .to_string()
}

/// Pads by character count so accented names stay aligned.
fn pad(value: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(value.chars().count()));
    match align {
        Align::Left => format!("{value}{fill}"),
        Align::Right => format!("{fill}{value}"),
    }
}

fn render_blocks(columns: &[Column<'_>], rows: &[Vec<String>], block_label: &str) -> Vec<String> {
    let mut output = Vec::new();
    for (row_index, row) in rows.iter().enumerate() {
        if row_index > 0 {
            output.push(String::new());
        }
        output.push(format!("  {block_label} {}:", row_index + 1));

        let entries = columns
            .iter()
            .enumerate()
            .map(|(index, column)| (column.name, row.get(index).cloned().unwrap_or_default()))
            .collect::<Vec<(&str, String)>>();
        output.extend(key_value_rows(&entries, 4));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::{Column, key_value_rows, render_table_or_blocks};

    #[test]
    fn key_value_rows_align_labels() {
        let rows = key_value_rows(
            &[
                ("Indicadores:", "12".to_string()),
                ("Vendedores:", "9".to_string()),
            ],
            2,
        );

        assert_eq!(rows[0], "  Indicadores:  12");
        assert_eq!(rows[1], "  Vendedores:   9");
    }

    #[test]
    fn table_aligns_accented_values_by_character() {
        let columns = [Column::left("Vendedor"), Column::right("Meta")];
        let rows = vec![
            vec!["José Neto".to_string(), "1".to_string()],
            vec!["Thayna".to_string(), "12".to_string()],
        ];

        let rendered = render_table_or_blocks(&columns, &rows, 80, "Vendedor");
        assert_eq!(rendered.len(), 3);
        assert_eq!(rendered[0], "  Vendedor   Meta");
        assert_eq!(rendered[1], "  José Neto     1");
        assert_eq!(rendered[2], "  Thayna       12");
    }

    #[test]
    fn narrow_width_falls_back_to_blocks() {
        let columns = [
            Column::left("Vendedor"),
            Column::left("Área"),
            Column::right("PDV"),
        ];
        let rows = vec![vec![
            "Joaquim B.".to_string(),
            "Área 1".to_string(),
            "2/2 100%".to_string(),
        ]];

        let rendered = render_table_or_blocks(&columns, &rows, 20, "Vendedor");
        assert_eq!(rendered[0], "  Vendedor 1:");
        assert!(rendered[1].contains("Vendedor"));
        assert!(rendered[1].contains("Joaquim B."));
        assert!(rendered[2].contains("Área 1"));
        assert!(rendered[3].contains("2/2 100%"));
    }
}
