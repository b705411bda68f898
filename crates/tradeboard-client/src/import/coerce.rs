//! Lenient numeric coercion for hand-typed spreadsheet cells.
//!
//! A cell that does not hold a number is not an error: it reads as 0. Text
//! cells are read up to the first character that cannot continue a number,
//! so `"12 pts"` reads as 12 and `"75,5"` reads as 75.

use crate::import::workbook::Cell;

/// Integer value of a cell, truncating toward zero.
pub(crate) fn int_value(cell: &Cell) -> Option<i64> {
    match cell {
        Cell::Number(value) if value.is_finite() => Some(value.trunc() as i64),
        Cell::Text(value) => leading_int(value),
        Cell::Number(_) | Cell::Empty | Cell::Bool(_) => None,
    }
}

pub(crate) fn float_value(cell: &Cell) -> Option<f64> {
    let parsed = match cell {
        Cell::Number(value) => Some(*value),
        Cell::Text(value) => leading_float(value),
        Cell::Empty | Cell::Bool(_) => None,
    };
    parsed.filter(|value| value.is_finite())
}

/// Non-negative score; anything unreadable or negative is 0.
pub(crate) fn score(cell: Option<&Cell>) -> u32 {
    cell.and_then(int_value)
        .map(|value| value.clamp(0, i64::from(u32::MAX)) as u32)
        .unwrap_or(0)
}

pub(crate) fn percentage(cell: Option<&Cell>) -> f64 {
    cell.and_then(float_value).unwrap_or(0.0)
}

/// Month in 1..=12, or `None` when missing or out of range.
pub(crate) fn month(cell: Option<&Cell>) -> Option<u8> {
    let value = cell.and_then(int_value)?;
    if (1..=12).contains(&value) {
        return Some(value as u8);
    }
    None
}

/// Year as written; zero, missing or unreadable falls back to `default_year`.
pub(crate) fn year(cell: Option<&Cell>, default_year: i32) -> i32 {
    cell.and_then(int_value)
        .filter(|value| *value != 0)
        .and_then(|value| i32::try_from(value).ok())
        .unwrap_or(default_year)
}

fn leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits_start) = split_sign(trimmed);
    let digits = trimmed[digits_start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect::<String>();
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(sign * magnitude)
}

fn leading_float(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let bytes = trimmed.as_bytes();
    let (_, mut end) = split_sign(trimmed);

    let integer_digits = count_digits(&bytes[end..]);
    end += integer_digits;

    let mut fraction_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction_digits = count_digits(&bytes[end + 1..]);
        if integer_digits > 0 || fraction_digits > 0 {
            end += 1 + fraction_digits;
        }
    }

    if integer_digits == 0 && fraction_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }
        let exponent_digits = count_digits(&bytes[exponent_end.min(bytes.len())..]);
        if exponent_digits > 0 {
            end = exponent_end + exponent_digits;
        }
    }

    trimmed[..end].parse::<f64>().ok()
}

fn split_sign(value: &str) -> (i64, usize) {
    match value.as_bytes().first() {
        Some(b'-') => (-1, 1),
        Some(b'+') => (1, 1),
        _ => (1, 0),
    }
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}
