//! Typing of raw CSV cells.

use sheetmap_model::CellValue;

/// Converts a raw CSV cell into a typed cell value.
///
/// Empty cells are null, `TRUE`/`FALSE` (any case) are booleans, finite
/// decimal numbers are numbers; everything else stays text with its inner
/// whitespace and line breaks intact.
pub fn parse_cell(raw: &str) -> CellValue {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    if trimmed.is_empty() {
        return CellValue::Null;
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return CellValue::Boolean(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return CellValue::Boolean(false);
    }
    if looks_numeric(trimmed)
        && let Ok(number) = trimmed.parse::<f64>()
        && number.is_finite()
    {
        return CellValue::Number(number);
    }
    CellValue::Text(trimmed.to_string())
}

fn looks_numeric(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        && value.chars().any(|c| c.is_ascii_digit())
}
