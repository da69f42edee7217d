//! Destination field type inference from a sample cell.
//!
//! Used only when no prior configuration exists for a column. The
//! classifier is total: every value resolves to some [`FieldType`], and
//! anything unrecognised falls back to [`FieldType::String`].
//!
//! # Algorithm
//!
//! The first matching rule wins:
//!
//! 1. Boolean cell → `boolean`
//! 2. Numeric cell, or text that is a finite decimal number → `number`
//! 3. Text:
//!    - contains a newline → `formattedText`
//!    - parses as a calendar date → `date`
//!    - `#` followed by six hex digits → `color`
//!    - contains an HTML tag → `formattedText`
//!    - absolute URL whose path ends in an image extension → `image`
//!    - any other absolute URL → `link`
//! 4. Everything else, including empty cells → `string`

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use url::Url;

use sheetmap_model::{CellValue, FieldType};

static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#[0-9a-f]{6}$").expect("valid color pattern")
});

static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<[a-z].*>").expect("valid html tag pattern")
});

const IMAGE_EXTENSIONS: [&str; 7] = ["gif", "jpg", "jpeg", "png", "apng", "svg", "webp"];

const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%a, %d %b %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Infers the destination field type for one representative cell.
pub fn infer_field_type(value: &CellValue) -> FieldType {
    match value {
        CellValue::Boolean(_) => FieldType::Boolean,
        CellValue::Number(_) => FieldType::Number,
        CellValue::Text(text) => infer_text_type(text),
        CellValue::Null => FieldType::String,
    }
}

/// Infers the type of a text cell.
pub fn infer_text_type(raw: &str) -> FieldType {
    let value = raw.trim();
    if value.is_empty() {
        return FieldType::String;
    }
    if is_numeric_text(value) {
        return FieldType::Number;
    }
    if value.contains('\n') {
        return FieldType::FormattedText;
    }
    if is_date(value) {
        return FieldType::Date;
    }
    if COLOR_RE.is_match(value) {
        return FieldType::Color;
    }
    if HTML_TAG_RE.is_match(value) {
        return FieldType::FormattedText;
    }
    match parse_absolute_url(value) {
        Some(url) if has_image_extension(&url) => FieldType::Image,
        Some(_) => FieldType::Link,
        None => FieldType::String,
    }
}

fn is_numeric_text(value: &str) -> bool {
    value.parse::<f64>().is_ok_and(f64::is_finite)
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
}

/// Returns true if the value parses as a real calendar date or instant.
pub fn is_date(value: &str) -> bool {
    if DateTime::parse_from_rfc3339(value).is_ok() || DateTime::parse_from_rfc2822(value).is_ok() {
        return true;
    }
    if DATE_FORMATS
        .iter()
        .any(|format| NaiveDate::parse_from_str(value, format).is_ok())
    {
        return true;
    }
    DATETIME_FORMATS
        .iter()
        .any(|format| NaiveDateTime::parse_from_str(value, format).is_ok())
}

fn parse_absolute_url(value: &str) -> Option<Url> {
    let url = Url::parse(value).ok()?;
    if url.has_host() || matches!(url.scheme(), "mailto" | "tel") {
        Some(url)
    } else {
        None
    }
}

fn has_image_extension(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    path.rsplit_once('.')
        .is_some_and(|(_, extension)| IMAGE_EXTENSIONS.contains(&extension))
}
