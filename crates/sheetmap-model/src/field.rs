use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Destination field types supported by the managed collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Boolean,
    Color,
    Number,
    #[default]
    String,
    FormattedText,
    Image,
    Link,
    Date,
}

impl FieldType {
    /// All field types in the order they are offered to the user.
    pub const ALL: [FieldType; 8] = [
        FieldType::Boolean,
        FieldType::Color,
        FieldType::Number,
        FieldType::String,
        FieldType::FormattedText,
        FieldType::Image,
        FieldType::Link,
        FieldType::Date,
    ];

    /// Returns the wire identifier used by the host (`formattedText`, `link`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Boolean => "boolean",
            FieldType::Color => "color",
            FieldType::Number => "number",
            FieldType::String => "string",
            FieldType::FormattedText => "formattedText",
            FieldType::Image => "image",
            FieldType::Link => "link",
            FieldType::Date => "date",
        }
    }

    /// Returns the human-readable label shown next to a column.
    pub fn label(&self) -> &'static str {
        match self {
            FieldType::Boolean => "Boolean",
            FieldType::Color => "Color",
            FieldType::Number => "Number",
            FieldType::String => "String",
            FieldType::FormattedText => "Formatted Text",
            FieldType::Image => "Image",
            FieldType::Link => "Link",
            FieldType::Date => "Date",
        }
    }

    /// Only plain string fields can hold the slug.
    pub fn can_be_slug(&self) -> bool {
        matches!(self, FieldType::String)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ModelError;

    /// Accepts wire identifiers and display labels, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "boolean" | "bool" => Ok(FieldType::Boolean),
            "color" | "colour" => Ok(FieldType::Color),
            "number" => Ok(FieldType::Number),
            "string" | "text" => Ok(FieldType::String),
            "formattedtext" | "richtext" => Ok(FieldType::FormattedText),
            "image" => Ok(FieldType::Image),
            "link" | "url" => Ok(FieldType::Link),
            "date" => Ok(FieldType::Date),
            _ => Err(ModelError::UnknownFieldType(s.to_string())),
        }
    }
}

/// A positional header cell of the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub index: usize,
    pub raw_name: String,
}

impl Column {
    /// Builds columns for every cell of a header row.
    pub fn from_header_row(header_row: &[String]) -> Vec<Column> {
        header_row
            .iter()
            .enumerate()
            .map(|(index, raw_name)| Column {
                index,
                raw_name: raw_name.clone(),
            })
            .collect()
    }
}

/// Field descriptor exchanged with the content-management host.
///
/// `id` is the resolved column name and never changes once created;
/// renames only touch `name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldConfig {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field_type,
        }
    }
}
