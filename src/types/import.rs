//! Resource import types for CSV import functionality

use serde::{Deserialize, Serialize};

/// Import issue level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportIssueLevel {
    Info,
    Warning,
    Error,
}

/// Single import issue, reported back to the operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportIssue {
    /// Line of the source file; the header row is line 0
    pub row_number: usize,
    pub level: ImportIssueLevel,
    pub field: String,
    pub message: String,
    pub original_value: Option<String>,
}

// =============================================================================
// CUSTOM ATTRIBUTES
// =============================================================================

/// Kind of a custom attribute. Only informative for the importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomAttributeType {
    #[default]
    SingleLine,
    MultiLine,
    Select,
    Checkbox,
    DateTime,
}

/// Operator-configured extra field applied to resources.
///
/// The importer looks columns up by `label`; the rest of the definition is
/// carried for callers that validate or persist the values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomAttribute {
    #[serde(default)]
    pub id: i32,
    pub label: String,
    #[serde(default, rename = "type")]
    pub attribute_type: CustomAttributeType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub possible_values: Vec<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub admin_only: bool,
}

#[cfg(test)]
impl CustomAttribute {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: 0,
            label: label.into(),
            attribute_type: CustomAttributeType::default(),
            required: false,
            possible_values: Vec::new(),
            sort_order: 0,
            admin_only: false,
        }
    }
}

// =============================================================================
// IMPORTED ROWS
// =============================================================================

/// One resource candidate read from an import file.
///
/// All text values are trimmed and HTML-escaped. Fields without a column in
/// the file hold an empty string (or empty list). Attribute values follow the
/// order of the configured attribute definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedRow {
    pub name: String,
    pub status: String,
    pub schedule: String,
    pub resource_type: String,
    pub sort_order: String,
    pub location: String,
    pub contact: String,
    pub description: String,
    pub notes: String,
    pub resource_administrator: String,
    pub color: String,
    pub resource_groups: Vec<String>,
    pub auto_assign: String,
    pub approval_required: String,
    pub capacity: String,
    pub attributes: Vec<AttributeValue>,
}

/// Value of one custom attribute on an imported row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValue {
    pub label: String,
    pub value: String,
}

impl Default for ImportedRow {
    fn default() -> Self {
        Self {
            name: String::new(),
            status: String::new(),
            schedule: String::new(),
            resource_type: String::new(),
            sort_order: DEFAULT_SORT_ORDER.to_string(),
            location: String::new(),
            contact: String::new(),
            description: String::new(),
            notes: String::new(),
            resource_administrator: String::new(),
            color: String::new(),
            resource_groups: Vec::new(),
            auto_assign: String::new(),
            approval_required: String::new(),
            capacity: String::new(),
            attributes: Vec::new(),
        }
    }
}

/// Sort order used when the file has no value for it
pub const DEFAULT_SORT_ORDER: &str = "0";

impl ImportedRow {
    pub fn auto_assign_flag(&self) -> Option<bool> {
        parse_flag(&self.auto_assign)
    }

    pub fn approval_required_flag(&self) -> Option<bool> {
        parse_flag(&self.approval_required)
    }

    pub fn sort_order_value(&self) -> Option<i32> {
        self.sort_order.trim().parse().ok()
    }

    pub fn capacity_value(&self) -> Option<u32> {
        self.capacity.trim().parse().ok()
    }
}

#[cfg(test)]
impl ImportedRow {
    pub fn attribute(&self, label: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.label == label)
            .map(|a| a.value.as_str())
    }
}

/// Interpret a boolean-like cell value
pub fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "on" => Some(true),
        "false" | "no" | "n" | "0" | "off" => Some(false),
        _ => None,
    }
}

/// Outcome of one import run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    /// Valid rows in source order
    pub rows: Vec<ImportedRow>,
    /// Line numbers (header = 0) of rows that failed validation
    pub skipped_rows: Vec<usize>,
}

impl ImportResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.skipped_rows.is_empty()
    }
}

// =============================================================================
// NATS PAYLOADS
// =============================================================================

/// Request to import resources from an uploaded CSV file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceImportRequest {
    #[serde(default)]
    pub filename: String,
    /// Raw file bytes, base64 encoded so a BOM survives transport
    pub content_base64: String,
    #[serde(default)]
    pub attributes: Vec<CustomAttribute>,
}

/// Result of a resource import, ready for the admin UI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceImportResponse {
    pub filename: String,
    pub rows: Vec<ImportedRow>,
    pub skipped_rows: Vec<usize>,
    pub issues: Vec<ImportIssue>,
}
