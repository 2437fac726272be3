//! Header row resolution
//!
//! Maps the column names of an import file onto the known resource fields and
//! the configured custom attributes. Column names are matched
//! case-insensitively and ignoring surrounding whitespace.

use std::collections::BTreeMap;

use crate::types::CustomAttribute;

use super::ImportError;

/// Known resource columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceField {
    Name,
    Status,
    Schedule,
    ResourceType,
    SortOrder,
    Location,
    Contact,
    Description,
    Notes,
    ResourceAdministrator,
    Color,
    ResourceGroups,
    AutoAssign,
    ApprovalRequired,
    Capacity,
}

impl ResourceField {
    pub const ALL: [ResourceField; 15] = [
        ResourceField::Name,
        ResourceField::Status,
        ResourceField::Schedule,
        ResourceField::ResourceType,
        ResourceField::SortOrder,
        ResourceField::Location,
        ResourceField::Contact,
        ResourceField::Description,
        ResourceField::Notes,
        ResourceField::ResourceAdministrator,
        ResourceField::Color,
        ResourceField::ResourceGroups,
        ResourceField::AutoAssign,
        ResourceField::ApprovalRequired,
        ResourceField::Capacity,
    ];

    /// Column name expected in the header row (lower case)
    pub fn header_label(self) -> &'static str {
        match self {
            ResourceField::Name => "name",
            ResourceField::Status => "status",
            ResourceField::Schedule => "schedule",
            ResourceField::ResourceType => "resource type",
            ResourceField::SortOrder => "sort order",
            ResourceField::Location => "location",
            ResourceField::Contact => "contact",
            ResourceField::Description => "description",
            ResourceField::Notes => "notes",
            ResourceField::ResourceAdministrator => "resource administrator",
            ResourceField::Color => "color",
            ResourceField::ResourceGroups => "resource groups",
            ResourceField::AutoAssign => "auto assign permissions",
            ResourceField::ApprovalRequired => "approval required",
            ResourceField::Capacity => "capacity",
        }
    }

    /// Field key as it appears in JSON payloads and import issues
    pub fn key(self) -> &'static str {
        match self {
            ResourceField::Name => "name",
            ResourceField::Status => "status",
            ResourceField::Schedule => "schedule",
            ResourceField::ResourceType => "resourceType",
            ResourceField::SortOrder => "sortOrder",
            ResourceField::Location => "location",
            ResourceField::Contact => "contact",
            ResourceField::Description => "description",
            ResourceField::Notes => "notes",
            ResourceField::ResourceAdministrator => "resourceAdministrator",
            ResourceField::Color => "color",
            ResourceField::ResourceGroups => "resourceGroups",
            ResourceField::AutoAssign => "autoAssign",
            ResourceField::ApprovalRequired => "approvalRequired",
            ResourceField::Capacity => "capacity",
        }
    }

    /// Values of these fields are stored lower-cased
    pub fn is_lowercased(self) -> bool {
        matches!(
            self,
            ResourceField::Status
                | ResourceField::Schedule
                | ResourceField::ResourceType
                | ResourceField::ResourceAdministrator
                | ResourceField::AutoAssign
                | ResourceField::ApprovalRequired
        )
    }
}

/// Column positions resolved from a header row.
///
/// Every known field and every configured attribute label has an entry;
/// `None` marks a column that is not present in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderIndex {
    fields: BTreeMap<ResourceField, Option<usize>>,
    attributes: Vec<(String, Option<usize>)>,
}

impl HeaderIndex {
    pub fn position(&self, field: ResourceField) -> Option<usize> {
        self.fields.get(&field).copied().flatten()
    }

    /// Attribute labels in configuration order with their column positions
    pub fn attributes(&self) -> impl Iterator<Item = (&str, Option<usize>)> {
        self.attributes.iter().map(|(label, position)| (label.as_str(), *position))
    }
}

/// Build the header index for an import file.
///
/// Fails with [`ImportError::MissingNameHeader`] when no column is named
/// `name`; without it no row could ever be valid.
pub fn resolve_headers(
    cells: &[String],
    attributes: &[CustomAttribute],
) -> Result<HeaderIndex, ImportError> {
    let normalized: Vec<String> = cells.iter().map(|c| normalize_header(c)).collect();

    if index_of(&normalized, ResourceField::Name.header_label()).is_none() {
        return Err(ImportError::MissingNameHeader {
            headers: cells.to_vec(),
        });
    }

    let fields = ResourceField::ALL
        .iter()
        .map(|field| (*field, index_of(&normalized, field.header_label())))
        .collect();

    let attributes = attributes
        .iter()
        .map(|attribute| {
            (
                attribute.label.clone(),
                index_of(&normalized, &attribute.label),
            )
        })
        .collect();

    Ok(HeaderIndex { fields, attributes })
}

/// Comparison form of a column name. Labels go through the same function, so
/// quotes and apostrophes compare literally on both sides.
fn normalize_header(s: &str) -> String {
    s.trim().to_lowercase()
}

fn index_of(normalized: &[String], label: &str) -> Option<usize> {
    let wanted = normalize_header(label);
    normalized.iter().position(|cell| *cell == wanted)
}
