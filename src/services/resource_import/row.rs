//! Row mapping and validation

use crate::types::{AttributeValue, ImportedRow, DEFAULT_SORT_ORDER};

use super::headers::{HeaderIndex, ResourceField};
use super::observer::{ImportEvent, ImportObserver};

// =============================================================================
// MAPPING
// =============================================================================

/// Build an [`ImportedRow`] from one data row.
///
/// Missing columns and short rows fall back to defaults. Present values are
/// trimmed and HTML-escaped so they are safe to render later.
pub fn map_row(values: &[String], headers: &HeaderIndex) -> ImportedRow {
    let text = |field: ResourceField| -> String {
        match cell(values, headers.position(field)) {
            Some(value) if field.is_lowercased() => value.to_lowercase(),
            Some(value) => value,
            None => String::new(),
        }
    };

    let resource_groups = headers
        .position(ResourceField::ResourceGroups)
        .and_then(|i| values.get(i))
        .map(|raw| split_groups(raw))
        .unwrap_or_default();

    let attributes = headers
        .attributes()
        .map(|(label, position)| AttributeValue {
            label: label.to_string(),
            value: cell(values, position).unwrap_or_default(),
        })
        .collect();

    ImportedRow {
        name: text(ResourceField::Name),
        status: text(ResourceField::Status),
        schedule: text(ResourceField::Schedule),
        resource_type: text(ResourceField::ResourceType),
        sort_order: cell(values, headers.position(ResourceField::SortOrder))
            .unwrap_or_else(|| DEFAULT_SORT_ORDER.to_string()),
        location: text(ResourceField::Location),
        contact: text(ResourceField::Contact),
        description: text(ResourceField::Description),
        notes: text(ResourceField::Notes),
        resource_administrator: text(ResourceField::ResourceAdministrator),
        color: text(ResourceField::Color),
        resource_groups,
        auto_assign: text(ResourceField::AutoAssign),
        approval_required: text(ResourceField::ApprovalRequired),
        capacity: text(ResourceField::Capacity),
        attributes,
    }
}

fn cell(values: &[String], position: Option<usize>) -> Option<String> {
    position
        .and_then(|i| values.get(i))
        .map(|value| escape_html(value.trim()))
}

/// Comma-separated group list, trimmed.
///
/// Blank entries are dropped: `A,,B` gives `["A", "B"]`, never an empty
/// group name, and an empty cell gives no groups.
fn split_groups(raw: &str) -> Vec<String> {
    escape_html(raw)
        .split(',')
        .map(str::trim)
        .filter(|group| !group.is_empty())
        .map(String::from)
        .collect()
}

/// Replace `<`, `>`, `&`, `'` and `"` with entities
pub fn escape_html(raw: &str) -> String {
    quick_xml::escape::escape(raw).into_owned()
}

// =============================================================================
// VALIDATION
// =============================================================================

/// A row is importable only with a name
pub fn validate_row(row: &ImportedRow, line: usize, observer: &dyn ImportObserver) -> bool {
    if row.name.is_empty() {
        observer.record(ImportEvent::InvalidRow {
            line,
            field: ResourceField::Name,
            reason: "missing name".to_string(),
        });
        return false;
    }
    true
}

/// Report flags and numbers on an accepted row that do not parse.
///
/// The row is kept as is; empty cells are not reported.
pub fn check_typed_values(row: &ImportedRow, line: usize, observer: &dyn ImportObserver) {
    let checks = [
        (ResourceField::AutoAssign, &row.auto_assign, row.auto_assign_flag().is_some()),
        (ResourceField::ApprovalRequired, &row.approval_required, row.approval_required_flag().is_some()),
        (ResourceField::SortOrder, &row.sort_order, row.sort_order_value().is_some()),
        (ResourceField::Capacity, &row.capacity, row.capacity_value().is_some()),
    ];

    for (field, value, parsed) in checks {
        if !parsed && !value.trim().is_empty() {
            observer.record(ImportEvent::UnrecognizedValue {
                line,
                field,
                value: value.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::resource_import::headers::resolve_headers;
    use crate::services::resource_import::observer::RecordingObserver;
    use crate::types::CustomAttribute;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn index(headers: &[&str]) -> HeaderIndex {
        resolve_headers(&strings(headers), &[]).unwrap()
    }

    #[test]
    fn test_map_row_trims_and_escapes() {
        let headers = index(&["name", "description"]);
        let row = map_row(&strings(&["  Room <A> ", "Tom & \"Jerry\""]), &headers);
        assert_eq!(row.name, "Room &lt;A&gt;");
        assert_eq!(row.description, "Tom &amp; &quot;Jerry&quot;");
    }

    #[test]
    fn test_map_row_lowercases_selected_fields() {
        let headers = index(&[
            "name", "status", "schedule", "resource type", "resource administrator",
            "auto assign permissions", "approval required", "location",
        ]);
        let row = map_row(
            &strings(&["Room A", "Active", "Main Schedule", "Room", "Admins", "TRUE", "No", "Second Floor"]),
            &headers,
        );
        assert_eq!(row.name, "Room A");
        assert_eq!(row.status, "active");
        assert_eq!(row.schedule, "main schedule");
        assert_eq!(row.resource_type, "room");
        assert_eq!(row.resource_administrator, "admins");
        assert_eq!(row.auto_assign, "true");
        assert_eq!(row.approval_required, "no");
        assert_eq!(row.location, "Second Floor");
        assert_eq!(row.auto_assign_flag(), Some(true));
        assert_eq!(row.approval_required_flag(), Some(false));
    }

    #[test]
    fn test_map_row_defaults_for_missing_columns() {
        let headers = index(&["name"]);
        let row = map_row(&strings(&["Lobby"]), &headers);
        assert_eq!(row.name, "Lobby");
        assert_eq!(row.status, "");
        assert_eq!(row.sort_order, "0");
        assert!(row.resource_groups.is_empty());
        assert!(row.attributes.is_empty());
    }

    #[test]
    fn test_map_row_empty_values_keep_defaults() {
        let headers = index(&["name", "sort order", "resource groups"]);
        let row = map_row(&[], &headers);
        assert_eq!(row.name, "");
        assert_eq!(row.sort_order, "0");
        assert!(row.resource_groups.is_empty());
    }

    #[test]
    fn test_map_row_short_row_uses_defaults() {
        let headers = index(&["name", "color", "sort order", "resource groups"]);
        let row = map_row(&strings(&["Desk 7"]), &headers);
        assert_eq!(row.color, "");
        assert_eq!(row.sort_order, "0");
        assert!(row.resource_groups.is_empty());
    }

    #[test]
    fn test_map_row_sort_order_from_file() {
        let headers = index(&["sort order", "name"]);
        let row = map_row(&strings(&[" 5 ", "Desk"]), &headers);
        assert_eq!(row.sort_order, "5");
        assert_eq!(row.sort_order_value(), Some(5));
    }

    #[test]
    fn test_map_row_is_order_independent() {
        let first = map_row(
            &strings(&["Room A", "active", "Lab"]),
            &index(&["name", "status", "location"]),
        );
        let second = map_row(
            &strings(&["Lab", "Room A", "active"]),
            &index(&["location", "name", "status"]),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_map_row_splits_resource_groups() {
        let headers = index(&["name", "resource groups"]);
        let row = map_row(&strings(&["Desk 1", "A, B ,C,"]), &headers);
        assert_eq!(row.resource_groups, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_map_row_drops_blank_groups() {
        let headers = index(&["name", "resource groups"]);
        let row = map_row(&strings(&["Desk 1", "A,, ,B"]), &headers);
        assert_eq!(row.resource_groups, vec!["A", "B"]);

        let row = map_row(&strings(&["Desk 2", "  "]), &headers);
        assert!(row.resource_groups.is_empty());
    }

    #[test]
    fn test_map_row_escapes_resource_groups() {
        let headers = index(&["name", "resource groups"]);
        let row = map_row(&strings(&["Desk 1", "R&D, <Ops>"]), &headers);
        assert_eq!(row.resource_groups, vec!["R&amp;D", "&lt;Ops&gt;"]);
    }

    #[test]
    fn test_map_row_custom_attributes() {
        let attributes = vec![CustomAttribute::new("Max Occupancy"), CustomAttribute::new("Floor")];
        let headers = resolve_headers(&strings(&["name", "Max Occupancy"]), &attributes).unwrap();
        let row = map_row(&strings(&["Hall", " 10 "]), &headers);
        assert_eq!(row.attribute("Max Occupancy"), Some("10"));
        assert_eq!(row.attribute("Floor"), Some(""));
    }

    #[test]
    fn test_map_row_attributes_keep_configuration_order() {
        let attributes = vec![
            CustomAttribute::new("Zone"),
            CustomAttribute::new("Building"),
            CustomAttribute::new("Max Occupancy"),
        ];
        let headers = resolve_headers(&strings(&["Max Occupancy", "Building", "name", "Zone"]), &attributes).unwrap();
        let row = map_row(&strings(&["10", "North", "Hall", "B2"]), &headers);

        let labels: Vec<&str> = row.attributes.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["Zone", "Building", "Max Occupancy"]);
        assert_eq!(row.attribute("Zone"), Some("B2"));
    }

    #[test]
    fn test_map_row_attribute_value_with_apostrophe() {
        let attributes = vec![CustomAttribute::new("Owner's Note")];
        let headers = resolve_headers(&strings(&["name", "Owner's Note"]), &attributes).unwrap();
        let row = map_row(&strings(&["Hall", "O'Brien's Room"]), &headers);
        assert_eq!(row.attribute("Owner's Note"), Some("O&apos;Brien&apos;s Room"));
    }

    #[test]
    fn test_validate_row_requires_name() {
        let observer = RecordingObserver::default();
        let row = ImportedRow::default();
        assert!(!validate_row(&row, 4, &observer));

        let events = observer.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ImportEvent::InvalidRow { line: 4, field: ResourceField::Name, .. }));
    }

    #[test]
    fn test_validate_row_accepts_named_row() {
        let observer = RecordingObserver::default();
        let row = ImportedRow {
            name: "Room A".to_string(),
            ..Default::default()
        };
        assert!(validate_row(&row, 1, &observer));
        assert!(observer.events().is_empty());
    }

    #[test]
    fn test_check_typed_values_reports_unparsed_fields() {
        let observer = RecordingObserver::default();
        let row = ImportedRow {
            name: "Hall".to_string(),
            auto_assign: "sometimes".to_string(),
            approval_required: "no".to_string(),
            sort_order: "first".to_string(),
            capacity: "".to_string(),
            ..Default::default()
        };
        check_typed_values(&row, 3, &observer);

        let fields: Vec<ResourceField> = observer
            .events()
            .into_iter()
            .filter_map(|e| match e {
                ImportEvent::UnrecognizedValue { line: 3, field, .. } => Some(field),
                _ => None,
            })
            .collect();
        assert_eq!(fields, vec![ResourceField::AutoAssign, ResourceField::SortOrder]);
    }

    #[test]
    fn test_check_typed_values_quiet_for_clean_row() {
        let observer = RecordingObserver::default();
        let row = ImportedRow {
            name: "Hall".to_string(),
            auto_assign: "yes".to_string(),
            capacity: "12".to_string(),
            ..Default::default()
        };
        check_typed_values(&row, 1, &observer);
        assert!(observer.events().is_empty());
    }

    #[test]
    fn test_whitespace_name_is_invalid() {
        let observer = RecordingObserver::default();
        let row = map_row(&strings(&["   "]), &index(&["name"]));
        assert!(!validate_row(&row, 1, &observer));
    }
}
