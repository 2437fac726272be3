//! Import diagnostics
//!
//! The importer reports what it does through an [`ImportObserver`] instead of
//! logging directly:
//! - `TracingObserver` forwards events to `tracing`
//! - `IssueCollector` additionally turns them into `ImportIssue`s for the caller

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::types::{ImportIssue, ImportIssueLevel};

use super::headers::ResourceField;
use super::ImportError;

/// Something noteworthy that happened during an import
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportEvent {
    /// The file could not be imported at all
    Aborted { reason: ImportError },
    /// A mapped row failed validation
    InvalidRow {
        line: usize,
        field: ResourceField,
        reason: String,
    },
    /// A row was left out of the result
    SkippedRow { line: usize, values: Vec<String> },
    /// An accepted row holds a flag or number that does not parse
    UnrecognizedValue {
        line: usize,
        field: ResourceField,
        value: String,
    },
    Finished { imported: usize, skipped: usize },
}

impl ImportEvent {
    /// Operator-facing issue for this event, if it is worth reporting
    pub fn to_issue(&self) -> Option<ImportIssue> {
        match self {
            ImportEvent::Aborted { reason } => Some(ImportIssue {
                row_number: 0,
                level: match reason {
                    ImportError::EmptyInput => ImportIssueLevel::Warning,
                    _ => ImportIssueLevel::Error,
                },
                field: match reason {
                    ImportError::MissingNameHeader { .. } => ResourceField::Name.key().to_string(),
                    _ => String::new(),
                },
                message: reason.to_string(),
                original_value: None,
            }),
            ImportEvent::SkippedRow { line, values } => Some(ImportIssue {
                row_number: *line,
                level: ImportIssueLevel::Error,
                field: ResourceField::Name.key().to_string(),
                message: "Row skipped: resource name is missing".to_string(),
                original_value: Some(values.join(",")),
            }),
            ImportEvent::UnrecognizedValue { line, field, value } => Some(ImportIssue {
                row_number: *line,
                level: ImportIssueLevel::Warning,
                field: field.key().to_string(),
                message: format!("Unrecognized {} value, stored as text", field.key()),
                original_value: Some(value.clone()),
            }),
            ImportEvent::InvalidRow { .. } | ImportEvent::Finished { .. } => None,
        }
    }
}

/// Receives import diagnostics
pub trait ImportObserver: Send + Sync {
    fn record(&self, event: ImportEvent);
}

/// Logs import events with `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ImportObserver for TracingObserver {
    fn record(&self, event: ImportEvent) {
        match event {
            ImportEvent::Aborted { reason } => {
                debug!("Resource import aborted: {}", reason);
            }
            ImportEvent::InvalidRow { line, field, reason } => {
                debug!("Resource import row {} is not valid: {} ({})", line, reason, field.key());
            }
            ImportEvent::SkippedRow { line, values } => {
                error!("Skipped import of resource row {}. Values {:?}", line, values);
            }
            ImportEvent::UnrecognizedValue { line, field, value } => {
                warn!("Resource row {} has unrecognized {} value '{}'", line, field.key(), value);
            }
            ImportEvent::Finished { imported, skipped } => {
                info!("Resource import finished: {} rows accepted, {} skipped", imported, skipped);
            }
        }
    }
}

/// Logs like [`TracingObserver`] and keeps the operator-facing issues
#[derive(Debug, Default)]
pub struct IssueCollector {
    issues: Mutex<Vec<ImportIssue>>,
}

impl IssueCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_issues(self) -> Vec<ImportIssue> {
        self.issues.into_inner()
    }
}

impl ImportObserver for IssueCollector {
    fn record(&self, event: ImportEvent) {
        if let Some(issue) = event.to_issue() {
            self.issues.lock().push(issue);
        }
        TracingObserver.record(event);
    }
}

/// Keeps every event, for assertions
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ImportEvent>>,
}

#[cfg(test)]
impl RecordingObserver {
    pub fn events(&self) -> Vec<ImportEvent> {
        self.events.lock().clone()
    }
}

#[cfg(test)]
impl ImportObserver for RecordingObserver {
    fn record(&self, event: ImportEvent) {
        self.events.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_row_becomes_error_issue() {
        let event = ImportEvent::SkippedRow {
            line: 3,
            values: vec!["".to_string(), "inactive".to_string()],
        };
        let issue = event.to_issue().unwrap();
        assert_eq!(issue.row_number, 3);
        assert_eq!(issue.level, ImportIssueLevel::Error);
        assert_eq!(issue.field, "name");
        assert_eq!(issue.original_value.as_deref(), Some(",inactive"));
    }

    #[test]
    fn test_empty_input_is_a_warning() {
        let event = ImportEvent::Aborted { reason: ImportError::EmptyInput };
        let issue = event.to_issue().unwrap();
        assert_eq!(issue.level, ImportIssueLevel::Warning);
        assert_eq!(issue.row_number, 0);
    }

    #[test]
    fn test_missing_header_points_at_name() {
        let event = ImportEvent::Aborted {
            reason: ImportError::MissingNameHeader { headers: vec!["status".to_string()] },
        };
        let issue = event.to_issue().unwrap();
        assert_eq!(issue.level, ImportIssueLevel::Error);
        assert_eq!(issue.field, "name");
    }

    #[test]
    fn test_unrecognized_value_is_a_warning() {
        let event = ImportEvent::UnrecognizedValue {
            line: 4,
            field: ResourceField::Capacity,
            value: "lots".to_string(),
        };
        let issue = event.to_issue().unwrap();
        assert_eq!(issue.row_number, 4);
        assert_eq!(issue.level, ImportIssueLevel::Warning);
        assert_eq!(issue.field, "capacity");
        assert_eq!(issue.original_value.as_deref(), Some("lots"));
    }

    #[test]
    fn test_invalid_row_and_finished_are_not_reported() {
        let invalid = ImportEvent::InvalidRow {
            line: 1,
            field: ResourceField::Name,
            reason: "missing name".to_string(),
        };
        assert!(invalid.to_issue().is_none());
        assert!(ImportEvent::Finished { imported: 1, skipped: 0 }.to_issue().is_none());
    }

    #[test]
    fn test_issue_collector_keeps_reportable_events() {
        let collector = IssueCollector::new();
        collector.record(ImportEvent::Finished { imported: 0, skipped: 1 });
        collector.record(ImportEvent::SkippedRow { line: 2, values: vec![] });
        let issues = collector.into_issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].row_number, 2);
    }
}
