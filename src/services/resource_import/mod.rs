//! Resource CSV import
//!
//! Turns an uploaded spreadsheet of rooms/equipment into typed rows:
//! - `lines` strips the BOM and splits the file into logical rows
//! - `headers` resolves column names against known fields and custom attributes
//! - `row` maps each data row and validates it
//! - `observer` carries diagnostics out (tracing, operator issues)
//!
//! Nothing here fails hard. An unusable file produces an empty result and a
//! diagnostic; a bad row (including a blank line) is skipped and its line
//! number reported.

pub mod headers;
pub mod lines;
pub mod observer;
pub mod row;

use thiserror::Error;

use crate::types::{CustomAttribute, ImportResult};

use self::headers::resolve_headers;
use self::lines::{parse_row, split_rows, strip_bom};
use self::observer::{ImportEvent, ImportObserver};
use self::row::{check_typed_values, map_row, validate_row};

/// Reasons an import file yields no rows at all
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("No rows in resource import file")]
    EmptyInput,
    #[error("No name column in resource import headers {headers:?}")]
    MissingNameHeader { headers: Vec<String> },
}

/// Imports resource rows for one set of custom attribute definitions
pub struct ResourceImporter<'a> {
    attributes: &'a [CustomAttribute],
    observer: &'a dyn ImportObserver,
}

impl<'a> ResourceImporter<'a> {
    pub fn new(attributes: &'a [CustomAttribute], observer: &'a dyn ImportObserver) -> Self {
        Self {
            attributes,
            observer,
        }
    }

    /// Import raw file content.
    ///
    /// Line numbers in `skipped_rows` are physical lines counted from the
    /// header row (line 0).
    pub fn import(&self, content: &[u8]) -> ImportResult {
        match self.try_import(content) {
            Ok(result) => result,
            Err(reason) => {
                self.observer.record(ImportEvent::Aborted { reason });
                ImportResult::default()
            }
        }
    }

    fn try_import(&self, content: &[u8]) -> Result<ImportResult, ImportError> {
        let content = strip_bom(content);
        let mut rows = split_rows(content).into_iter();

        let header_row = rows.next().ok_or(ImportError::EmptyInput)?;
        let headers = resolve_headers(&parse_row(header_row.bytes), self.attributes)?;

        let mut result = ImportResult::default();

        for logical in rows {
            let line = logical.line - header_row.line;

            let values = parse_row(logical.bytes);

            let row = map_row(&values, &headers);
            if validate_row(&row, line, self.observer) {
                check_typed_values(&row, line, self.observer);
                result.rows.push(row);
            } else {
                self.observer.record(ImportEvent::SkippedRow { line, values });
                result.skipped_rows.push(line);
            }
        }

        self.observer.record(ImportEvent::Finished {
            imported: result.rows.len(),
            skipped: result.skipped_rows.len(),
        });

        Ok(result)
    }
}
