//! Raw file content to logical CSV rows

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One logical row of the file and the line it starts on (0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalRow<'a> {
    pub line: usize,
    pub bytes: &'a [u8],
}

/// Drop a leading UTF-8 byte order mark. Spreadsheet exports often add one
/// and it would otherwise end up in the first header cell.
pub fn strip_bom(content: &[u8]) -> &[u8] {
    content.strip_prefix(UTF8_BOM).unwrap_or(content)
}

/// Split content into rows on `\n`, `\r\n` or a lone `\r`.
///
/// Terminators inside a quoted field belong to the field, so a row can span
/// several physical lines. `line` always counts physical lines. Blank lines
/// are kept as empty rows; only a final terminator adds no row.
///
/// A quote still open at the end of the content does not swallow the rest of
/// the file: from the row it opened in, rows are split on plain terminators.
pub fn split_rows(content: &[u8]) -> Vec<LogicalRow<'_>> {
    let mut rows = Vec::new();
    let mut start = 0;
    let mut line = 0;
    let mut row_line = 0;
    let mut in_quotes = false;
    let mut field_start = true;
    let mut i = 0;

    while i < content.len() {
        let b = content[i];

        if in_quotes {
            match b {
                b'"' if content.get(i + 1) == Some(&b'"') => i += 1,
                b'"' => in_quotes = false,
                b'\n' => line += 1,
                b'\r' if content.get(i + 1) != Some(&b'\n') => line += 1,
                _ => {}
            }
            i += 1;
            continue;
        }

        match b {
            b'"' if field_start => {
                in_quotes = true;
                field_start = false;
            }
            b',' => field_start = true,
            b'\r' | b'\n' => {
                rows.push(LogicalRow {
                    line: row_line,
                    bytes: &content[start..i],
                });
                if b == b'\r' && content.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                line += 1;
                row_line = line;
                start = i + 1;
                field_start = true;
            }
            _ => field_start = false,
        }
        i += 1;
    }

    if in_quotes {
        split_physical_lines(&content[start..], row_line, &mut rows);
    } else if start < content.len() {
        rows.push(LogicalRow {
            line: row_line,
            bytes: &content[start..],
        });
    }

    rows
}

fn split_physical_lines<'a>(content: &'a [u8], first_line: usize, rows: &mut Vec<LogicalRow<'a>>) {
    let mut start = 0;
    let mut line = first_line;
    let mut i = 0;

    while i < content.len() {
        let b = content[i];
        if b == b'\r' || b == b'\n' {
            rows.push(LogicalRow {
                line,
                bytes: &content[start..i],
            });
            if b == b'\r' && content.get(i + 1) == Some(&b'\n') {
                i += 1;
            }
            line += 1;
            start = i + 1;
        }
        i += 1;
    }

    if start < content.len() {
        rows.push(LogicalRow {
            line,
            bytes: &content[start..],
        });
    }
}

/// Parse one logical row into its cell values. An empty row has no cells.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn parse_row(bytes: &[u8]) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    // Byte records read from a slice with flexible lengths cannot fail.
    let mut record = csv::ByteRecord::new();
    match reader.read_byte_record(&mut record) {
        Ok(true) => record
            .iter()
            .map(|field| String::from_utf8_lossy(field).into_owned())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(rows: &[LogicalRow<'a>]) -> Vec<(usize, &'a str)> {
        rows.iter()
            .map(|r| (r.line, std::str::from_utf8(r.bytes).unwrap()))
            .collect()
    }

    #[test]
    fn test_strip_bom_removes_leading_mark_only() {
        assert_eq!(strip_bom(b"\xEF\xBB\xBFname"), b"name");
        assert_eq!(strip_bom(b"name"), b"name");
        assert_eq!(strip_bom(b"a\xEF\xBB\xBF"), b"a\xEF\xBB\xBF");
    }

    #[test]
    fn test_split_rows_handles_all_terminators() {
        let rows = split_rows(b"a\nb\r\nc\rd");
        assert_eq!(texts(&rows), vec![(0, "a"), (1, "b"), (2, "c"), (3, "d")]);
    }

    #[test]
    fn test_split_rows_trailing_newline_adds_no_row() {
        let rows = split_rows(b"a\nb\n");
        assert_eq!(texts(&rows), vec![(0, "a"), (1, "b")]);
    }

    #[test]
    fn test_split_rows_keeps_blank_lines() {
        let rows = split_rows(b"a\n\nb");
        assert_eq!(texts(&rows), vec![(0, "a"), (1, ""), (2, "b")]);
    }

    #[test]
    fn test_split_rows_unterminated_quote_falls_back_to_lines() {
        let rows = split_rows(b"name,status\n\"Room A,active\nRoom B,active\r\n,inactive\rRoom C,x\n");
        assert_eq!(
            texts(&rows),
            vec![
                (0, "name,status"),
                (1, "\"Room A,active"),
                (2, "Room B,active"),
                (3, ",inactive"),
                (4, "Room C,x"),
            ]
        );
    }

    #[test]
    fn test_split_rows_closed_quote_before_open_one() {
        let rows = split_rows(b"\"a\nb\",1\n\"c\nd");
        assert_eq!(texts(&rows), vec![(0, "\"a\nb\",1"), (2, "\"c"), (3, "d")]);
    }

    #[test]
    fn test_split_rows_quoted_newline_stays_in_row() {
        let rows = split_rows(b"name,notes\nRoom,\"line one\r\nline two\"\nHall,x");
        assert_eq!(
            texts(&rows),
            vec![
                (0, "name,notes"),
                (1, "Room,\"line one\r\nline two\""),
                (3, "Hall,x"),
            ]
        );
    }

    #[test]
    fn test_split_rows_escaped_quotes() {
        let rows = split_rows(b"\"say \"\"hi\"\"\",b\nc");
        assert_eq!(texts(&rows), vec![(0, "\"say \"\"hi\"\"\",b"), (1, "c")]);
    }

    #[test]
    fn test_split_rows_mid_field_quote_is_literal() {
        let rows = split_rows(b"Desk \"1,a\nb");
        assert_eq!(texts(&rows), vec![(0, "Desk \"1,a"), (1, "b")]);
    }

    #[test]
    fn test_split_rows_empty_content() {
        assert!(split_rows(b"").is_empty());
    }

    #[test]
    fn test_parse_row_respects_quotes() {
        let values = parse_row(b"Desk 1,\"A, B, C\"");
        assert_eq!(values, vec!["Desk 1", "A, B, C"]);
    }

    #[test]
    fn test_parse_row_keeps_empty_cells() {
        let values = parse_row(b",inactive");
        assert_eq!(values, vec!["", "inactive"]);
    }

    #[test]
    fn test_parse_row_empty_row_has_no_cells() {
        assert!(parse_row(b"").is_empty());
    }

    #[test]
    fn test_parse_row_replaces_invalid_utf8() {
        let values = parse_row(b"Caf\xE9,x");
        assert_eq!(values.len(), 2);
        assert!(values[0].starts_with("Caf"));
    }
}
