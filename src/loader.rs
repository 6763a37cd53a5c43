use crate::error::{Error, Result};
use crate::types::Row;
use std::mem;
use tracing::debug;

/// Export text split into its header and data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: Row,
    pub rows: Vec<Row>,
}

/// Captured text must contain at least one field or row separator.
pub fn looks_tabular(text: &str) -> bool {
    text.contains([',', ';', '\r', '\n'])
}

/// Parse comma-separated text into rows of cells in a single pass.
///
/// A `"` anywhere outside quoting starts a quoted run; inside it `""` is a
/// literal quote and a lone `"` ends the run. Outside quoting `,` ends a
/// cell, `\n` ends a row and `\r` is dropped. Rows keep whatever number of
/// cells they have. A trailing newline does not produce an extra `[""]` row.
pub fn parse_rows(text: &str) -> Vec<Row> {
    let mut rows: Vec<Row> = Vec::new();
    let mut row: Row = Vec::new();
    let mut cell = String::new();
    let mut quoted = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if quoted {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    cell.push('"');
                    chars.next();
                } else {
                    quoted = false;
                }
            } else {
                cell.push(c);
            }
            continue;
        }
        match c {
            '"' => quoted = true,
            ',' => row.push(mem::take(&mut cell)),
            '\n' => {
                row.push(mem::take(&mut cell));
                rows.push(mem::take(&mut row));
            }
            '\r' => {}
            _ => cell.push(c),
        }
    }
    row.push(cell);
    rows.push(row);

    if matches!(rows.last(), Some(last) if last.len() == 1 && last[0].is_empty()) {
        rows.pop();
    }
    rows
}

/// Check, parse and split captured text into header + data rows.
pub fn load_table(text: &str) -> Result<Table> {
    if !looks_tabular(text) {
        return Err(Error::NotTabular);
    }
    let mut rows = parse_rows(text);
    if rows.is_empty() {
        return Err(Error::EmptyInput);
    }
    let header = rows.remove(0);
    debug!(columns = header.len(), rows = rows.len(), "parsed export");
    Ok(Table { header, rows })
}
