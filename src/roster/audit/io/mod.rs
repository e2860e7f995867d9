pub mod canonical;
pub mod chat;
pub mod mailing_list;

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::roster::audit::error::{AuditError, Result};

/// Opens a roster export for reading.
///
/// Exports have no reliable header row, vary in width from row to row, and
/// may carry `#` comment lines, so the reader is configured for all three.
pub(crate) fn open_export(path: &Path) -> Result<csv::Reader<File>> {
    if !path.exists() {
        return Err(AuditError::FileNotFound(path.to_path_buf()));
    }
    Ok(ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .from_path(path)?)
}

/// One-based line number of a record, for error messages.
pub(crate) fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|position| position.line()).unwrap_or(0)
}

pub(crate) fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or_default()
}
