use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info, instrument};

use crate::roster::audit::error::{AuditError, Result};
use crate::roster::audit::io::{field, line_of, open_export};
use crate::roster::audit::model::Member;

const SOURCE: &str = "mailing list";

fn is_header(record: &StringRecord) -> bool {
    let first = field(record, 0);
    first == "Email address" || first.starts_with("Members for group")
}

/// Reads every member from a mailing-list export (`email,name,...`).
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn read_members(path: &Path) -> Result<Vec<Member>> {
    let mut reader = open_export(path)?;
    let mut members = Vec::new();

    for record in reader.records() {
        let record = record?;
        if is_header(&record) {
            debug!(line = line_of(&record), "skipping header row");
            continue;
        }
        if record.len() < 2 {
            return Err(AuditError::MalformedRow {
                source_kind: SOURCE,
                line: line_of(&record),
                reason: format!("expected at least 2 columns, found {}", record.len()),
            });
        }

        let email = field(&record, 0);
        if email.is_empty() {
            return Err(AuditError::MalformedRow {
                source_kind: SOURCE,
                line: line_of(&record),
                reason: "empty email address".into(),
            });
        }
        members.push(Member::new(field(&record, 1), email));
    }

    info!(member_count = members.len(), "read mailing list export");
    Ok(members)
}
