use std::path::Path;

use tracing::{debug, info, instrument};

use crate::roster::audit::config::AuditConfig;
use crate::roster::audit::error::{AuditError, Result};
use crate::roster::audit::io::{field, line_of, open_export};
use crate::roster::audit::model::Member;

const SOURCE: &str = "chat";
const HEADER_MARKER: &str = "username";
const EMAIL_COLUMN: usize = 1;
const ROLE_COLUMN: usize = 2;
const NAME_COLUMN: usize = 7;

/// Reads every member from a chat workspace export.
///
/// A record is active when its role column holds one of the configured
/// active roles.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn read_members(path: &Path, config: &AuditConfig) -> Result<Vec<Member>> {
    let mut reader = open_export(path)?;
    let mut members = Vec::new();

    for record in reader.records() {
        let record = record?;
        if field(&record, 0) == HEADER_MARKER {
            debug!(line = line_of(&record), "skipping header row");
            continue;
        }
        if record.len() <= NAME_COLUMN {
            return Err(AuditError::MalformedRow {
                source_kind: SOURCE,
                line: line_of(&record),
                reason: format!(
                    "expected at least {} columns, found {}",
                    NAME_COLUMN + 1,
                    record.len()
                ),
            });
        }

        let email = field(&record, EMAIL_COLUMN);
        if email.is_empty() {
            return Err(AuditError::MalformedRow {
                source_kind: SOURCE,
                line: line_of(&record),
                reason: "empty email address".into(),
            });
        }

        let active = config.is_active_role(field(&record, ROLE_COLUMN));
        members.push(Member::new(field(&record, NAME_COLUMN), email).with_active(active));
    }

    info!(member_count = members.len(), "read chat export");
    Ok(members)
}
