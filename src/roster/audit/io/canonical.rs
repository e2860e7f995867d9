use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info, instrument};

use crate::roster::audit::error::{AuditError, Result};
use crate::roster::audit::io::{field, line_of, open_export};
use crate::roster::audit::model::Member;

const SOURCE: &str = "organizing platform";
const HEADER_MARKER: &str = "first_name";

/// A validated row from the organizing platform export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalRow {
    /// `first_name,last_name,email`
    Contact {
        first_name: String,
        last_name: String,
        email: String,
    },
    /// `first_name,last_name,email,committee,...`
    CommitteeContact {
        first_name: String,
        last_name: String,
        email: String,
        committee: String,
    },
}

impl CanonicalRow {
    /// Validates a raw record. Returns `Ok(None)` for the header row.
    pub fn parse(record: &StringRecord) -> Result<Option<Self>> {
        if field(record, 0) == HEADER_MARKER {
            return Ok(None);
        }

        let first_name = field(record, 0).to_string();
        let last_name = field(record, 1).to_string();
        let email = field(record, 2).to_string();

        let row = match record.len() {
            3 => CanonicalRow::Contact {
                first_name,
                last_name,
                email,
            },
            len if len >= 4 => CanonicalRow::CommitteeContact {
                first_name,
                last_name,
                email,
                committee: field(record, 3).to_string(),
            },
            len => {
                return Err(AuditError::MalformedRow {
                    source_kind: SOURCE,
                    line: line_of(record),
                    reason: format!("expected at least 3 columns, found {len}"),
                });
            }
        };

        if row.email().is_empty() {
            return Err(AuditError::MalformedRow {
                source_kind: SOURCE,
                line: line_of(record),
                reason: "empty email address".into(),
            });
        }

        Ok(Some(row))
    }

    pub fn email(&self) -> &str {
        match self {
            CanonicalRow::Contact { email, .. } | CanonicalRow::CommitteeContact { email, .. } => {
                email
            }
        }
    }

    /// First and last name joined by a space.
    pub fn display_name(&self) -> String {
        let (first_name, last_name) = match self {
            CanonicalRow::Contact {
                first_name,
                last_name,
                ..
            }
            | CanonicalRow::CommitteeContact {
                first_name,
                last_name,
                ..
            } => (first_name, last_name),
        };
        format!("{first_name} {last_name}")
    }
}

impl From<CanonicalRow> for Member {
    fn from(row: CanonicalRow) -> Self {
        let name = row.display_name();
        match row {
            CanonicalRow::Contact { email, .. } => Member::new(name, email),
            CanonicalRow::CommitteeContact {
                email, committee, ..
            } => Member::new(name, email).with_committee(Some(committee)),
        }
    }
}

/// Reads every member from an organizing platform export.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn read_members(path: &Path) -> Result<Vec<Member>> {
    let mut reader = open_export(path)?;
    let mut members = Vec::new();

    for record in reader.records() {
        let record = record?;
        match CanonicalRow::parse(&record)? {
            Some(row) => members.push(Member::from(row)),
            None => debug!(line = line_of(&record), "skipping header row"),
        }
    }

    info!(member_count = members.len(), "read organizing platform export");
    Ok(members)
}
