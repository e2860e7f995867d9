use std::fmt;

/// A single person as listed by one of the roster exports.
///
/// Records are built once by a reader and only compared afterwards. Equality
/// between two members is decided by [`are_equivalent`](crate::matching::are_equivalent),
/// not by comparing fields, so the type does not implement `PartialEq`.
#[derive(Debug, Clone)]
pub struct Member {
    /// Display name, possibly empty or multi-word.
    pub name: String,
    /// Email address; never empty for records produced by the readers.
    pub email: String,
    /// Committee tag, only carried by organizing platform records.
    pub committee: Option<String>,
    /// Whether the record counts as a current membership in its source.
    pub active: bool,
}

impl Member {
    /// Creates an inactive member without a committee.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            committee: None,
            active: false,
        }
    }

    /// Assigns the committee tag. Blank values are stored as `None`.
    pub fn with_committee(mut self, committee: Option<String>) -> Self {
        self.committee = committee.filter(|value| !value.trim().is_empty());
        self
    }

    /// Marks whether the record is an active membership.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Returns the committee tag when present and non-blank.
    pub fn committee(&self) -> Option<&str> {
        self.committee
            .as_deref()
            .filter(|value| !value.trim().is_empty())
    }

    /// Returns the part of the address before the `@`, or the whole address
    /// when there is none.
    pub fn local_part(&self) -> &str {
        self.email
            .split_once('@')
            .map(|(local, _)| local)
            .unwrap_or(&self.email)
    }

    /// Returns the part of the address after the first `@`, if any. Splits
    /// at the same place as [`Member::local_part`].
    pub fn domain(&self) -> Option<&str> {
        self.email.split_once('@').map(|(_, domain)| domain)
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}
