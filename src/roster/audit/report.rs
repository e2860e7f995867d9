use crate::roster::audit::error::{AuditError, Result};
use crate::roster::audit::model::Member;

/// Bucket used for members without a committee tag.
pub const UNKNOWN_COMMITTEE: &str = "Unknown";

/// Members partitioned by committee.
///
/// Buckets keep the order in which their committee was first seen, and each
/// bucket keeps the relative order of its members.
#[derive(Debug, Default, Clone)]
pub struct CommitteeGroups<'a> {
    buckets: Vec<(String, Vec<&'a Member>)>,
}

impl<'a> CommitteeGroups<'a> {
    /// Members filed under `committee`, if that bucket exists.
    pub fn get(&self, committee: &str) -> Option<&[&'a Member]> {
        self.buckets
            .iter()
            .find(|(name, _)| name == committee)
            .map(|(_, members)| members.as_slice())
    }

    /// Committee names in bucket order.
    pub fn committees(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[&'a Member])> {
        self.buckets
            .iter()
            .map(|(name, members)| (name.as_str(), members.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of members across all buckets.
    pub fn member_count(&self) -> usize {
        self.buckets.iter().map(|(_, members)| members.len()).sum()
    }

    fn push(&mut self, committee: &str, member: &'a Member) {
        match self.buckets.iter_mut().find(|(name, _)| name == committee) {
            Some((_, members)) => members.push(member),
            None => self.buckets.push((committee.to_string(), vec![member])),
        }
    }
}

/// Partitions members by committee, filing untagged members under
/// [`UNKNOWN_COMMITTEE`].
pub fn group_by_committee<'a, I>(members: I) -> CommitteeGroups<'a>
where
    I: IntoIterator<Item = &'a Member>,
{
    let mut groups = CommitteeGroups::default();
    for member in members {
        let committee = member.committee().unwrap_or(UNKNOWN_COMMITTEE);
        groups.push(committee, member);
    }
    groups
}

/// Renders grouped members either as headed text blocks or as one
/// comma-separated list.
///
/// Fails with [`AuditError::UnknownCommittee`] before rendering anything when
/// `committee_filter` names a bucket that does not exist.
pub fn format_report(
    groups: &CommitteeGroups<'_>,
    committee_filter: Option<&str>,
    as_csv: bool,
) -> Result<String> {
    if let Some(filter) = committee_filter {
        if groups.get(filter).is_none() {
            return Err(AuditError::UnknownCommittee(filter.to_string()));
        }
    }

    let selected: Vec<(&str, &[&Member])> = groups
        .iter()
        .filter(|(name, _)| committee_filter.is_none_or(|filter| filter == *name))
        .collect();

    if as_csv {
        let entries: Vec<String> = selected
            .iter()
            .flat_map(|(_, members)| members.iter().map(|member| member.to_string()))
            .collect();
        return Ok(entries.join(","));
    }

    let mut lines = Vec::new();
    for (name, members) in selected {
        lines.push(format!("# Committee - {name}"));
        for member in members {
            lines.push(format!("    {member}"));
        }
    }
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members() -> Vec<Member> {
        vec![
            Member::new("Jane Doe", "jane@x.org").with_committee(Some("Housing".into())),
            Member::new("Bob Ray", "bob@x.org"),
            Member::new("Ann Lee", "ann@x.org").with_committee(Some("Outreach".into())),
            Member::new("Cy Young", "cy@x.org").with_committee(Some("Housing".into())),
            Member::new("Di Prince", "di@x.org").with_committee(Some(String::new())),
        ]
    }

    #[test]
    fn groups_in_first_seen_order() {
        let members = members();
        let groups = group_by_committee(&members);
        let names: Vec<&str> = groups.committees().collect();
        assert_eq!(names, vec!["Housing", UNKNOWN_COMMITTEE, "Outreach"]);

        let housing: Vec<&str> = groups
            .get("Housing")
            .expect("housing bucket")
            .iter()
            .map(|m| m.email.as_str())
            .collect();
        assert_eq!(housing, vec!["jane@x.org", "cy@x.org"]);
        assert_eq!(groups.get(UNKNOWN_COMMITTEE).map(<[_]>::len), Some(2));
        assert_eq!(groups.member_count(), members.len());
    }

    #[test]
    fn text_report_lists_every_bucket() {
        let members = members();
        let groups = group_by_committee(&members);
        let report = format_report(&groups, None, false).expect("report");
        assert_eq!(
            report,
            "# Committee - Housing\n    Jane Doe <jane@x.org>\n    Cy Young <cy@x.org>\n\
             # Committee - Unknown\n    Bob Ray <bob@x.org>\n    Di Prince <di@x.org>\n\
             # Committee - Outreach\n    Ann Lee <ann@x.org>"
        );
    }

    #[test]
    fn text_report_with_filter_renders_one_bucket() {
        let members = members();
        let groups = group_by_committee(&members);
        let report = format_report(&groups, Some("Outreach"), false).expect("report");
        assert_eq!(report, "# Committee - Outreach\n    Ann Lee <ann@x.org>");
    }

    #[test]
    fn csv_report_with_filter() {
        let members = members();
        let groups = group_by_committee(&members);
        let report = format_report(&groups, Some("Housing"), true).expect("report");
        assert_eq!(report, "Jane Doe <jane@x.org>,Cy Young <cy@x.org>");
    }

    #[test]
    fn csv_report_flattens_all_buckets() {
        let members = members();
        let groups = group_by_committee(&members);
        let report = format_report(&groups, None, true).expect("report");
        assert_eq!(
            report,
            "Jane Doe <jane@x.org>,Cy Young <cy@x.org>,Bob Ray <bob@x.org>,\
             Di Prince <di@x.org>,Ann Lee <ann@x.org>"
        );
    }

    #[test]
    fn unknown_filter_fails() {
        let members = members();
        let groups = group_by_committee(&members);
        let error = format_report(&groups, Some("Finance"), true).expect_err("no such bucket");
        assert!(matches!(error, AuditError::UnknownCommittee(name) if name == "Finance"));
    }

    #[test]
    fn empty_groups_render_empty_report() {
        let groups = group_by_committee(std::iter::empty());
        assert!(groups.is_empty());
        assert_eq!(format_report(&groups, None, false).expect("report"), "");
    }
}
