use tracing::{info, instrument, warn};

use crate::roster::audit::config::{AuditConfig, IgnoreReason, Labels};
use crate::roster::audit::error::Result;
use crate::roster::audit::matching::DiagnosticsSink;
use crate::roster::audit::model::Member;
use crate::roster::audit::ops::{contains, difference};
use crate::roster::audit::report::{CommitteeGroups, format_report, group_by_committee};

/// Mailing-list members that have no counterpart in the organizing platform.
#[derive(Debug)]
pub struct GroupAudit<'a> {
    /// Missing members in mailing-list order.
    pub missing: Vec<&'a Member>,
    /// Addresses left out of the comparison and why.
    pub ignored: Vec<(&'a Member, IgnoreReason)>,
    /// Number of mailing-list records read.
    pub total: usize,
}

impl<'a> GroupAudit<'a> {
    pub fn groups(&self) -> CommitteeGroups<'a> {
        group_by_committee(self.missing.iter().copied())
    }

    /// Renders the grouped report. Text output ends with a summary line.
    pub fn render(
        &self,
        committee_filter: Option<&str>,
        as_csv: bool,
        labels: &Labels,
    ) -> Result<String> {
        let report = format_report(&self.groups(), committee_filter, as_csv)?;
        if as_csv {
            return Ok(report);
        }
        let summary = format!(
            "{} out of {} {} members are missing from {}",
            self.missing.len(),
            self.total,
            labels.group,
            labels.canonical
        );
        Ok(join_nonempty(&[report, summary]))
    }
}

/// Active chat members that have no counterpart in the organizing platform.
#[derive(Debug)]
pub struct ChatAudit<'a> {
    /// Missing active members in chat-export order.
    pub missing: Vec<&'a Member>,
    pub active_total: usize,
    pub inactive_total: usize,
}

impl ChatAudit<'_> {
    /// One line per missing member followed by the summary line.
    pub fn render(&self, labels: &Labels) -> String {
        let mut lines: Vec<String> = self
            .missing
            .iter()
            .map(|member| format!("{member} not found in {}", labels.canonical))
            .collect();
        lines.push(format!(
            "{} out of {} active {} members are missing from {}",
            self.missing.len(),
            self.active_total,
            labels.chat,
            labels.canonical
        ));
        lines.join("\n")
    }
}

/// Finds mailing-list members absent from the organizing platform, skipping
/// the organisation's own addresses and known aliases.
#[instrument(
    level = "info",
    skip_all,
    fields(canonical = canonical.len(), group = group.len())
)]
pub fn audit_group<'a>(
    canonical: &[Member],
    group: &'a [Member],
    config: &AuditConfig,
    sink: &mut dyn DiagnosticsSink,
) -> Result<GroupAudit<'a>> {
    let mut missing = Vec::new();
    let mut ignored = Vec::new();

    for member in group {
        if let Some(reason) = config.ignore_reason(member) {
            warn!(email = %member.email, ?reason, "ignoring likely group membership email");
            ignored.push((member, reason));
            continue;
        }
        if !contains(member, canonical, sink)? {
            missing.push(member);
        }
    }

    info!(
        missing = missing.len(),
        ignored = ignored.len(),
        "group audit complete"
    );
    Ok(GroupAudit {
        missing,
        ignored,
        total: group.len(),
    })
}

/// Finds active chat members absent from the organizing platform. Inactive
/// records are counted but never compared.
#[instrument(
    level = "info",
    skip_all,
    fields(canonical = canonical.len(), chat = chat.len())
)]
pub fn audit_chat<'a>(
    canonical: &[Member],
    chat: &'a [Member],
    sink: &mut dyn DiagnosticsSink,
) -> Result<ChatAudit<'a>> {
    let mut missing = Vec::new();
    let mut active_total = 0;
    let mut inactive_total = 0;

    for member in chat {
        if !member.active {
            inactive_total += 1;
            continue;
        }
        active_total += 1;
        if !contains(member, canonical, sink)? {
            missing.push(member);
        }
    }

    info!(active_total, inactive_total, "chat audit complete");
    Ok(ChatAudit {
        missing,
        active_total,
        inactive_total,
    })
}

/// Organizing platform members absent from a mailing-list export.
#[instrument(
    level = "info",
    skip_all,
    fields(canonical = canonical.len(), group = group.len())
)]
pub fn missing_from_group<'a>(
    canonical: &'a [Member],
    group: &[Member],
    sink: &mut dyn DiagnosticsSink,
) -> Result<Vec<&'a Member>> {
    let missing = difference(canonical, group, sink)?;
    info!(missing = missing.len(), "computed members missing from group");
    Ok(missing)
}

/// Organizing platform members without an active chat account.
#[instrument(
    level = "info",
    skip_all,
    fields(canonical = canonical.len(), chat = chat.len())
)]
pub fn missing_from_chat<'a>(
    canonical: &'a [Member],
    chat: &[Member],
    sink: &mut dyn DiagnosticsSink,
) -> Result<Vec<&'a Member>> {
    let active: Vec<Member> = chat.iter().filter(|member| member.active).cloned().collect();
    let missing = difference(canonical, &active, sink)?;
    info!(missing = missing.len(), "computed members missing from chat");
    Ok(missing)
}

/// Admins that do not appear in the members export.
#[instrument(
    level = "info",
    skip_all,
    fields(admins = admins.len(), members = members.len())
)]
pub fn audit_admins<'a>(
    admins: &'a [Member],
    members: &[Member],
    sink: &mut dyn DiagnosticsSink,
) -> Result<Vec<&'a Member>> {
    difference(admins, members, sink)
}

/// Renders members missing from a comparison roster through the committee
/// report.
pub fn render_missing(
    missing: &[&Member],
    committee_filter: Option<&str>,
    as_csv: bool,
) -> Result<String> {
    let groups = group_by_committee(missing.iter().copied());
    format_report(&groups, committee_filter, as_csv)
}

fn join_nonempty(parts: &[String]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}
