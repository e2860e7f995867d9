use std::fmt;

use tracing::warn;

use crate::roster::audit::error::Result;
use crate::roster::audit::model::Member;
use crate::roster::audit::normalize::normalize_email;

/// Identifies which rule in the chain decided that two members match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Addresses are equal ignoring case.
    ExactEmail,
    /// Display names are equal ignoring case.
    ExactName,
    /// One display name contains the other, ignoring case.
    NameSubstring,
    /// Addresses are equal after [`normalize_email`].
    NormalizedEmail,
}

impl MatchRule {
    /// Fuzzy rules are judgement calls that an operator should review.
    pub fn is_fuzzy(self) -> bool {
        !matches!(self, MatchRule::ExactEmail)
    }

    fn label(self) -> &'static str {
        match self {
            MatchRule::ExactEmail => "matched by email",
            MatchRule::ExactName => "matched by name",
            MatchRule::NameSubstring => "fuzzy matched by name",
            MatchRule::NormalizedEmail => "matched by normalized email",
        }
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fuzzy rule firing between two members.
#[derive(Debug, Clone, Copy)]
pub struct MatchObservation<'a> {
    pub rule: MatchRule,
    pub left: &'a Member,
    pub right: &'a Member,
}

/// Receives the rule firings produced by [`are_equivalent`].
pub trait DiagnosticsSink {
    fn record(&mut self, observation: &MatchObservation<'_>);
}

/// Sink that forwards every observation to `tracing` as a warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record(&mut self, observation: &MatchObservation<'_>) {
        warn!(
            rule = ?observation.rule,
            "{} {} - {} / {}",
            observation.rule,
            observation.left.name,
            observation.left.email,
            observation.right.email
        );
    }
}

/// Owned copy of an observation kept by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedMatch {
    pub rule: MatchRule,
    pub left_email: String,
    pub right_email: String,
}

/// Sink that keeps observations in memory so callers can inspect them.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub matches: Vec<RecordedMatch>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules that fired, in the order they were recorded.
    pub fn rules(&self) -> Vec<MatchRule> {
        self.matches.iter().map(|entry| entry.rule).collect()
    }
}

impl DiagnosticsSink for RecordingSink {
    fn record(&mut self, observation: &MatchObservation<'_>) {
        self.matches.push(RecordedMatch {
            rule: observation.rule,
            left_email: observation.left.email.clone(),
            right_email: observation.right.email.clone(),
        });
    }
}

type RuleTest = fn(&Member, &Member) -> Result<bool>;

/// Evaluation order of the match rules. The first rule that holds decides
/// which observation is recorded.
const RULES: &[(MatchRule, RuleTest)] = &[
    (MatchRule::ExactEmail, exact_email),
    (MatchRule::ExactName, exact_name),
    (MatchRule::NameSubstring, name_substring),
    (MatchRule::NormalizedEmail, normalized_email),
];

/// Decides whether two records denote the same person.
///
/// The relation is reflexive and symmetric but not transitive: it must only
/// be used for pairwise membership tests against a reference list, never to
/// partition a list into classes.
pub fn are_equivalent(
    left: &Member,
    right: &Member,
    sink: &mut dyn DiagnosticsSink,
) -> Result<bool> {
    match matching_rule(left, right)? {
        Some(rule) => {
            if rule.is_fuzzy() {
                sink.record(&MatchObservation { rule, left, right });
            }
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Returns the first rule under which the two members match, without
/// recording anything.
pub fn matching_rule(left: &Member, right: &Member) -> Result<Option<MatchRule>> {
    for (rule, test) in RULES {
        if test(left, right)? {
            return Ok(Some(*rule));
        }
    }
    Ok(None)
}

fn exact_email(left: &Member, right: &Member) -> Result<bool> {
    Ok(left.email.trim().to_lowercase() == right.email.trim().to_lowercase())
}

// Two records with the same display name, blank included, are treated as one
// person. The rule fires as a fuzzy match so an operator can review it.
fn exact_name(left: &Member, right: &Member) -> Result<bool> {
    Ok(folded_name(left) == folded_name(right))
}

fn name_substring(left: &Member, right: &Member) -> Result<bool> {
    let (left, right) = (folded_name(left), folded_name(right));
    if left.is_empty() || right.is_empty() {
        return Ok(false);
    }
    Ok(left.contains(&right) || right.contains(&left))
}

fn normalized_email(left: &Member, right: &Member) -> Result<bool> {
    Ok(normalize_email(&left.email)? == normalize_email(&right.email)?)
}

fn folded_name(member: &Member) -> String {
    member.name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::audit::error::AuditError;

    fn member(name: &str, email: &str) -> Member {
        Member::new(name, email)
    }

    #[test]
    fn exact_email_is_silent() {
        let mut sink = RecordingSink::new();
        let a = member("Jane Doe", "Jane@X.org");
        let b = member("J. Doe", "jane@x.org");
        assert!(are_equivalent(&a, &b, &mut sink).expect("comparison"));
        assert!(sink.matches.is_empty());
    }

    #[test]
    fn reflexive_for_well_formed_member() {
        let mut sink = RecordingSink::new();
        let a = member("Jane Doe", "jane@x.org");
        assert!(are_equivalent(&a, &a, &mut sink).expect("comparison"));
        assert_eq!(matching_rule(&a, &a).expect("rule"), Some(MatchRule::ExactEmail));
    }

    #[test]
    fn name_match_is_recorded() {
        let mut sink = RecordingSink::new();
        let a = member("Jane Doe", "jane@x.org");
        let b = member("jane doe", "jdoe@y.org");
        assert!(are_equivalent(&a, &b, &mut sink).expect("comparison"));
        assert_eq!(
            sink.matches,
            vec![RecordedMatch {
                rule: MatchRule::ExactName,
                left_email: "jane@x.org".into(),
                right_email: "jdoe@y.org".into(),
            }]
        );
    }

    #[test]
    fn substring_match_works_both_ways() {
        let short = member("Jon", "jon@x.org");
        let long = member("Jon Smith", "smith@y.org");
        assert_eq!(
            matching_rule(&short, &long).expect("rule"),
            Some(MatchRule::NameSubstring)
        );
        assert_eq!(
            matching_rule(&long, &short).expect("rule"),
            Some(MatchRule::NameSubstring)
        );
    }

    #[test]
    fn blank_names_match_by_name() {
        let mut sink = RecordingSink::new();
        let a = member("", "one@x.org");
        let b = member("", "two@y.org");
        assert!(are_equivalent(&a, &b, &mut sink).expect("comparison"));
        assert_eq!(sink.rules(), vec![MatchRule::ExactName]);
    }

    #[test]
    fn blank_canonical_name_does_not_match_empty_name() {
        let a = member(" ", "one@x.org");
        let b = member("", "two@y.org");
        assert_eq!(matching_rule(&a, &b).expect("rule"), None);
    }

    #[test]
    fn normalized_email_match_is_recorded() {
        let mut sink = RecordingSink::new();
        let a = member("Jane Doe", "jane.doe@gmail.com");
        let b = member("Someone Else", "janedoe@gmail.com");
        assert!(are_equivalent(&a, &b, &mut sink).expect("comparison"));
        assert_eq!(sink.rules(), vec![MatchRule::NormalizedEmail]);
    }

    #[test]
    fn earlier_rule_wins_attribution() {
        let a = member("Jane Doe", "jane.doe@gmail.com");
        let b = member("Jane Doe", "janedoe@gmail.com");
        assert_eq!(matching_rule(&a, &b).expect("rule"), Some(MatchRule::ExactName));
    }

    #[test]
    fn unrelated_members_do_not_match() {
        let mut sink = RecordingSink::new();
        let a = member("Jane Doe", "jane@x.org");
        let b = member("Bob Ray", "bob@y.org");
        assert!(!are_equivalent(&a, &b, &mut sink).expect("comparison"));
        assert!(sink.matches.is_empty());
    }

    #[test]
    fn relation_is_not_transitive() {
        let jon = member("Jon", "jon@x.org");
        let jon_smith = member("Jon Smith", "jsmith@y.org");
        let smith = member("Smith", "smith@z.org");
        let mut sink = RecordingSink::new();

        assert!(are_equivalent(&jon, &jon_smith, &mut sink).expect("comparison"));
        assert!(are_equivalent(&jon_smith, &smith, &mut sink).expect("comparison"));
        assert!(!are_equivalent(&jon, &smith, &mut sink).expect("comparison"));
    }

    #[test]
    fn malformed_address_fails_at_normalization() {
        let a = member("Jane Doe", "not-an-address");
        let b = member("Bob Ray", "bob@y.org");
        let error = matching_rule(&a, &b).expect_err("malformed address");
        assert!(matches!(error, AuditError::InvalidEmailFormat(_)));
    }
}
