use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::roster::audit::error::{AuditError, Result};
use crate::roster::audit::model::Member;

/// Settings shared by every audit. All fields fall back to the values the
/// organisation has historically used.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Domain of the organisation's own group addresses.
    pub org_domain: String,
    /// Case-insensitive markers identifying alias addresses by local-part.
    pub ignore_patterns: Vec<String>,
    /// Chat roles that count as an active membership.
    pub active_roles: Vec<String>,
    /// Source names used in report lines.
    pub labels: Labels,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Labels {
    pub canonical: String,
    pub group: String,
    pub chat: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            org_domain: "surjbayarea.org".into(),
            ignore_patterns: vec!["surj".into()],
            active_roles: vec!["Member".into(), "Admin".into(), "Owner".into()],
            labels: Labels::default(),
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            canonical: "action network".into(),
            group: "google group".into(),
            chat: "slack".into(),
        }
    }
}

/// Why a mailing-list address was left out of the group audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    OrgDomain,
    AliasPattern(String),
}

impl AuditConfig {
    /// Parses a TOML document.
    pub fn from_toml(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| AuditError::Config(e.to_string()))
    }

    /// Loads the configuration file at `path`, or the defaults when no path
    /// is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Err(AuditError::FileNotFound(path.to_path_buf()));
        }
        debug!(path = %path.display(), "loading configuration");
        Self::from_toml(&fs::read_to_string(path)?)
    }

    /// Whether `role` marks an active chat membership.
    pub fn is_active_role(&self, role: &str) -> bool {
        let role = role.trim();
        self.active_roles.iter().any(|active| active == role)
    }

    /// Returns the reason `member` should be skipped by the group audit, if
    /// any.
    pub fn ignore_reason(&self, member: &Member) -> Option<IgnoreReason> {
        if member
            .domain()
            .is_some_and(|domain| domain.eq_ignore_ascii_case(&self.org_domain))
        {
            return Some(IgnoreReason::OrgDomain);
        }

        let local = member.local_part().to_lowercase();
        self.ignore_patterns
            .iter()
            .find(|pattern| !pattern.is_empty() && local.contains(&pattern.to_lowercase()))
            .map(|pattern| IgnoreReason::AliasPattern(pattern.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = AuditConfig::from_toml(
            r#"
            org_domain = "example.org"

            [labels]
            chat = "discord"
            "#,
        )
        .expect("config parsed");
        assert_eq!(config.org_domain, "example.org");
        assert_eq!(config.ignore_patterns, vec!["surj".to_string()]);
        assert_eq!(config.labels.chat, "discord");
        assert_eq!(config.labels.canonical, "action network");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = AuditConfig::from_toml("org = \"x\"").expect_err("unknown key");
        assert!(matches!(error, AuditError::Config(_)));
    }

    #[test]
    fn org_domain_is_ignored() {
        let config = AuditConfig::default();
        let member = Member::new("", "alerts@SURJbayarea.org");
        assert_eq!(config.ignore_reason(&member), Some(IgnoreReason::OrgDomain));
    }

    #[test]
    fn alias_marker_is_ignored_case_insensitively() {
        let config = AuditConfig::default();
        let member = Member::new("", "SURJ-eastbay@gmail.com");
        assert_eq!(
            config.ignore_reason(&member),
            Some(IgnoreReason::AliasPattern("surj".into()))
        );
    }

    #[test]
    fn marker_in_domain_only_is_kept() {
        let config = AuditConfig::default();
        let member = Member::new("", "jane@surj.net");
        assert_eq!(config.ignore_reason(&member), None);
    }

    #[test]
    fn active_roles() {
        let config = AuditConfig::default();
        assert!(config.is_active_role(" Admin "));
        assert!(!config.is_active_role("Guest"));
        assert!(!config.is_active_role("Deactivated"));
    }
}
