//! Roster assembly configuration.
//!
//! [`RosterConfig`] names the elective subjects to sequence, the tag that
//! marks self-study numbers, and how merge inconsistencies are handled.

use std::collections::HashSet;

use crate::error::{RosterError, RosterResult};

/// Tag rendered in front of self-study sequence numbers.
pub const DEFAULT_SELF_STUDY_TAG: &str = "自习";

/// Subject combinations recognized for reporting.
pub const KNOWN_COMBINATIONS: [&str; 9] = [
    "政史地", "物化生", "物化地", "政生史", "物化政", "政生地", "史地化", "物化史", "物政生",
];

/// An elective subject and the keyword that marks enrollment in it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElectiveSubject {
    /// Subject name, used as the key of [`StudentRecord::electives`](super::StudentRecord::electives).
    pub name: String,
    /// A student is enrolled when their subject selection contains this text.
    pub keyword: String,
}

impl ElectiveSubject {
    pub fn new(name: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keyword: keyword.into(),
        }
    }
}

/// What to do when a derived value cannot be merged back onto a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MergePolicy {
    /// Collect every offending exam id, then fail the assembly.
    #[default]
    Strict,
    /// Keep the prior value, log a warning and report the issue.
    Warn,
}

/// Configuration for [`RosterAssembler`](super::RosterAssembler).
///
/// # Defaults
///
/// ```
/// use u_roster::roster::{MergePolicy, RosterConfig};
///
/// let config = RosterConfig::default();
/// assert_eq!(config.electives.len(), 6);
/// assert_eq!(config.self_study_tag, "自习");
/// assert_eq!(config.merge_policy, MergePolicy::Strict);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_roster::roster::{ElectiveSubject, MergePolicy, RosterConfig};
///
/// let config = RosterConfig::default()
///     .with_electives(vec![ElectiveSubject::new("Physics", "P")])
///     .with_self_study_tag("SS-")
///     .with_merge_policy(MergePolicy::Warn);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RosterConfig {
    /// Elective subjects, sequenced in this order.
    pub electives: Vec<ElectiveSubject>,

    /// Marker for self-study numbers.
    pub self_study_tag: String,

    pub merge_policy: MergePolicy,

    /// The closed set of subject combinations used by reports.
    pub known_combinations: Vec<String>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            electives: vec![
                ElectiveSubject::new("物理", "物"),
                ElectiveSubject::new("化学", "化"),
                ElectiveSubject::new("生物", "生"),
                ElectiveSubject::new("政治", "政"),
                ElectiveSubject::new("历史", "史"),
                ElectiveSubject::new("地理", "地"),
            ],
            self_study_tag: DEFAULT_SELF_STUDY_TAG.to_string(),
            merge_policy: MergePolicy::default(),
            known_combinations: KNOWN_COMBINATIONS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl RosterConfig {
    /// Replaces the elective subject list.
    pub fn with_electives(mut self, electives: Vec<ElectiveSubject>) -> Self {
        self.electives = electives;
        self
    }

    /// Appends one elective subject.
    pub fn with_elective(mut self, name: impl Into<String>, keyword: impl Into<String>) -> Self {
        self.electives.push(ElectiveSubject::new(name, keyword));
        self
    }

    pub fn with_self_study_tag(mut self, tag: impl Into<String>) -> Self {
        self.self_study_tag = tag.into();
        self
    }

    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    pub fn with_known_combinations(mut self, combinations: Vec<String>) -> Self {
        self.known_combinations = combinations;
        self
    }

    /// Looks up a configured elective by name.
    pub fn elective(&self, name: &str) -> Option<&ElectiveSubject> {
        self.electives.iter().find(|e| e.name == name)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> RosterResult<()> {
        let mut seen = HashSet::new();
        for elective in &self.electives {
            if elective.name.is_empty() {
                return Err(RosterError::invalid_config(
                    "electives",
                    "subject name must not be empty",
                ));
            }
            if elective.keyword.is_empty() {
                return Err(RosterError::invalid_config(
                    "electives",
                    format!("keyword for {} must not be empty", elective.name),
                ));
            }
            if !seen.insert(elective.name.as_str()) {
                return Err(RosterError::invalid_config(
                    "electives",
                    format!("duplicate subject {}", elective.name),
                ));
            }
        }
        if self.self_study_tag.is_empty() {
            return Err(RosterError::invalid_config(
                "self_study_tag",
                "must not be empty",
            ));
        }
        if self.self_study_tag.chars().all(|c| c.is_ascii_digit()) {
            return Err(RosterError::invalid_config(
                "self_study_tag",
                "must not consist of digits only",
            ));
        }
        Ok(())
    }
}
