//! Error types for roster assembly.

use thiserror::Error;

/// Errors surfaced by configuration validation and roster assembly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    /// Record ids that occur more than once, and exam ids whose derived
    /// values could not be merged back.
    #[error("Inconsistent roster: {}", describe_inconsistency(.duplicate_ids, .exam_ids))]
    InconsistentRoster {
        duplicate_ids: Vec<i64>,
        exam_ids: Vec<String>,
    },

    /// A sequence would run past `u32::MAX`.
    #[error("Roster too large: {len} students starting after {offset} exceed the sequence range")]
    RosterTooLarge { len: usize, offset: u32 },
}

fn describe_inconsistency(duplicate_ids: &[i64], exam_ids: &[String]) -> String {
    let mut parts = Vec::new();
    if !duplicate_ids.is_empty() {
        parts.push(format!("duplicate record id(s) {duplicate_ids:?}"));
    }
    if !exam_ids.is_empty() {
        parts.push(format!(
            "{} exam id(s) could not be merged: {}",
            exam_ids.len(),
            exam_ids.join(", ")
        ));
    }
    parts.join("; ")
}

impl RosterError {
    pub(crate) fn invalid_config(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type RosterResult<T> = Result<T, RosterError>;
