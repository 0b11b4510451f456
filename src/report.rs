//! Roster summaries: counts by subject combination, flag and elective.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::roster::{RosterConfig, StudentRecord};

/// Enrollment counts for one elective subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectEnrollment {
    pub subject: String,
    pub enrolled: usize,
    pub self_study: usize,
}

/// Aggregate counts over a roster.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RosterSummary {
    pub total: usize,
    /// Students per exact subject-combination text.
    pub by_combination: BTreeMap<String, usize>,
    /// Students per flag text.
    pub by_flag: BTreeMap<String, usize>,
    /// One entry per configured elective, in configuration order.
    pub enrollment: Vec<SubjectEnrollment>,
    /// Combinations present on the roster but absent from the known set.
    pub unrecognized_combinations: BTreeSet<String>,
}

impl RosterSummary {
    pub fn from_roster(roster: &[StudentRecord], config: &RosterConfig) -> Self {
        let mut summary = RosterSummary {
            total: roster.len(),
            ..Self::default()
        };

        for student in roster {
            *summary
                .by_combination
                .entry(student.subjects.clone())
                .or_default() += 1;
            *summary
                .by_flag
                .entry(student.flag.as_str().to_string())
                .or_default() += 1;
            if !config.known_combinations.contains(&student.subjects) {
                summary
                    .unrecognized_combinations
                    .insert(student.subjects.clone());
            }
        }

        summary.enrollment = config
            .electives
            .iter()
            .map(|subject| {
                let enrolled = roster
                    .iter()
                    .filter(|s| s.is_enrolled(&subject.keyword))
                    .count();
                SubjectEnrollment {
                    subject: subject.name.clone(),
                    enrolled,
                    self_study: roster.len() - enrolled,
                }
            })
            .collect();

        summary
    }
}

impl fmt::Display for RosterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Students: {}", self.total)?;

        writeln!(f, "Subject combinations:")?;
        for (combination, count) in &self.by_combination {
            let marker = if self.unrecognized_combinations.contains(combination) {
                " (unrecognized)"
            } else {
                ""
            };
            writeln!(f, "  {}: {count}{marker}", label(combination))?;
        }

        writeln!(f, "Flags:")?;
        for (flag, count) in &self.by_flag {
            writeln!(f, "  {}: {count}", label(flag))?;
        }

        writeln!(f, "Electives:")?;
        for e in &self.enrollment {
            writeln!(
                f,
                "  {}: {} enrolled, {} self-study",
                e.subject, e.enrolled, e.self_study
            )?;
        }
        Ok(())
    }
}

fn label(text: &str) -> &str {
    if text.is_empty() {
        "(blank)"
    } else {
        text
    }
}
