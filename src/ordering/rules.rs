//! Student ordering rules and the three ordering families built from them.

use std::fmt;

use super::engine::RuleEngine;
use super::types::PriorityRule;
use crate::flag::FlagContext;
use crate::roster::StudentRecord;

/// Orders by flag priority in a fixed context, lower priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByFlag(pub FlagContext);

impl PriorityRule<StudentRecord> for ByFlag {
    fn name(&self) -> &str {
        match self.0 {
            FlagContext::Ranking => "FlagRanking",
            FlagContext::Elective => "FlagElective",
        }
    }

    fn key(&self, student: &StudentRecord) -> i64 {
        i64::from(student.flag.priority(self.0))
    }
}

/// Orders by total score, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByScoreDesc;

impl PriorityRule<StudentRecord> for ByScoreDesc {
    fn name(&self) -> &str {
        "ScoreDesc"
    }

    fn key(&self, student: &StudentRecord) -> i64 {
        -i64::from(student.total_score)
    }
}

/// Orders by record id, lowest first. Always the final tie-breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByIdAsc;

impl PriorityRule<StudentRecord> for ByIdAsc {
    fn name(&self) -> &str {
        "IdAsc"
    }

    fn key(&self, student: &StudentRecord) -> i64 {
        student.id
    }
}

/// The purpose-specific total orders over a roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderingFamily {
    /// Overall rank: score descending, then id. Flags are ignored.
    Rank,
    /// Composite (core-subject) sequence: ranking-context flag priority,
    /// then score descending, then id.
    Assignment,
    /// Per-elective sequence: elective-context flag priority, then score
    /// descending, then id.
    Elective,
}

impl OrderingFamily {
    /// Builds the rule engine for this family.
    pub fn engine(self) -> RuleEngine<StudentRecord> {
        let engine = match self {
            OrderingFamily::Rank => RuleEngine::new(),
            OrderingFamily::Assignment => RuleEngine::new().with_rule(ByFlag(FlagContext::Ranking)),
            OrderingFamily::Elective => RuleEngine::new().with_rule(ByFlag(FlagContext::Elective)),
        };
        engine.with_rule(ByScoreDesc).with_rule(ByIdAsc)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderingFamily::Rank => "rank",
            OrderingFamily::Assignment => "assignment",
            OrderingFamily::Elective => "elective",
        }
    }
}

impl fmt::Display for OrderingFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
