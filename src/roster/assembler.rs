//! Roster assembly: rank, composite sequence and elective sequences.
//!
//! # Algorithm
//!
//! 1. Sort the roster by [`OrderingFamily::Rank`] and number it `1..=n`.
//!    This order is the canonical output order.
//! 2. Sort by [`OrderingFamily::Assignment`] and map exam id → composite
//!    sequence.
//! 3. For every configured elective, partition into enrolled / self-study,
//!    sort each part by [`OrderingFamily::Elective`] and map exam id → seat.
//! 4. Merge every map onto the rank-ordered copy by exam id.
//!
//! The input slice is never modified.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::{debug, info, warn};

use super::config::{MergePolicy, RosterConfig};
use super::sequence::{compute_by_ordering, PositionMap, SequenceAssigner};
use super::types::{ElectiveSeat, StudentRecord};
use crate::error::{RosterError, RosterResult};
use crate::ordering::OrderingFamily;

/// A derived field that is merged by exam id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DerivedField {
    CompositeSequence,
    Elective(String),
}

impl fmt::Display for DerivedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DerivedField::CompositeSequence => f.write_str("composite_sequence"),
            DerivedField::Elective(subject) => write!(f, "elective {subject}"),
        }
    }
}

/// A derived value that could not be merged onto a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeIssue {
    pub exam_id: String,
    pub field: DerivedField,
}

/// Result of a roster assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Records in rank order with every derived field populated.
    pub roster: Vec<StudentRecord>,
    /// Merge issues. Always empty under [`MergePolicy::Strict`].
    pub issues: Vec<MergeIssue>,
    /// Record ids that occur more than once. Always empty under
    /// [`MergePolicy::Strict`].
    pub duplicate_ids: Vec<i64>,
}

impl Assignment {
    pub fn is_consistent(&self) -> bool {
        self.issues.is_empty() && self.duplicate_ids.is_empty()
    }

    /// Distinct exam ids named by the merge issues, sorted.
    pub fn inconsistent_exam_ids(&self) -> Vec<String> {
        let ids: BTreeSet<&str> = self.issues.iter().map(|i| i.exam_id.as_str()).collect();
        ids.into_iter().map(str::to_string).collect()
    }
}

/// Orchestrates the orderings and merges their results.
///
/// # Examples
///
/// ```
/// use u_roster::roster::{ElectiveSeat, RosterAssembler, RosterConfig, StudentRecord};
///
/// let assembler = RosterAssembler::new(RosterConfig::default()).unwrap();
/// let roster = vec![
///     StudentRecord::new(1, "E1", 90).with_subjects("物化生").with_flag("0"),
///     StudentRecord::new(2, "E2", 95).with_subjects("政史地").with_flag("0"),
/// ];
///
/// let result = assembler.assemble(&roster).unwrap();
/// assert_eq!(result.roster[0].exam_id, "E2");
/// assert_eq!(result.roster[0].rank, 1);
/// assert_eq!(result.roster[1].elective("物理"), Some(ElectiveSeat::Enrolled(1)));
/// assert_eq!(result.roster[0].elective("物理"), Some(ElectiveSeat::SelfStudy(2)));
/// ```
#[derive(Debug, Clone)]
pub struct RosterAssembler {
    config: RosterConfig,
}

impl RosterAssembler {
    /// Creates an assembler after validating `config`.
    pub fn new(config: RosterConfig) -> RosterResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    /// Computes rank, composite sequence and every elective sequence.
    ///
    /// The full roster is always processed before consistency is judged.
    /// Under [`MergePolicy::Strict`], duplicate record ids and unmergeable
    /// exam ids together fail the assembly with one
    /// [`RosterError::InconsistentRoster`] listing every offender. Under
    /// [`MergePolicy::Warn`] affected fields keep their prior values and the
    /// problems are reported on the returned [`Assignment`].
    #[tracing::instrument(level = "debug", skip_all, fields(students = roster.len()))]
    pub fn assemble(&self, roster: &[StudentRecord]) -> RosterResult<Assignment> {
        let duplicate_ids = duplicate_ids(roster);

        let rank_engine = OrderingFamily::Rank.engine();
        let ordered = rank_engine.sort(roster);
        let mut ranked: Vec<StudentRecord> = Vec::with_capacity(ordered.len());
        for (student, rank) in SequenceAssigner::number(&ordered, 0)? {
            ranked.push(StudentRecord {
                rank,
                ..student.clone()
            });
        }
        debug!(family = %OrderingFamily::Rank, "ranked roster");

        let composite = compute_by_ordering(roster, &OrderingFamily::Assignment.engine())?;
        debug!(family = %OrderingFamily::Assignment, "computed composite sequence");

        let elective_engine = OrderingFamily::Elective.engine();
        let electives: Vec<(&str, PositionMap<ElectiveSeat>)> = self
            .config
            .electives
            .iter()
            .map(|subject| {
                SequenceAssigner::elective(roster, subject, &elective_engine)
                    .map(|seats| (subject.name.as_str(), seats))
            })
            .collect::<RosterResult<_>>()?;

        let mut issues = Vec::new();
        for student in &mut ranked {
            match composite.get(&student.exam_id) {
                Some(&n) => student.composite_sequence = n,
                None => issues.push(MergeIssue {
                    exam_id: student.exam_id.clone(),
                    field: DerivedField::CompositeSequence,
                }),
            }
            for (subject, seats) in &electives {
                match seats.get(&student.exam_id) {
                    Some(&seat) => {
                        student.electives.insert(subject.to_string(), seat);
                    }
                    None => issues.push(MergeIssue {
                        exam_id: student.exam_id.clone(),
                        field: DerivedField::Elective(subject.to_string()),
                    }),
                }
            }
        }

        let assignment = Assignment {
            roster: ranked,
            issues,
            duplicate_ids,
        };

        if !assignment.is_consistent() {
            match self.config.merge_policy {
                MergePolicy::Strict => {
                    return Err(RosterError::InconsistentRoster {
                        duplicate_ids: assignment.duplicate_ids.clone(),
                        exam_ids: assignment.inconsistent_exam_ids(),
                    })
                }
                MergePolicy::Warn => {
                    if !assignment.duplicate_ids.is_empty() {
                        warn!(ids = ?assignment.duplicate_ids, "duplicate record ids");
                    }
                    for issue in &assignment.issues {
                        warn!(exam_id = %issue.exam_id, field = %issue.field, "derived value not merged, keeping prior value");
                    }
                }
            }
        }

        info!(
            students = assignment.roster.len(),
            electives = self.config.electives.len(),
            issues = assignment.issues.len(),
            "assembled roster"
        );
        Ok(assignment)
    }
}

fn duplicate_ids(roster: &[StudentRecord]) -> Vec<i64> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for student in roster {
        *counts.entry(student.id).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(id, _)| id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flag::Flag;
    use proptest::prelude::*;

    fn student(id: i64, score: i32, subjects: &str, flag: &str) -> StudentRecord {
        StudentRecord::new(id, format!("E{id:03}"), score)
            .with_subjects(subjects)
            .with_flag(flag)
    }

    fn assembler() -> RosterAssembler {
        RosterAssembler::new(RosterConfig::default()).unwrap()
    }

    fn by_id(roster: &[StudentRecord], id: i64) -> &StudentRecord {
        roster.iter().find(|s| s.id == id).unwrap()
    }

    fn sample_roster() -> Vec<StudentRecord> {
        vec![
            student(1, 580, "物化生", "0"),
            student(2, 612, "政史地", "西"),
            student(3, 580, "物化地", "1"),
            student(4, 640, "物化政", "2"),
            student(5, 555, "政生史", "0"),
            student(6, 612, "史地化", "休学"),
        ]
    }

    #[test]
    fn test_rank_scenario() {
        let roster = vec![
            student(1, 90, "", "0"),
            student(2, 95, "", "0"),
            student(3, 90, "", "0"),
        ];
        let result = assembler().assemble(&roster).unwrap();
        let order: Vec<(i64, u32)> = result.roster.iter().map(|s| (s.id, s.rank)).collect();
        assert_eq!(order, vec![(2, 1), (1, 2), (3, 3)]);
    }

    #[test]
    fn test_composite_sequence_uses_flag_priority() {
        let result = assembler().assemble(&sample_roster()).unwrap();
        let r = &result.roster;
        // Ranking-context priority: 0 < 西 < 1 < 2 < other.
        assert_eq!(by_id(r, 1).composite_sequence, 1);
        assert_eq!(by_id(r, 5).composite_sequence, 2);
        assert_eq!(by_id(r, 2).composite_sequence, 3);
        assert_eq!(by_id(r, 3).composite_sequence, 4);
        assert_eq!(by_id(r, 4).composite_sequence, 5);
        assert_eq!(by_id(r, 6).composite_sequence, 6);
    }

    #[test]
    fn test_output_is_rank_ordered() {
        let result = assembler().assemble(&sample_roster()).unwrap();
        let ids: Vec<i64> = result.roster.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![4, 2, 6, 1, 3, 5]);
        assert!(result.is_consistent());
    }

    #[test]
    fn test_elective_sequences() {
        let result = assembler().assemble(&sample_roster()).unwrap();
        let r = &result.roster;
        // 物: enrolled 1 (0, 580), 3 (1, 580), 4 (2, 640).
        assert_eq!(by_id(r, 1).elective("物理"), Some(ElectiveSeat::Enrolled(1)));
        assert_eq!(by_id(r, 3).elective("物理"), Some(ElectiveSeat::Enrolled(2)));
        assert_eq!(by_id(r, 4).elective("物理"), Some(ElectiveSeat::Enrolled(3)));
        // Self-study: 2 (西 = 0, 612), 5 (0, 555), 6 (other, 612).
        assert_eq!(by_id(r, 2).elective("物理"), Some(ElectiveSeat::SelfStudy(4)));
        assert_eq!(by_id(r, 5).elective("物理"), Some(ElectiveSeat::SelfStudy(5)));
        assert_eq!(by_id(r, 6).elective("物理"), Some(ElectiveSeat::SelfStudy(6)));
        // 史: enrolled 2 (西, 612), 5 (0, 555), 6 (other, 612).
        assert_eq!(by_id(r, 2).elective("历史"), Some(ElectiveSeat::Enrolled(1)));
        assert_eq!(by_id(r, 5).elective("历史"), Some(ElectiveSeat::Enrolled(2)));
        assert_eq!(by_id(r, 6).elective("历史"), Some(ElectiveSeat::Enrolled(3)));
    }

    #[test]
    fn test_every_elective_populated() {
        let result = assembler().assemble(&sample_roster()).unwrap();
        for s in &result.roster {
            assert_eq!(s.electives.len(), 6, "student {}", s.id);
        }
    }

    #[test]
    fn test_west_and_zero_divergence() {
        let roster = vec![student(1, 88, "物化生", "西"), student(2, 88, "物化生", "0")];
        let result = assembler().assemble(&roster).unwrap();
        let r = &result.roster;
        assert_eq!(by_id(r, 2).composite_sequence, 1);
        assert_eq!(by_id(r, 1).composite_sequence, 2);
        // Equal priority for electives: id decides.
        assert_eq!(by_id(r, 1).elective("物理"), Some(ElectiveSeat::Enrolled(1)));
        assert_eq!(by_id(r, 2).elective("物理"), Some(ElectiveSeat::Enrolled(2)));
    }

    #[test]
    fn test_input_is_not_modified() {
        let roster = sample_roster();
        let before = roster.clone();
        let _ = assembler().assemble(&roster).unwrap();
        assert_eq!(roster, before);
    }

    #[test]
    fn test_prior_values_are_overwritten() {
        let roster = vec![StudentRecord::new(1, "E1", 10)
            .with_subjects("物化生")
            .with_elective("物理", ElectiveSeat::SelfStudy(99))];
        let mut with_rank = roster.clone();
        with_rank[0].rank = 42;
        with_rank[0].composite_sequence = 42;

        let result = assembler().assemble(&with_rank).unwrap();
        assert_eq!(result.roster[0].rank, 1);
        assert_eq!(result.roster[0].composite_sequence, 1);
        assert_eq!(result.roster[0].elective("物理"), Some(ElectiveSeat::Enrolled(1)));
    }

    #[test]
    fn test_empty_roster() {
        let result = assembler().assemble(&[]).unwrap();
        assert!(result.roster.is_empty());
        assert!(result.is_consistent());
    }

    #[test]
    fn test_custom_electives() {
        let config = RosterConfig::default()
            .with_electives(Vec::new())
            .with_elective("Physics", "Physics");
        let assembler = RosterAssembler::new(config).unwrap();
        let roster = vec![
            student(1, 90, "Physics-Chemistry-Biology", "0"),
            student(2, 80, "History", "0"),
        ];
        let result = assembler.assemble(&roster).unwrap();
        let r = &result.roster;
        assert_eq!(by_id(r, 1).elective("Physics"), Some(ElectiveSeat::Enrolled(1)));
        assert_eq!(by_id(r, 2).elective("Physics"), Some(ElectiveSeat::SelfStudy(2)));
        assert_eq!(by_id(r, 1).electives.len(), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RosterConfig::default().with_self_study_tag("");
        assert!(matches!(
            RosterAssembler::new(config),
            Err(RosterError::InvalidConfig { .. })
        ));
    }

    // ---- Consistency policy ----

    fn roster_with_duplicate_exam_ids() -> Vec<StudentRecord> {
        let mut roster = sample_roster();
        roster[2].exam_id = roster[0].exam_id.clone();
        roster[5].exam_id = roster[4].exam_id.clone();
        roster
    }

    #[test]
    fn test_strict_reports_every_inconsistent_exam_id() {
        let err = assembler()
            .assemble(&roster_with_duplicate_exam_ids())
            .unwrap_err();
        assert_eq!(
            err,
            RosterError::InconsistentRoster {
                duplicate_ids: Vec::new(),
                exam_ids: vec!["E001".into(), "E005".into()]
            }
        );
    }

    #[test]
    fn test_strict_reports_duplicate_ids_and_exam_ids_together() {
        let mut roster = roster_with_duplicate_exam_ids();
        roster[3].id = 2;
        let err = assembler().assemble(&roster).unwrap_err();
        assert_eq!(
            err,
            RosterError::InconsistentRoster {
                duplicate_ids: vec![2],
                exam_ids: vec!["E001".into(), "E005".into()]
            }
        );
    }

    #[test]
    fn test_warn_keeps_prior_values_and_continues() {
        let config = RosterConfig::default().with_merge_policy(MergePolicy::Warn);
        let mut roster = roster_with_duplicate_exam_ids();
        roster[0].composite_sequence = 77;
        let result = RosterAssembler::new(config).unwrap().assemble(&roster).unwrap();

        assert!(!result.is_consistent());
        assert_eq!(result.inconsistent_exam_ids(), vec!["E001", "E005"]);
        // Two colliding pairs, each missing composite + 6 electives.
        assert_eq!(result.issues.len(), 4 * 7);

        let r = &result.roster;
        assert_eq!(by_id(r, 1).composite_sequence, 77);
        assert_eq!(by_id(r, 3).composite_sequence, 0);
        assert!(by_id(r, 1).electives.is_empty());
        // Unaffected records are fully merged.
        assert_eq!(by_id(r, 2).composite_sequence, 3);
        assert_eq!(by_id(r, 4).electives.len(), 6);
        // Rank never depends on the merge.
        let ranks: Vec<u32> = r.iter().map(|s| s.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_duplicate_ids_strict() {
        let mut roster = sample_roster();
        roster[1].id = 1;
        assert_eq!(
            assembler().assemble(&roster).unwrap_err(),
            RosterError::InconsistentRoster {
                duplicate_ids: vec![1],
                exam_ids: Vec::new()
            }
        );
    }

    #[test]
    fn test_duplicate_ids_warn() {
        let mut roster = sample_roster();
        roster[1].id = 1;
        let config = RosterConfig::default().with_merge_policy(MergePolicy::Warn);
        let result = RosterAssembler::new(config).unwrap().assemble(&roster).unwrap();
        assert_eq!(result.duplicate_ids, vec![1]);
        assert!(result.issues.is_empty());
        assert!(!result.is_consistent());
    }

    #[test]
    fn test_derived_field_display() {
        assert_eq!(DerivedField::CompositeSequence.to_string(), "composite_sequence");
        assert_eq!(DerivedField::Elective("物理".into()).to_string(), "elective 物理");
    }

    // ---- Properties ----

    fn arb_roster() -> impl Strategy<Value = Vec<StudentRecord>> {
        let subjects = prop::sample::select(vec!["物化生", "政史地", "物化地", "史地化", "", "物政生"]);
        let flags = prop::sample::select(vec!["0", "西", "1", "2", "", "休学"]);
        prop::collection::vec((0i32..20, subjects, flags), 0..40).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (score, subjects, flag))| {
                    student(i as i64 + 1, score * 10, subjects, flag)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_rank_and_composite_are_permutations(roster in arb_roster()) {
            let result = assembler().assemble(&roster).unwrap();
            let n = roster.len() as u32;

            let ranks: Vec<u32> = result.roster.iter().map(|s| s.rank).collect();
            prop_assert_eq!(ranks, (1..=n).collect::<Vec<_>>());

            let mut composite: Vec<u32> =
                result.roster.iter().map(|s| s.composite_sequence).collect();
            composite.sort_unstable();
            prop_assert_eq!(composite, (1..=n).collect::<Vec<_>>());
        }

        #[test]
        fn prop_elective_partition_is_contiguous(roster in arb_roster()) {
            let config = RosterConfig::default();
            let result = assembler().assemble(&roster).unwrap();
            let n = roster.len() as u32;

            for subject in &config.electives {
                let mut enrolled = Vec::new();
                let mut self_study = Vec::new();
                for s in &result.roster {
                    match s.elective(&subject.name) {
                        Some(ElectiveSeat::Enrolled(k)) => {
                            prop_assert!(s.is_enrolled(&subject.keyword));
                            enrolled.push(k);
                        }
                        Some(ElectiveSeat::SelfStudy(k)) => {
                            prop_assert!(!s.is_enrolled(&subject.keyword));
                            self_study.push(k);
                        }
                        None => prop_assert!(false, "missing seat for {}", s.exam_id),
                    }
                }
                enrolled.sort_unstable();
                self_study.sort_unstable();
                let k = enrolled.len() as u32;
                prop_assert_eq!(enrolled, (1..=k).collect::<Vec<_>>());
                prop_assert_eq!(self_study, (k + 1..=n).collect::<Vec<_>>());
            }
        }

        #[test]
        fn prop_input_order_is_irrelevant(
            (roster, shuffled) in arb_roster().prop_flat_map(|r| {
                let original = r.clone();
                (Just(original), Just(r).prop_shuffle())
            })
        ) {
            let a = assembler().assemble(&roster).unwrap();
            let b = assembler().assemble(&shuffled).unwrap();
            prop_assert_eq!(&a, &b);

            // Idempotent: assembling the output again changes nothing.
            let again = assembler().assemble(&a.roster).unwrap();
            prop_assert_eq!(a, again);
        }

        #[test]
        fn prop_equal_keys_break_ties_by_id(score in 0i32..100, flag in prop::sample::select(vec!["0", "西"])) {
            let roster = vec![
                student(9, score, "物化生", flag),
                student(3, score, "物化生", flag),
                student(5, score, "物化生", flag),
            ];
            let result = assembler().assemble(&roster).unwrap();
            let ids: Vec<i64> = result.roster.iter().map(|s| s.id).collect();
            prop_assert_eq!(ids, vec![3, 5, 9]);
            let r = &result.roster;
            prop_assert_eq!(by_id(r, 3).elective("物理"), Some(ElectiveSeat::Enrolled(1)));
            prop_assert_eq!(by_id(r, 9).elective("物理"), Some(ElectiveSeat::Enrolled(3)));
            prop_assert_eq!(by_id(r, 5).flag.clone(), Flag::parse(flag));
        }
    }
}
