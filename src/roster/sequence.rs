//! Dense sequence numbering keyed by exam id.
//!
//! Each derived value is computed by an independent sort of the roster and
//! collected into a [`PositionMap`] keyed by exam id. The map is merged back
//! onto the canonical rank order by [`RosterAssembler`](super::RosterAssembler).

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::config::ElectiveSubject;
use super::types::{ElectiveSeat, StudentRecord};
use crate::error::{RosterError, RosterResult};
use crate::ordering::RuleEngine;

/// Derived values keyed by exam id.
///
/// An exam id that occurs more than once cannot be resolved to a single
/// record. Such ids are withheld from the map and listed in
/// [`conflicts`](Self::conflicts).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionMap<V> {
    values: HashMap<String, V>,
    conflicts: BTreeSet<String>,
}

impl<V> PositionMap<V> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            values: HashMap::with_capacity(capacity),
            conflicts: BTreeSet::new(),
        }
    }

    fn insert(&mut self, exam_id: &str, value: V) {
        if self.conflicts.contains(exam_id) {
            return;
        }
        if self.values.insert(exam_id.to_string(), value).is_some() {
            self.values.remove(exam_id);
            self.conflicts.insert(exam_id.to_string());
        }
    }

    pub fn get(&self, exam_id: &str) -> Option<&V> {
        self.values.get(exam_id)
    }

    /// Exam ids that appeared more than once.
    pub fn conflicts(&self) -> &BTreeSet<String> {
        &self.conflicts
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Sorts `roster` with `engine` and maps each exam id to its 1-based position.
pub fn compute_by_ordering(
    roster: &[StudentRecord],
    engine: &RuleEngine<StudentRecord>,
) -> RosterResult<PositionMap<u32>> {
    let ordered = engine.sort(roster);
    let mut positions = PositionMap::with_capacity(ordered.len());
    for (student, n) in SequenceAssigner::number(&ordered, 0)? {
        positions.insert(&student.exam_id, n);
    }
    Ok(positions)
}

/// Assigns dense sequence numbers to ordered records.
pub struct SequenceAssigner;

impl SequenceAssigner {
    /// Pairs each record with `offset + 1, offset + 2, …` in order.
    ///
    /// Fails with [`RosterError::RosterTooLarge`] if the last number would
    /// exceed `u32::MAX`.
    pub fn number<'a>(
        ordered: &[&'a StudentRecord],
        offset: u32,
    ) -> RosterResult<Vec<(&'a StudentRecord, u32)>> {
        let count = u32::try_from(ordered.len())
            .ok()
            .filter(|&count| offset.checked_add(count).is_some())
            .ok_or(RosterError::RosterTooLarge {
                len: ordered.len(),
                offset,
            })?;

        Ok(ordered
            .iter()
            .zip(1..=count)
            .map(|(&student, i)| (student, offset + i))
            .collect())
    }

    /// Sequences one elective subject.
    ///
    /// Students whose selection contains the subject keyword are sorted with
    /// `engine` and numbered `1..=k` as [`ElectiveSeat::Enrolled`]. The rest
    /// are sorted the same way and numbered `k+1..=n` as
    /// [`ElectiveSeat::SelfStudy`].
    pub fn elective(
        roster: &[StudentRecord],
        subject: &ElectiveSubject,
        engine: &RuleEngine<StudentRecord>,
    ) -> RosterResult<PositionMap<ElectiveSeat>> {
        let (enrolled, self_study): (Vec<&StudentRecord>, Vec<&StudentRecord>) = roster
            .iter()
            .partition(|s| s.is_enrolled(&subject.keyword));

        let enrolled = engine.sort_refs(&enrolled);
        let self_study = engine.sort_refs(&self_study);

        debug!(
            subject = %subject.name,
            enrolled = enrolled.len(),
            self_study = self_study.len(),
            "sequenced elective"
        );

        let enrolled = Self::number(&enrolled, 0)?;
        let enrolled_count = enrolled.last().map_or(0, |&(_, n)| n);
        let self_study = Self::number(&self_study, enrolled_count)?;

        let mut seats = PositionMap::with_capacity(roster.len());
        for (student, n) in enrolled {
            seats.insert(&student.exam_id, ElectiveSeat::Enrolled(n));
        }
        for (student, n) in self_study {
            seats.insert(&student.exam_id, ElectiveSeat::SelfStudy(n));
        }
        Ok(seats)
    }
}
