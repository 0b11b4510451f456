//! Column form of a roster record, as read from and written to files.
//!
//! [`RosterRow`] mirrors [`StudentRecord`] field for field, except that
//! elective seats are rendered text: `"3"` for an enrolled student and
//! `"<tag>4"` for self-study, using the configured self-study tag.

use std::collections::BTreeMap;

use crate::flag::Flag;

use super::types::{ElectiveSeat, StudentRecord};

/// One student as it appears in an input or output file.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RosterRow {
    pub id: i64,
    pub exam_id: String,
    pub name: String,
    pub class: String,
    pub subjects: String,
    pub total_score: i32,
    pub rank: u32,
    pub composite_sequence: u32,
    /// Rendered elective seat per subject name.
    pub electives: BTreeMap<String, String>,
    pub flag: Flag,
}

impl RosterRow {
    /// Renders a record, writing self-study seats with `self_study_tag`.
    pub fn from_record(record: &StudentRecord, self_study_tag: &str) -> Self {
        Self {
            id: record.id,
            exam_id: record.exam_id.clone(),
            name: record.name.clone(),
            class: record.class.clone(),
            subjects: record.subjects.clone(),
            total_score: record.total_score,
            rank: record.rank,
            composite_sequence: record.composite_sequence,
            electives: record
                .electives
                .iter()
                .map(|(subject, seat)| (subject.clone(), seat.render(self_study_tag)))
                .collect(),
            flag: record.flag.clone(),
        }
    }

    /// Parses the row back into a record.
    ///
    /// Elective text that is blank or does not parse under `self_study_tag`
    /// is dropped, leaving that subject without a prior value.
    pub fn into_record(self, self_study_tag: &str) -> StudentRecord {
        StudentRecord {
            id: self.id,
            exam_id: self.exam_id,
            name: self.name,
            class: self.class,
            subjects: self.subjects,
            total_score: self.total_score,
            rank: self.rank,
            composite_sequence: self.composite_sequence,
            electives: self
                .electives
                .into_iter()
                .filter_map(|(subject, text)| {
                    ElectiveSeat::parse(&text, self_study_tag).map(|seat| (subject, seat))
                })
                .collect(),
            flag: self.flag,
        }
    }
}
