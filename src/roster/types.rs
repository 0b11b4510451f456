//! Student records and the values derived for them.

use std::collections::BTreeMap;

use crate::flag::Flag;

/// Sequence number of a student for one elective subject.
///
/// Enrolled students are numbered `1..=k`; students who did not choose the
/// subject continue the count from `k + 1` and are tagged as self-study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ElectiveSeat {
    Enrolled(u32),
    SelfStudy(u32),
}

impl ElectiveSeat {
    /// The number regardless of tag.
    pub fn number(self) -> u32 {
        match self {
            ElectiveSeat::Enrolled(n) | ElectiveSeat::SelfStudy(n) => n,
        }
    }

    pub fn is_enrolled(self) -> bool {
        matches!(self, ElectiveSeat::Enrolled(_))
    }

    /// Renders the seat in column form: `"3"` or `"<tag>4"`.
    pub fn render(self, self_study_tag: &str) -> String {
        match self {
            ElectiveSeat::Enrolled(n) => n.to_string(),
            ElectiveSeat::SelfStudy(n) => format!("{self_study_tag}{n}"),
        }
    }

    /// Parses a rendered seat. Returns `None` for blank or unrecognized text.
    pub fn parse(text: &str, self_study_tag: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(n) = text.parse::<u32>() {
            return Some(ElectiveSeat::Enrolled(n));
        }
        text.strip_prefix(self_study_tag)
            .filter(|_| !self_study_tag.is_empty())
            .and_then(|rest| rest.parse::<u32>().ok())
            .map(ElectiveSeat::SelfStudy)
    }
}

/// One student on the roster.
///
/// `rank`, `composite_sequence` and `electives` are derived; every other
/// field is input. Only `id`, `total_score`, `flag` and the subject
/// selection influence ordering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StudentRecord {
    /// Unique, stable record number. Final tie-breaker in every ordering.
    pub id: i64,
    /// Unique exam id; the key used to merge derived values.
    pub exam_id: String,
    pub name: String,
    pub class: String,
    /// Free-text elective combination, e.g. `"物化生"`.
    pub subjects: String,
    pub total_score: i32,
    /// 1-based overall rank.
    pub rank: u32,
    /// 1-based core-subject (composite) sequence number.
    pub composite_sequence: u32,
    /// Elective sequence per subject name.
    pub electives: BTreeMap<String, ElectiveSeat>,
    pub flag: Flag,
}

impl StudentRecord {
    /// Creates a record with blank text fields and no derived values.
    pub fn new(id: i64, exam_id: impl Into<String>, total_score: i32) -> Self {
        Self {
            id,
            exam_id: exam_id.into(),
            total_score,
            ..Self::default()
        }
    }

    pub fn with_subjects(mut self, subjects: impl Into<String>) -> Self {
        self.subjects = subjects.into();
        self
    }

    pub fn with_flag(mut self, flag: impl Into<Flag>) -> Self {
        self.flag = flag.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    /// Sets a prior elective value, e.g. one carried over from an earlier run.
    pub fn with_elective(mut self, subject: impl Into<String>, seat: ElectiveSeat) -> Self {
        self.electives.insert(subject.into(), seat);
        self
    }

    /// Whether the subject selection contains `keyword`.
    pub fn is_enrolled(&self, keyword: &str) -> bool {
        self.subjects.contains(keyword)
    }

    /// The elective seat for a subject, if one has been assigned.
    pub fn elective(&self, subject: &str) -> Option<ElectiveSeat> {
        self.electives.get(subject).copied()
    }
}
