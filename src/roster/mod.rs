//! Rank and sequence assignment over a student roster.
//!
//! # Key Types
//!
//! - [`StudentRecord`]: one student, input fields plus derived values
//! - [`ElectiveSeat`]: enrolled or self-study sequence number for one elective
//! - `RosterRow`: column form of a record with rendered elective seats (`serde` feature)
//! - [`RosterConfig`]: elective subjects, self-study tag, merge policy
//! - [`RosterAssembler`]: computes every derived value and merges by exam id
//! - [`SequenceAssigner`]: dense numbering and elective partitioning

mod assembler;
mod config;
#[cfg(feature = "serde")]
mod row;
mod sequence;
mod types;

pub use assembler::{Assignment, DerivedField, MergeIssue, RosterAssembler};
pub use config::{
    ElectiveSubject, MergePolicy, RosterConfig, DEFAULT_SELF_STUDY_TAG, KNOWN_COMBINATIONS,
};
#[cfg(feature = "serde")]
pub use row::RosterRow;
pub use sequence::{compute_by_ordering, PositionMap, SequenceAssigner};
pub use types::{ElectiveSeat, StudentRecord};
