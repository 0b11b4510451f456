//! Rank and exam-sequence assignment for scored student rosters.
//!
//! Given a roster of students with a total score, a free-text elective
//! combination and a status flag, this crate derives:
//!
//! - **Rank**: score descending, record id ascending. Flags are ignored.
//! - **Composite sequence**: the shared core-subject exam number, ordered by
//!   flag priority (`0 < 西 < 1 < 2 < other`), then score, then id.
//! - **Elective sequences**: one per configured elective subject. Enrolled
//!   students are numbered `1..=k`; everyone else continues at `k + 1` as
//!   tagged self-study numbers. Here `0` and `西` share the top priority.
//!
//! Each value comes from an independent sort of the unmodified input,
//! merged back onto the rank-ordered roster by exam id.
//!
//! # Modules
//!
//! - [`flag`]: status flags and their context-dependent priorities
//! - [`ordering`]: priority rule composition and the three ordering families
//! - [`roster`]: records, configuration, sequencing and assembly
//! - [`report`]: summary counts
//! - [`error`]: error types

pub mod error;
pub mod flag;
pub mod ordering;
pub mod report;
pub mod roster;

pub use error::{RosterError, RosterResult};
