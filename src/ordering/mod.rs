//! Priority rule composition for roster orderings.
//!
//! Every derived value on a roster comes from re-sorting the students under
//! one of three purpose-specific total orders ([`OrderingFamily`]). Each
//! order is a chain of [`PriorityRule`]s evaluated by a [`RuleEngine`]:
//! later rules only break ties left by earlier ones, and every family ends
//! with [`ByIdAsc`] so no two distinct records ever compare equal.

mod engine;
mod rules;
mod types;

pub use engine::RuleEngine;
pub use rules::{ByFlag, ByIdAsc, ByScoreDesc, OrderingFamily};
pub use types::PriorityRule;
