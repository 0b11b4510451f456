//! Rule composition engine.

use std::cmp::Ordering;

use super::types::PriorityRule;

/// Engine that composes priority rules into one lexicographic order.
///
/// Rules are applied in order. A later rule is only consulted when every
/// earlier rule produces the same key, so the last rule acts as the final
/// tie-breaker. Items tied on every rule keep their relative input order
/// (the underlying sort is stable).
///
/// # Examples
///
/// ```
/// use u_roster::ordering::{ByIdAsc, ByScoreDesc, RuleEngine};
/// use u_roster::roster::StudentRecord;
///
/// let engine = RuleEngine::new().with_rule(ByScoreDesc).with_rule(ByIdAsc);
/// let roster = vec![
///     StudentRecord::new(1, "A1", 90),
///     StudentRecord::new(2, "A2", 95),
///     StudentRecord::new(3, "A3", 90),
/// ];
///
/// let ids: Vec<i64> = engine.sort(&roster).iter().map(|s| s.id).collect();
/// assert_eq!(ids, vec![2, 1, 3]);
/// ```
pub struct RuleEngine<T> {
    rules: Vec<Box<dyn PriorityRule<T>>>,
}

impl<T> RuleEngine<T> {
    /// Creates an engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule. Earlier rules take precedence.
    pub fn with_rule<R: PriorityRule<T> + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Returns the number of rules in this engine.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the names of all rules in order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    fn keys(&self, item: &T) -> Vec<i64> {
        self.rules.iter().map(|r| r.key(item)).collect()
    }

    /// Compares two items under the composed rules.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        for rule in &self.rules {
            match rule.key(a).cmp(&rule.key(b)) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }

    /// Returns indices into `items`, ordered earliest first.
    ///
    /// The input slice is not modified.
    pub fn sort_indices(&self, items: &[T]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..items.len()).collect();
        if self.rules.is_empty() {
            return indices;
        }

        let keys: Vec<Vec<i64>> = items.iter().map(|item| self.keys(item)).collect();
        indices.sort_by(|&a, &b| keys[a].cmp(&keys[b]));
        indices
    }

    /// Returns references to `items` in sorted order.
    pub fn sort<'a>(&self, items: &'a [T]) -> Vec<&'a T> {
        self.sort_indices(items)
            .into_iter()
            .map(|i| &items[i])
            .collect()
    }

    /// Sorts a list of references, used when sorting a partition of a slice.
    pub fn sort_refs<'a>(&self, items: &[&'a T]) -> Vec<&'a T> {
        let mut keyed: Vec<(Vec<i64>, &'a T)> =
            items.iter().map(|&item| (self.keys(item), item)).collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        keyed.into_iter().map(|(_, item)| item).collect()
    }

    /// Returns the index of the earliest item, or `None` if the slice is empty.
    pub fn select_best(&self, items: &[T]) -> Option<usize> {
        self.sort_indices(items).first().copied()
    }
}

impl<T> Default for RuleEngine<T> {
    fn default() -> Self {
        Self::new()
    }
}
