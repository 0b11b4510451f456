//! Core trait for ordering rules.

/// A rule that assigns an integer sort key to an item.
///
/// Keys are compared ascending: **lower is earlier**. Descending criteria
/// negate their value (see [`ByScoreDesc`](super::ByScoreDesc)).
///
/// # Examples
///
/// ```
/// use u_roster::ordering::PriorityRule;
///
/// struct Shortest;
///
/// impl PriorityRule<String> for Shortest {
///     fn name(&self) -> &str { "Shortest" }
///     fn key(&self, item: &String) -> i64 { item.len() as i64 }
/// }
///
/// assert_eq!(Shortest.key(&"abc".to_string()), 3);
/// ```
pub trait PriorityRule<T>: Send + Sync {
    /// Returns the name of this rule.
    fn name(&self) -> &str;

    /// Computes the sort key for the given item.
    fn key(&self, item: &T) -> i64;
}
