//! Unique test data so parallel tests never share names.

use ulid::Ulid;

/// A nickname in the format `{prefix}-{ulid}`.
///
/// ```
/// use engine_test_support::unique_helpers::unique_nick;
///
/// let a = unique_nick("ana");
/// let b = unique_nick("ana");
/// assert_ne!(a, b);
/// assert!(a.starts_with("ana-"));
/// ```
pub fn unique_nick(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}
