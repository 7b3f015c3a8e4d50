//! Case-insensitive AND-matching of note bodies against required substrings.

/// Returns true iff every required substring occurs in the body.
///
/// Both inputs must already be lower-cased. Evaluation stops at the first
/// missing substring.
///
/// # Examples
///
/// ```
/// use tagsweep::tagging::matches;
///
/// let body = "project x deadline is friday";
/// assert!(matches(body, &["deadline".to_string(), "project x".to_string()]));
/// assert!(!matches(body, &["deadline".to_string(), "budget".to_string()]));
/// ```
pub fn matches(body_lower: &str, required_lower: &[String]) -> bool {
    required_lower
        .iter()
        .all(|needle| body_lower.contains(needle.as_str()))
}

/// The set of substrings a note body must contain, stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCriteria {
    original: Vec<String>,
    lowered: Vec<String>,
}

impl MatchCriteria {
    /// Builds criteria from the substrings as the user typed them.
    ///
    /// Order is preserved; it only affects how early a mismatch is detected.
    pub fn new<I, S>(substrings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let original: Vec<String> = substrings.into_iter().map(Into::into).collect();
        let lowered = original.iter().map(|s| s.to_lowercase()).collect();
        Self { original, lowered }
    }

    /// True when no substrings were given.
    pub fn is_empty(&self) -> bool {
        self.lowered.is_empty()
    }

    /// The substrings in their original casing.
    pub fn substrings(&self) -> &[String] {
        &self.original
    }

    /// Checks a note body, lower-casing a copy of it first.
    pub fn matches_body(&self, body: &str) -> bool {
        matches(&body.to_lowercase(), &self.lowered)
    }
}
