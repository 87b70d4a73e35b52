//! The set of course codes a caller wants to keep.

use std::collections::HashSet;

/// Course codes supplied by the caller.
///
/// Membership is exact string equality. No case folding or trimming is
/// applied, so `cs101` and `CS101` are different codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseCodes {
    codes: HashSet<String>,
}

impl CourseCodes {
    /// Parse a comma separated list such as `CS101,MA101`.
    ///
    /// Empty entries are skipped, so an empty list yields an empty set and
    /// every event carrying a course code is then excluded.
    pub fn from_csv(csv: &str) -> Self {
        csv.split(',').filter(|code| !code.is_empty()).collect()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for CourseCodes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        CourseCodes {
            codes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_csv_collapses_duplicates() {
        let codes = CourseCodes::from_csv("CS101,MA101,CS101");
        assert_eq!(codes.len(), 2);
        assert!(codes.contains("CS101"));
        assert!(codes.contains("MA101"));
    }

    #[test]
    fn test_from_csv_empty_is_empty_set() {
        let codes = CourseCodes::from_csv("");
        assert!(codes.is_empty());
        assert!(!codes.contains(""));
    }

    #[test]
    fn test_membership_is_exact() {
        let codes = CourseCodes::from_csv("CS101, MA101");
        assert!(codes.contains("CS101"));
        assert!(!codes.contains("cs101"));
        assert!(!codes.contains("MA101"));
        assert!(codes.contains(" MA101"));
    }
}
