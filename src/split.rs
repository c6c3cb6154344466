//! A single bipartition of the taxon set with its support and conflict.
//!
//! A split only stores its informative side: the taxa sharing a character
//! state. The other side is implied by the full taxon set of the matrix.

use crate::error::LentoError;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// One observed split.
///
/// Equality compares taxa, support and conflict field by field. Ranking uses
/// [`Split::by_support`] only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Split {
    taxa: BTreeSet<String>,
    support: usize,
    conflict: usize,
}

impl Split {
    /// Creates a split with zero support and conflict.
    ///
    /// Duplicated taxon names collapse into one member.
    ///
    /// # Errors
    /// Returns [`LentoError::EmptySplit`] if `taxa` yields nothing.
    ///
    /// # Example
    /// ```
    /// # use lento_splits::Split;
    /// let s = Split::new(["b", "a", "b"]).unwrap();
    /// assert_eq!(s.ntaxa(), 2);
    /// assert_eq!(s.label(), "a:b");
    /// ```
    pub fn new<I, S>(taxa: I) -> Result<Self, LentoError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_counts(taxa, 0, 0)
    }

    /// Creates a split with final support and conflict counts.
    pub fn with_counts<I, S>(taxa: I, support: usize, conflict: usize) -> Result<Self, LentoError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let taxa: BTreeSet<String> = taxa.into_iter().map(Into::into).collect();
        if taxa.is_empty() {
            return Err(LentoError::EmptySplit);
        }
        Ok(Split { taxa, support, conflict })
    }

    /// Builds a split from a taxon set already known to be non-empty.
    pub(crate) fn from_parts(taxa: BTreeSet<String>, support: usize, conflict: usize) -> Self {
        debug_assert!(!taxa.is_empty());
        Split { taxa, support, conflict }
    }

    /// Taxa on the informative side, in sorted order.
    pub fn taxa(&self) -> impl Iterator<Item = &str> {
        self.taxa.iter().map(String::as_str)
    }

    pub fn contains(&self, taxon: &str) -> bool {
        self.taxa.contains(taxon)
    }

    pub fn ntaxa(&self) -> usize {
        self.taxa.len()
    }

    pub fn support(&self) -> usize {
        self.support
    }

    pub fn conflict(&self) -> usize {
        self.conflict
    }

    /// Sorted taxa joined by `:`.
    pub fn label(&self) -> String {
        self.taxa.iter().map(String::as_str).collect::<Vec<_>>().join(":")
    }

    /// True when the two splits are incompatible.
    ///
    /// With the taxon sets ordered by size, the splits are compatible when the
    /// smaller one is nested in the bigger one or shares none of its taxa.
    /// Any partial overlap is a conflict. Equal sizes may be taken in either
    /// order: the outcome is the same.
    ///
    /// # Example
    /// ```
    /// # use lento_splits::Split;
    /// let ab = Split::new(["a", "b"]).unwrap();
    /// assert!(!ab.is_conflicting(&Split::new(["a", "b", "c", "d"]).unwrap()));
    /// assert!(!ab.is_conflicting(&Split::new(["c", "d"]).unwrap()));
    /// assert!(ab.is_conflicting(&Split::new(["a", "c"]).unwrap()));
    /// ```
    pub fn is_conflicting(&self, other: &Split) -> bool {
        let (smaller, bigger) = if self.ntaxa() <= other.ntaxa() {
            (&self.taxa, &other.taxa)
        } else {
            (&other.taxa, &self.taxa)
        };
        if smaller.is_subset(bigger) {
            return false;
        }
        !smaller.is_disjoint(bigger)
    }

    /// Conflict rescaled by the analysis' normalising ratio.
    pub fn normalised(&self, ratio: f64) -> f64 {
        self.conflict as f64 * ratio
    }

    /// Ranking comparator: ascending by support, nothing else.
    ///
    /// Use `by_support(b, a)` with a stable sort for highest support first.
    pub fn by_support(a: &Split, b: &Split) -> Ordering {
        a.support.cmp(&b.support)
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, taxon) in self.taxa.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            f.write_str(taxon)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(taxa: &[&str]) -> Split {
        Split::new(taxa.iter().copied()).unwrap()
    }

    #[test]
    fn label_ignores_input_order() {
        assert_eq!(split(&["a", "b"]).label(), "a:b");
        assert_eq!(split(&["b", "a"]).label(), "a:b");
        assert_eq!(split(&["b", "a"]).to_string(), "a:b");
    }

    #[test]
    fn ntaxa_counts_members() {
        assert_eq!(split(&["a", "b", "c"]).ntaxa(), 3);
    }

    #[test]
    fn empty_split_is_rejected() {
        let err = Split::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, LentoError::EmptySplit));
    }

    #[test]
    fn equality_is_fieldwise() {
        assert_eq!(split(&["a", "b"]), split(&["a", "b"]));
        assert_ne!(
            Split::with_counts(["a", "b"], 1, 0).unwrap(),
            Split::with_counts(["a", "b"], 2, 0).unwrap()
        );
        assert_ne!(
            Split::with_counts(["a", "b"], 0, 1).unwrap(),
            Split::with_counts(["a", "b"], 0, 2).unwrap()
        );
        assert_ne!(split(&["a", "b"]), split(&["a", "c"]));
    }

    #[test]
    fn conflict_cases() {
        let s = split(&["a", "b"]);
        // singletons
        assert!(!s.is_conflicting(&split(&["a"])));
        assert!(!s.is_conflicting(&split(&["b"])));
        // another clade
        assert!(!s.is_conflicting(&split(&["c", "d"])));
        // nested
        assert!(!s.is_conflicting(&split(&["a", "b", "c", "d"])));
        // partial overlap, smaller and larger
        assert!(s.is_conflicting(&split(&["a", "c"])));
        assert!(s.is_conflicting(&split(&["a", "c", "d", "e", "f", "g"])));
    }

    #[test]
    fn equal_sizes_conflict_in_either_order() {
        let ab = split(&["a", "b"]);
        let bc = split(&["b", "c"]);
        let cd = split(&["c", "d"]);
        assert!(ab.is_conflicting(&bc));
        assert!(bc.is_conflicting(&ab));
        assert!(!ab.is_conflicting(&cd));
        assert!(!cd.is_conflicting(&ab));
        assert!(!ab.is_conflicting(&ab.clone()));
    }

    #[test]
    fn ranking_by_support() {
        let s1 = Split::with_counts(["a", "b"], 1, 9).unwrap();
        let s2 = Split::with_counts(["a", "c"], 2, 0).unwrap();
        let s3 = Split::with_counts(["c", "d"], 4, 1).unwrap();
        assert_eq!(Split::by_support(&s1, &s2), Ordering::Less);
        assert_eq!(Split::by_support(&s3, &s2), Ordering::Greater);

        let mut v = vec![s2.clone(), s1.clone(), s3.clone()];
        v.sort_by(Split::by_support);
        assert_eq!(v, vec![s1.clone(), s2.clone(), s3.clone()]);
        v.sort_by(|a, b| Split::by_support(b, a));
        assert_eq!(v, vec![s3, s2, s1]);
    }

    #[test]
    fn normalised_scales_conflict() {
        let s = Split::with_counts(["a"], 3, 4).unwrap();
        assert_eq!(s.normalised(0.5), 2.0);
    }
}
