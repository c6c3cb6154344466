//! Lento split support and conflict analysis of a character matrix.
//!
//! # Algorithm
//! 1. Sort the taxa and map each taxon name to a bit index
//! 2. For every character column, group taxa by state (ignoring `0`, `?`, `-`)
//! 3. Each state group is one split; aggregate groups by their bitset and
//!    count one unit of support per producing column
//! 4. For every split, sum the support of all splits it conflicts with
//!
//! Step 4 compares every pair of observed splits, so it is O(k²) in the
//! number of distinct splits. It runs on an immutable table and is
//! parallelised with rayon.
//!
//! # Normalisation
//! A split can conflict with many others, so conflict totals can exceed
//! support. Following Lento et al. (1995), conflict is rescaled by the ratio
//! of total support to total conflict.

use crate::bitset::Bitset;
use crate::error::LentoError;
use crate::io::write_report;
use crate::split::Split;
use itertools::Itertools;
use rayon::prelude::*;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::OnceLock;

/// Taxon name → ordered state symbols.
pub type Matrix = BTreeMap<String, Vec<String>>;

/// Missing, inapplicable and absent states never define a split.
pub const STATES_TO_IGNORE: [&str; 3] = ["0", "?", "-"];

/// Number of possible splits for `ntaxa` taxa: 2^(n-1).
///
/// Saturates at `u128::MAX` beyond 128 taxa.
///
/// ```
/// # use lento_splits::lento::total_splits;
/// assert_eq!(total_splits(4), 8);
/// assert_eq!(total_splits(17), 65536);
/// ```
pub fn total_splits(ntaxa: usize) -> u128 {
    match ntaxa {
        0 => 0,
        n => u32::try_from(n - 1)
            .ok()
            .and_then(|shift| 1u128.checked_shl(shift))
            .unwrap_or(u128::MAX),
    }
}

/// The analyzer: owns a validated matrix and caches its analysis.
#[derive(Debug)]
pub struct Lento {
    matrix: Matrix,
    nchar: usize,
    analysis: OnceLock<Analysis>,
}

impl Lento {
    /// Validates the matrix and prepares the analyzer.
    ///
    /// # Errors
    /// - [`LentoError::EmptyMatrix`] if there are no taxa or no characters
    /// - [`LentoError::RaggedMatrix`] if state sequences differ in length
    pub fn new(matrix: Matrix) -> Result<Self, LentoError> {
        let nchar = match matrix.values().next() {
            Some(row) if !row.is_empty() => row.len(),
            _ => return Err(LentoError::EmptyMatrix),
        };
        if let Some((taxon, row)) = matrix.iter().find(|(_, row)| row.len() != nchar) {
            return Err(LentoError::RaggedMatrix {
                taxon: taxon.clone(),
                expected: nchar,
                found: row.len(),
            });
        }
        Ok(Lento { matrix, nchar, analysis: OnceLock::new() })
    }

    /// Convenience constructor from any iterable of rows.
    ///
    /// ```
    /// # use lento_splits::Lento;
    /// let lento = Lento::from_rows([("A", ["1", "0"]), ("B", ["1", "1"])]).unwrap();
    /// assert_eq!(lento.nchar(), 2);
    /// ```
    pub fn from_rows<I, T, R, S>(rows: I) -> Result<Self, LentoError>
    where
        I: IntoIterator<Item = (T, R)>,
        T: Into<String>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let matrix = rows
            .into_iter()
            .map(|(taxon, row)| (taxon.into(), row.into_iter().map(Into::into).collect()))
            .collect();
        Self::new(matrix)
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Taxon names in sorted order; position `i` is bit `i` of every signature.
    pub fn taxa(&self) -> Vec<&str> {
        self.matrix.keys().map(String::as_str).collect()
    }

    pub fn ntaxa(&self) -> usize {
        self.matrix.len()
    }

    pub fn nchar(&self) -> usize {
        self.nchar
    }

    pub fn total_splits(&self) -> u128 {
        total_splits(self.ntaxa())
    }

    /// The analysis, computed on first access and cached afterwards.
    pub fn analysis(&self) -> &Analysis {
        self.analysis.get_or_init(|| self.analyze())
    }

    /// Runs a fresh analysis without touching the cache.
    pub fn analyze(&self) -> Analysis {
        let counted = self.count_support();
        let conflicts = conflict_scan(&counted);
        Analysis::build(self.taxa().into_iter().map(String::from).collect(), counted, conflicts)
    }

    /// Aggregates column state groups into (signature, support) in the order
    /// each signature first appears.
    fn count_support(&self) -> Vec<(Bitset, usize)> {
        let words = self.ntaxa().div_ceil(64);
        let mut counted: Vec<(Bitset, usize)> = Vec::new();
        let mut index: HashMap<Bitset, usize> = HashMap::new();

        for col in 0..self.nchar {
            // state → taxa sharing it, in first-seen order over sorted taxa
            let mut groups: Vec<(&str, Bitset)> = Vec::new();
            for (taxon_idx, row) in self.matrix.values().enumerate() {
                let state = row[col].as_str();
                if STATES_TO_IGNORE.contains(&state) {
                    continue;
                }
                match groups.iter_mut().find(|(s, _)| *s == state) {
                    Some((_, bitset)) => bitset.set(taxon_idx),
                    None => groups.push((state, Bitset::from_indices(words, [taxon_idx]))),
                }
            }

            for (_, bitset) in groups {
                match index.entry(bitset) {
                    Entry::Occupied(e) => counted[*e.get()].1 += 1,
                    Entry::Vacant(e) => {
                        counted.push((e.key().clone(), 1));
                        e.insert(counted.len() - 1);
                    }
                }
            }
        }
        counted
    }
}

/// Conflict of every split: the summed support of the splits it is
/// incompatible with. Position `i` of the result belongs to `counted[i]`.
fn conflict_scan(counted: &[(Bitset, usize)]) -> Vec<usize> {
    counted
        .par_iter()
        .map(|(split, _)| {
            counted
                .iter()
                .filter(|(other, _)| split.conflicts_with(other))
                .map(|(_, support)| support)
                .sum::<usize>()
        })
        .collect()
}

/// Split counts reported by [`Analysis::summary`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    /// Possible splits, 2^(ntaxa-1)
    pub total: u128,
    /// Distinct observed splits
    pub observed: usize,
    /// Sum of support over all splits
    pub supported: usize,
    /// Sum of conflict over all splits
    pub conflicted: usize,
}

/// Immutable result of a Lento analysis.
#[derive(Debug, Clone)]
pub struct Analysis {
    taxa: Vec<String>,
    splits: Vec<Split>,
    index: HashMap<Bitset, usize>,
    normalising_ratio: Option<f64>,
}

impl Analysis {
    fn build(taxa: Vec<String>, counted: Vec<(Bitset, usize)>, conflicts: Vec<usize>) -> Self {
        let mut splits = Vec::with_capacity(counted.len());
        let mut index = HashMap::with_capacity(counted.len());

        for ((bitset, support), conflict) in counted.into_iter().zip(conflicts) {
            let members = bitset.ones().map(|i| taxa[i].clone()).collect();
            index.insert(bitset, splits.len());
            splits.push(Split::from_parts(members, support, conflict));
        }

        let supported: usize = splits.iter().map(Split::support).sum();
        let conflicted: usize = splits.iter().map(Split::conflict).sum();
        let normalising_ratio = (conflicted > 0).then(|| supported as f64 / conflicted as f64);

        Analysis { taxa, splits, index, normalising_ratio }
    }

    pub fn taxa(&self) -> &[String] {
        &self.taxa
    }

    /// Splits in derivation order (first producing column first).
    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    pub fn len(&self) -> usize {
        self.splits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }

    /// Looks up the split whose informative side is exactly `taxa`.
    ///
    /// # Errors
    /// [`LentoError::UnknownTaxon`] if a name is not part of the matrix.
    pub fn get<I, S>(&self, taxa: I) -> Result<Option<&Split>, LentoError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut bitset = Bitset::zeros(self.taxa.len().div_ceil(64));
        for taxon in taxa {
            let taxon = taxon.as_ref();
            let idx = self
                .taxa
                .binary_search_by(|t| t.as_str().cmp(taxon))
                .map_err(|_| LentoError::UnknownTaxon(taxon.to_string()))?;
            bitset.set(idx);
        }
        Ok(self.index.get(&bitset).map(|&i| &self.splits[i]))
    }

    /// Total support divided by total conflict.
    ///
    /// # Errors
    /// [`LentoError::NoConflict`] when no split conflicts with any other,
    /// e.g. for perfectly tree-like data.
    pub fn normalising_ratio(&self) -> Result<f64, LentoError> {
        self.normalising_ratio.ok_or(LentoError::NoConflict)
    }

    /// Splits by support, highest first; ties stay in derivation order.
    pub fn iter_splits(&self) -> impl Iterator<Item = &Split> {
        let mut ranked: Vec<&Split> = self.splits.iter().collect();
        ranked.sort_by(|a, b| Split::by_support(b, a));
        ranked.into_iter()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            total: total_splits(self.taxa.len()),
            observed: self.splits.len(),
            supported: self.splits.iter().map(Split::support).sum(),
            conflicted: self.splits.iter().map(Split::conflict).sum(),
        }
    }

    /// Tab-separated report, one ranked split per line:
    /// `rank, support, conflict, normalised conflict, label`.
    ///
    /// # Errors
    /// [`LentoError::NoConflict`] if the normalising ratio is undefined.
    pub fn write(&self) -> Result<String, LentoError> {
        let ratio = self.normalising_ratio()?;
        Ok(self
            .iter_splits()
            .enumerate()
            .map(|(i, s)| {
                format!(
                    "{}\t{}\t{}\t{:.6}\t{}",
                    i + 1,
                    s.support(),
                    s.conflict(),
                    s.normalised(ratio),
                    s
                )
            })
            .join("\n"))
    }

    /// Writes the report to `path`; a `.gz` suffix compresses it.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), LentoError> {
        let report = self.write()?;
        write_report(path, &report)?;
        Ok(())
    }
}
