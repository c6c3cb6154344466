//! Python binding layer for Lento split analysis.
//!
//! Provides Python functions for computing split support and conflict
//! from NEXUS files, in-memory matrices and Newick trees.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::HashMap;

use crate::error::LentoError;
use crate::io::read_nexus_matrix;
use crate::lento::{Analysis, Lento, Matrix};
use crate::split::Split;
use crate::tree::splits_from_newick;

fn to_py_err(e: LentoError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn rows(splits: impl Iterator<Item = Split>) -> Vec<(String, usize, usize)> {
    splits.map(|s| (s.label(), s.support(), s.conflict())).collect()
}

fn ranked(analysis: &Analysis) -> Vec<(String, usize, usize)> {
    rows(analysis.iter_splits().cloned())
}

/// Compute the Lento report for a NEXUS file.
///
/// Args:
///     path: Path to a NEXUS file with a DATA or CHARACTERS block
///
/// Returns:
///     The tab-separated report: rank, support, conflict, normalised conflict, split
///
/// Raises:
///     ValueError: If the file cannot be read, the matrix is malformed,
///     or no split conflicts with another (normalisation undefined)
#[pyfunction]
fn lento_report(path: String) -> PyResult<String> {
    let matrix = read_nexus_matrix(&path).map_err(to_py_err)?;
    let lento = Lento::new(matrix).map_err(to_py_err)?;
    lento.analysis().write().map_err(to_py_err)
}

/// Compute ranked splits for an in-memory matrix.
///
/// Args:
///     matrix: Dict mapping taxon name to a list of state symbols
///
/// Returns:
///     A list of (split_label, support, conflict) tuples, highest support first
///
/// Raises:
///     ValueError: If the matrix is empty or ragged
#[pyfunction]
fn ranked_splits(matrix: HashMap<String, Vec<String>>) -> PyResult<Vec<(String, usize, usize)>> {
    let matrix: Matrix = matrix.into_iter().collect();
    let lento = Lento::new(matrix).map_err(to_py_err)?;
    Ok(ranked(lento.analysis()))
}

/// Splits displayed by a Newick tree, one per node.
///
/// Args:
///     newick: A Newick tree string
///
/// Returns:
///     A list of (split_label, support, conflict) tuples, support 1 and conflict 0
///
/// Raises:
///     ValueError: If the string is not a tree or a leaf is unnamed
#[pyfunction]
fn tree_splits(newick: String) -> PyResult<Vec<(String, usize, usize)>> {
    let splits = splits_from_newick(&newick).map_err(to_py_err)?;
    Ok(rows(splits.into_iter()))
}

/// Python module definition
#[pymodule]
fn lento_splits(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(lento_report, m)?)?;
    m.add_function(wrap_pyfunction!(ranked_splits, m)?)?;
    m.add_function(wrap_pyfunction!(tree_splits, m)?)?;
    Ok(())
}
