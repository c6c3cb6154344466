//! Crate root: lightweight module orchestration and public re-exports.
//!
//! Modules:
//! - `split`: a single bipartition with support and conflict counts.
//! - `lento`: split derivation, conflict scan and ranked report for a matrix.
//! - `bitset`: compact bitset used as the canonical split signature.
//! - `tree`: splits displayed by a phylogenetic tree.
//! - `io`: reading NEXUS character matrices and writing reports.
//! - `plot`: Lento bar chart rendering.
//! - `error`: the shared error type.
//! - `api`: Python bindings via `pyo3` (gated behind "python" feature).

pub mod bitset;
pub mod error;
pub mod io;
pub mod lento;
pub mod plot;
pub mod split;
pub mod tree;

#[cfg(feature = "python")]
pub mod api;

// Re-export frequently used types & functions
pub use error::LentoError;
pub use io::{is_gzip_path, read_nexus_matrix, write_report};
pub use lento::{Analysis, Lento, Matrix, Summary};
pub use plot::{plot_lento, PlotOptions};
pub use split::Split;
pub use tree::{splits_from_newick, splits_from_tree};
