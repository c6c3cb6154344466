//! Error type shared by the matrix analysis, tree conversion, I/O and plotting.

use phylotree::tree::TreeError;
use std::io;
use thiserror::Error;

/// Everything that can go wrong while building or reporting a Lento analysis.
#[derive(Debug, Error)]
pub enum LentoError {
    /// The matrix has no taxa or no characters.
    #[error("matrix is empty: at least one taxon and one character are required")]
    EmptyMatrix,

    /// A taxon's state sequence does not match the character count.
    #[error("taxon '{taxon}' has {found} characters, expected {expected}")]
    RaggedMatrix {
        taxon: String,
        expected: usize,
        found: usize,
    },

    /// A split was built from an empty taxon collection.
    #[error("a split needs at least one taxon")]
    EmptySplit,

    /// Total conflict is zero, so conflict cannot be rescaled onto support.
    #[error("no conflicting splits: normalising ratio is undefined")]
    NoConflict,

    #[error("unknown taxon '{0}'")]
    UnknownTaxon(String),

    #[error("invalid tree: {0}")]
    Tree(#[from] TreeError),

    #[error("could not parse newick string: {0}")]
    Newick(String),

    /// Leaves must carry taxon names to become split members.
    #[error("leaf node {0} has no name")]
    UnnamedLeaf(usize),

    #[error("malformed NEXUS matrix: {0}")]
    Nexus(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("plotting failed: {0}")]
    Plot(String),
}
