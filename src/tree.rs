//! Convert a phylogenetic tree into the splits it displays.
//!
//! # Overview
//! Every node of a tree defines the set of leaves below it. Each such set is
//! reported as a split with support 1 and conflict 0, which lets a tree be
//! compared with (or plotted like) the splits observed in a matrix.
//!
//! For example `(A,((B,C),(D,(E,F))))` yields the six leaf singletons plus
//! `{B,C}`, `{E,F}`, `{D,E,F}`, `{B,C,D,E,F}` and the root clade.
//!
//! # Taxon names, not node IDs
//! Node IDs are assigned during parsing. Leaves are sorted by name and the
//! bit index follows that order, so identical taxa always map to the same
//! bit positions.

use crate::bitset::Bitset;
use crate::error::LentoError;
use crate::split::Split;
use phylotree::tree::Tree as PhyloTree;
use std::collections::HashMap;

/// Parse a Newick string and convert it with [`splits_from_tree`].
///
/// # Errors
/// [`LentoError::Newick`] if the string is not a valid tree.
pub fn splits_from_newick(newick: &str) -> Result<Vec<Split>, LentoError> {
    let tree = PhyloTree::from_newick(newick).map_err(|e| LentoError::Newick(e.to_string()))?;
    splits_from_tree(&tree)
}

/// One split per tree node (leaves, internal nodes and root), each with
/// support 1 and conflict 0, in post-order (children before parents).
///
/// # Errors
/// - [`LentoError::UnnamedLeaf`] if a leaf has no taxon name
/// - [`LentoError::Tree`] if the tree has no root or is malformed
pub fn splits_from_tree(tree: &PhyloTree) -> Result<Vec<Split>, LentoError> {
    // Step 1: Leaf names, sorted for a stable bit order
    let mut leaf_names: Vec<(usize, String)> = Vec::new();
    for leaf_id in tree.get_leaves() {
        let name = tree
            .get(&leaf_id)?
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .ok_or(LentoError::UnnamedLeaf(leaf_id))?;
        leaf_names.push((leaf_id, name));
    }
    leaf_names.sort_by(|a, b| a.1.cmp(&b.1));

    let words = leaf_names.len().div_ceil(64);

    // Step 2: node_id → bit index
    let leaf_index: HashMap<usize, usize> = leaf_names
        .iter()
        .enumerate()
        .map(|(idx, &(node_id, _))| (node_id, idx))
        .collect();

    // Step 3: DFS from the root, recording each node's leaf set
    let root_id = tree.get_root()?;
    let mut clades: Vec<Bitset> = Vec::new();
    collect_clades(root_id, tree, &leaf_index, words, &mut clades)?;

    Ok(clades
        .iter()
        .map(|clade| {
            let taxa = clade.ones().map(|i| leaf_names[i].1.clone()).collect();
            Split::from_parts(taxa, 1, 0)
        })
        .collect())
}

/// Post-order DFS.
///
/// - **Leaf node**: bitset with its own bit set
/// - **Internal node**: OR of all child bitsets
fn collect_clades(
    node_id: usize,
    tree: &PhyloTree,
    leaf_index: &HashMap<usize, usize>,
    words: usize,
    clades: &mut Vec<Bitset>,
) -> Result<Bitset, LentoError> {
    let node = tree.get(&node_id)?;

    let mut bitset = Bitset::zeros(words);
    if let Some(&idx) = leaf_index.get(&node_id) {
        bitset.set(idx);
    }
    for &child_id in &node.children {
        let child = collect_clades(child_id, tree, leaf_index, words, clades)?;
        bitset.or_assign(&child);
    }

    clades.push(bitset.clone());
    Ok(bitset)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ```text
    ///       root
    ///      /    \
    ///     A     node1
    ///           /   \
    ///          B     C
    /// ```
    ///
    /// Post-order: A, B, C, node1 {B,C}, root {A,B,C}
    #[test]
    fn small_tree_in_post_order() {
        let labels: Vec<String> = splits_from_newick("(A,(B,C));")
            .unwrap()
            .iter()
            .map(Split::label)
            .collect();
        assert_eq!(labels, vec!["A", "B", "C", "B:C", "A:B:C"]);
    }

    #[test]
    fn every_split_has_unit_support_and_no_conflict() {
        let splits = splits_from_newick("((A,B),(C,D));").unwrap();
        assert_eq!(splits.len(), 7);
        assert!(splits.iter().all(|s| s.support() == 1 && s.conflict() == 0));
    }

    #[test]
    fn unnamed_leaf_is_rejected() {
        let err = splits_from_newick("(A,(B,));").unwrap_err();
        assert!(matches!(err, LentoError::UnnamedLeaf(_) | LentoError::Newick(_)));
    }
}
