//! Fragment analysis: partitioning the sketch into connected components,
//! grouping components that are drawn as one chemical unit, ordering them
//! for display, and extracting standalone per-fragment graphs.

pub mod merge;
pub mod order;
pub mod partition;

pub use merge::{join_close_fragments, GROUPING_DISTANCE};
pub use order::{nearest_atom, sort_fragments_by_position};
pub use partition::number_fragments;

use crate::mol::Mol;
use petgraph::graph::NodeIndex;

/// Copies each fragment of `mol` into a standalone graph.
///
/// Atoms keep their parent order within each fragment, so parent atom `i` of
/// fragment `f` is the `k`-th atom of `fragments[f]` where `k` counts the
/// earlier parent atoms of the same fragment. The reconciliation passes of
/// the reaction mapper walk both sides through that correspondence.
pub fn extract_fragments<A: Clone, B: Clone>(
    mol: &Mol<A, B>,
    fragment_no: &[usize],
    fragments: usize,
) -> Vec<Mol<A, B>> {
    debug_assert_eq!(fragment_no.len(), mol.atom_count());

    let mut result: Vec<Mol<A, B>> = (0..fragments).map(|_| Mol::new()).collect();
    let mut local = vec![NodeIndex::new(0); mol.atom_count()];
    for idx in mol.atoms() {
        let f = fragment_no[idx.index()];
        local[idx.index()] = result[f].add_atom(mol.atom(idx).clone());
    }
    for edge in mol.bonds() {
        if let Some((a, b)) = mol.bond_endpoints(edge) {
            let f = fragment_no[a.index()];
            debug_assert_eq!(
                f,
                fragment_no[b.index()],
                "bond endpoints must share a fragment"
            );
            result[f].add_bond(local[a.index()], local[b.index()], mol.bond(edge).clone());
        }
    }
    result
}
