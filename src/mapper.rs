//! Reconciliation of reaction atom maps against the external matcher.
//!
//! Manually entered map numbers must survive a re-match. The matcher only
//! understands atomic numbers, so before the call every manually mapped atom
//! in the reaction *view* is re-labeled with a synthetic element derived from
//! its map number; the matcher then has to pair those atoms consistently
//! instead of reassigning them. The encoding never touches the parent graph,
//! which is why a failed match cannot corrupt it — the next fragment sync
//! rebuilds the view from the parent and the sentinels vanish.

use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::Bond;
use crate::mol::Mol;
use crate::reaction::Reaction;

/// Base of the synthetic element range: a protected atom with map number `n`
/// is encoded as atomic number `SENTINEL_BASE + n`.
///
/// The range overlaps the heaviest real elements; the original editor shares
/// this flaw and downstream matchers tolerate it because sketches do not
/// contain mendelevium.
pub const SENTINEL_BASE: u16 = 100;

/// Re-labels every manually mapped atom (`map_no > 0`) of the reaction view
/// with its sentinel element.
pub fn protect_manual_maps(rxn: &mut Reaction) {
    for i in 0..rxn.molecule_count() {
        let mol = rxn.molecule_mut(i);
        for idx in mol.atoms().collect::<Vec<_>>() {
            let map_no = mol.atom(idx).map_no;
            if map_no > 0 {
                mol.atom_mut(idx).atomic_num = SENTINEL_BASE + map_no;
            }
        }
    }
}

/// Writes the matcher's result back into the parent graph.
///
/// `matched` holds one molecule per fragment, atoms in parent order within
/// each fragment; `fragment_no` links the two sides. Two passes:
///
/// 1. sentinel-carrying atoms restore their manual map number, and the
///    largest restored number becomes the offset;
/// 2. atoms the matcher newly mapped get their number shifted by the offset,
///    so fresh mappings never collide with restored manual ones.
pub fn reconcile_maps(
    mol: &mut Mol<Atom, Bond>,
    fragment_no: &[usize],
    matched: &Reaction,
) {
    debug_assert_eq!(fragment_no.len(), mol.atom_count());

    let mut offset = 0u16;
    let mut cursor = vec![0usize; matched.molecule_count()];
    for atom in 0..mol.atom_count() {
        let fragment = fragment_no[atom];
        let counterpart = matched.molecule(fragment).atom(NodeIndex::new(cursor[fragment]));
        if counterpart.atomic_num > SENTINEL_BASE {
            let restored = counterpart.atomic_num - SENTINEL_BASE;
            mol.atom_mut(NodeIndex::new(atom)).map_no = restored;
            offset = offset.max(restored);
        }
        cursor[fragment] += 1;
    }

    let mut cursor = vec![0usize; matched.molecule_count()];
    for atom in 0..mol.atom_count() {
        let fragment = fragment_no[atom];
        let counterpart = matched.molecule(fragment).atom(NodeIndex::new(cursor[fragment]));
        if counterpart.map_no > 0 && counterpart.atomic_num <= SENTINEL_BASE {
            mol.atom_mut(NodeIndex::new(atom)).map_no = counterpart.map_no + offset;
        }
        cursor[fragment] += 1;
    }
}
