use crate::geometry::{average_bond_length, distance};
use crate::mol::Mol;
use crate::traits::HasPosition2D;
use petgraph::graph::NodeIndex;

/// Maximum distance, in average bond lengths, at which two disconnected
/// fragments are still grouped into one visual unit.
pub const GROUPING_DISTANCE: f64 = 1.4;

/// Joins fragments whose closest atoms sit within the grouping distance.
///
/// Salts and floating groups are drawn as graph-disconnected pieces that
/// belong to one chemical unit; proximity decides. `fragment_no` is remapped
/// in place to compacted ids and the reduced fragment count is returned.
///
/// With fewer than two fragments this is a no-op. A graph without bonds has
/// no average bond length to scale by; the threshold then falls back to one
/// coordinate unit so grouping cannot silently turn itself off.
pub fn join_close_fragments<A: HasPosition2D, B>(
    mol: &Mol<A, B>,
    fragment_no: &mut [usize],
    fragments: usize,
) -> usize {
    if fragments < 2 {
        return fragments;
    }
    debug_assert_eq!(fragment_no.len(), mol.atom_count());

    // Lower-triangular adjacency over fragment ids: row i holds i entries,
    // the pair always directed toward the smaller id.
    let mut merge_pairs: Vec<Vec<bool>> = (0..fragments).map(|i| vec![false; i]).collect();

    let avbl = average_bond_length(mol);
    let threshold = if avbl > 0.0 {
        GROUPING_DISTANCE * avbl
    } else {
        1.0
    };

    let n = mol.atom_count();
    for atom1 in 1..n {
        for atom2 in 0..atom1 {
            let p1 = mol.atom(NodeIndex::new(atom1)).position();
            let p2 = mol.atom(NodeIndex::new(atom2)).position();
            if distance(p1, p2) < threshold {
                let fragment1 = fragment_no[atom1];
                let fragment2 = fragment_no[atom2];
                if fragment1 > fragment2 {
                    merge_pairs[fragment1][fragment2] = true;
                } else if fragment2 > fragment1 {
                    merge_pairs[fragment2][fragment1] = true;
                }
            }
        }
    }

    let mut new_index: Vec<usize> = (0..fragments).collect();
    let mut merge_count = 0usize;
    for i in 1..fragments {
        for j in 0..i {
            if !merge_pairs[i][j] {
                continue;
            }
            let index1 = new_index[i];
            let index2 = new_index[j];
            if index1 == index2 {
                continue;
            }
            merge_count += 1;
            let min_index = index1.min(index2);
            let max_index = index1.max(index2);
            // Collapse max into min and close the id gap, so the surviving
            // ids stay dense without a separate relabeling pass.
            for entry in new_index.iter_mut() {
                if *entry == max_index {
                    *entry = min_index;
                } else if *entry > max_index {
                    *entry -= 1;
                }
            }
        }
    }

    for no in fragment_no.iter_mut() {
        *no = new_index[*no];
    }

    fragments - merge_count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::bond::Bond;
    use crate::fragment::partition::number_fragments;

    /// Two bonded atoms (one bond of length 1) at the given origin.
    fn add_pair(mol: &mut Mol<Atom, Bond>, x: f64, y: f64) {
        let a = mol.add_atom(Atom::at(6, x, y));
        let b = mol.add_atom(Atom::at(6, x + 1.0, y));
        mol.add_bond(a, b, Bond::default());
    }

    #[test]
    fn single_fragment_is_no_op() {
        let mut mol: Mol<Atom, Bond> = Mol::new();
        add_pair(&mut mol, 0.0, 0.0);
        let (mut fragment_no, fragments) = number_fragments(&mol);
        let merged = join_close_fragments(&mol, &mut fragment_no, fragments);
        assert_eq!(merged, 1);
        assert_eq!(fragment_no, vec![0, 0]);
    }

    #[test]
    fn close_fragments_merge() {
        let mut mol: Mol<Atom, Bond> = Mol::new();
        add_pair(&mut mol, 0.0, 0.0);
        // Closest atoms 0.5 bond lengths apart, well under 1.4.
        add_pair(&mut mol, 1.5, 0.0);
        let (mut fragment_no, fragments) = number_fragments(&mol);
        assert_eq!(fragments, 2);
        let merged = join_close_fragments(&mol, &mut fragment_no, fragments);
        assert_eq!(merged, 1);
        assert_eq!(fragment_no, vec![0, 0, 0, 0]);
    }

    #[test]
    fn distant_fragments_stay_apart() {
        let mut mol: Mol<Atom, Bond> = Mol::new();
        add_pair(&mut mol, 0.0, 0.0);
        add_pair(&mut mol, 4.0, 0.0);
        let (mut fragment_no, fragments) = number_fragments(&mol);
        let merged = join_close_fragments(&mol, &mut fragment_no, fragments);
        assert_eq!(merged, 2);
        assert_eq!(fragment_no, vec![0, 0, 1, 1]);
    }

    #[test]
    fn chained_merge_compacts_ids() {
        let mut mol: Mol<Atom, Bond> = Mol::new();
        add_pair(&mut mol, 0.0, 0.0); // fragment 0
        add_pair(&mut mol, 10.0, 0.0); // fragment 1, isolated
        add_pair(&mut mol, 1.5, 0.0); // fragment 2, close to 0
        let (mut fragment_no, fragments) = number_fragments(&mol);
        assert_eq!(fragments, 3);
        let merged = join_close_fragments(&mol, &mut fragment_no, fragments);
        assert_eq!(merged, 2);
        // Fragment 2 joined fragment 0; old fragment 1 compacts to id 1.
        assert_eq!(fragment_no, vec![0, 0, 1, 1, 0, 0]);
    }

    #[test]
    fn transitive_merge_counts_once_per_join() {
        let mut mol: Mol<Atom, Bond> = Mol::new();
        add_pair(&mut mol, 0.0, 0.0);
        add_pair(&mut mol, 1.5, 0.0);
        add_pair(&mut mol, 3.0, 0.0);
        let (mut fragment_no, fragments) = number_fragments(&mol);
        assert_eq!(fragments, 3);
        let merged = join_close_fragments(&mol, &mut fragment_no, fragments);
        assert_eq!(merged, 1);
        assert!(fragment_no.iter().all(|&f| f == 0));
    }

    #[test]
    fn bond_free_graph_uses_unit_threshold() {
        let mut mol: Mol<Atom, Bond> = Mol::new();
        mol.add_atom(Atom::at(11, 0.0, 0.0));
        mol.add_atom(Atom::at(17, 0.5, 0.0));
        mol.add_atom(Atom::at(8, 20.0, 0.0));
        let (mut fragment_no, fragments) = number_fragments(&mol);
        assert_eq!(fragments, 3);
        let merged = join_close_fragments(&mol, &mut fragment_no, fragments);
        assert_eq!(merged, 2);
        assert_eq!(fragment_no, vec![0, 0, 1]);
    }
}
