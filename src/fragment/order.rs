use crate::mode::SideRule;
use crate::mol::Mol;
use crate::traits::{HasAtomicNum, HasPosition2D};
use petgraph::graph::NodeIndex;

/// Per-fragment center of gravity, indexed by fragment id.
///
/// Fragments without atoms keep `[0, 0]`; the partition step never produces
/// one, but the sorter must not divide by zero if handed one.
fn fragment_centers<A: HasPosition2D, B>(
    mol: &Mol<A, B>,
    fragment_no: &[usize],
    fragments: usize,
) -> Vec<[f64; 2]> {
    let mut cog = vec![[0.0f64; 2]; fragments];
    let mut atoms = vec![0usize; fragments];
    for idx in mol.atoms() {
        let p = mol.atom(idx).position();
        let f = fragment_no[idx.index()];
        cog[f][0] += p[0];
        cog[f][1] += p[1];
        atoms[f] += 1;
    }
    for (c, &n) in cog.iter_mut().zip(atoms.iter()) {
        if n > 0 {
            c[0] /= n as f64;
            c[1] /= n as f64;
        }
    }
    cog
}

/// Assigns each fragment a side under `rule` and sorts fragments into their
/// display order.
///
/// Side 0 fragments (reactants, cores) come first, then side 1 (products,
/// R-groups); within a side, fragments order by the sum of their center
/// coordinates. The coordinate sum only approximates left-to-right but is
/// deterministic, which is what display and serialization need.
///
/// `fragment_no` is remapped in place to the sorted order. Returns the number
/// of side-0 fragments; under [`SideRule::None`] every fragment counts.
pub fn sort_fragments_by_position<A, B>(
    mol: &Mol<A, B>,
    fragment_no: &mut [usize],
    fragments: usize,
    rule: SideRule,
) -> usize
where
    A: HasPosition2D + HasAtomicNum,
{
    debug_assert_eq!(fragment_no.len(), mol.atom_count());

    let cog = fragment_centers(mol, fragment_no, fragments);
    let mut side = vec![0u8; fragments];

    let reactant_count = match rule {
        SideRule::None => fragments,
        SideRule::ByPosition { half_width } => {
            let mut count = 0;
            for fragment in 0..fragments {
                if cog[fragment][0] > half_width {
                    side[fragment] = 1;
                } else {
                    count += 1;
                }
            }
            count
        }
        SideRule::ByWildcard => {
            let mut count = fragments;
            // The first wildcard claims its fragment for the R-group side;
            // further wildcards in the same fragment change nothing.
            for idx in mol.atoms() {
                let f = fragment_no[idx.index()];
                if mol.atom(idx).atomic_num() == crate::atom::ANY_ATOM && side[f] == 0 {
                    side[f] = 1;
                    count -= 1;
                }
            }
            count
        }
    };

    let mut order: Vec<usize> = (0..fragments).collect();
    order.sort_by(|&a, &b| {
        side[a].cmp(&side[b]).then_with(|| {
            let sum_a = cog[a][0] + cog[a][1];
            let sum_b = cog[b][0] + cog[b][1];
            sum_a.partial_cmp(&sum_b).unwrap_or(std::cmp::Ordering::Equal)
        })
    });

    let mut new_index = vec![0usize; fragments];
    for (position, &old) in order.iter().enumerate() {
        new_index[old] = position;
    }
    for no in fragment_no.iter_mut() {
        *no = new_index[*no];
    }

    reactant_count
}

/// Nearest atom to `point`, within `max_distance`.
pub fn nearest_atom<A: HasPosition2D, B>(
    mol: &Mol<A, B>,
    point: [f64; 2],
    max_distance: f64,
) -> Option<NodeIndex> {
    let mut best = None;
    let mut best_distance = max_distance;
    for idx in mol.atoms() {
        let d = crate::geometry::distance(mol.atom(idx).position(), point);
        if d < best_distance {
            best_distance = d;
            best = Some(idx);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::bond::Bond;
    use crate::fragment::partition::number_fragments;

    fn add_pair(mol: &mut Mol<Atom, Bond>, atomic_num: u16, x: f64, y: f64) {
        let a = mol.add_atom(Atom::at(atomic_num, x, y));
        let b = mol.add_atom(Atom::at(atomic_num, x + 1.0, y));
        mol.add_bond(a, b, Bond::default());
    }

    #[test]
    fn reaction_products_sort_after_reactants() {
        let mut mol: Mol<Atom, Bond> = Mol::new();
        // Drawn right-to-left: the product fragment first.
        add_pair(&mut mol, 6, 80.0, 10.0);
        add_pair(&mut mol, 6, 5.0, 10.0);
        let (mut fragment_no, fragments) = number_fragments(&mol);
        let reactants = sort_fragments_by_position(
            &mol,
            &mut fragment_no,
            fragments,
            SideRule::ByPosition { half_width: 50.0 },
        );
        assert_eq!(reactants, 1);
        assert_eq!(fragment_no, vec![1, 1, 0, 0]);
    }

    #[test]
    fn coordinate_sum_orders_within_side() {
        let mut mol: Mol<Atom, Bond> = Mol::new();
        add_pair(&mut mol, 6, 20.0, 0.0);
        add_pair(&mut mol, 6, 0.0, 0.0);
        add_pair(&mut mol, 6, 10.0, 0.0);
        let (mut fragment_no, fragments) = number_fragments(&mol);
        let reactants =
            sort_fragments_by_position(&mol, &mut fragment_no, fragments, SideRule::None);
        assert_eq!(reactants, 3);
        assert_eq!(fragment_no, vec![2, 2, 0, 0, 1, 1]);
    }

    #[test]
    fn wildcard_claims_fragment_once() {
        let mut mol: Mol<Atom, Bond> = Mol::new();
        add_pair(&mut mol, 6, 0.0, 0.0); // core
        // R-group fragment with two wildcards; must decrement once only.
        let a = mol.add_atom(Atom::at(0, 10.0, 0.0));
        let b = mol.add_atom(Atom::at(0, 11.0, 0.0));
        mol.add_bond(a, b, Bond::default());
        let (mut fragment_no, fragments) = number_fragments(&mol);
        let cores =
            sort_fragments_by_position(&mol, &mut fragment_no, fragments, SideRule::ByWildcard);
        assert_eq!(cores, 1);
        assert_eq!(fragment_no, vec![0, 0, 1, 1]);
    }

    #[test]
    fn wildcard_core_sorts_first_even_when_rightmost() {
        let mut mol: Mol<Atom, Bond> = Mol::new();
        add_pair(&mut mol, 0, 0.0, 0.0); // wildcard fragment, leftmost
        add_pair(&mut mol, 6, 50.0, 0.0); // core, rightmost
        let (mut fragment_no, fragments) = number_fragments(&mol);
        let cores =
            sort_fragments_by_position(&mol, &mut fragment_no, fragments, SideRule::ByWildcard);
        assert_eq!(cores, 1);
        // Core precedes R-group despite its larger coordinate sum.
        assert_eq!(fragment_no, vec![1, 1, 0, 0]);
    }

    #[test]
    fn sort_is_idempotent() {
        let mut mol: Mol<Atom, Bond> = Mol::new();
        add_pair(&mut mol, 6, 70.0, 0.0);
        add_pair(&mut mol, 6, 10.0, 0.0);
        let (mut fragment_no, fragments) = number_fragments(&mol);
        let rule = SideRule::ByPosition { half_width: 40.0 };
        sort_fragments_by_position(&mol, &mut fragment_no, fragments, rule);
        let first = fragment_no.clone();
        sort_fragments_by_position(&mol, &mut fragment_no, fragments, rule);
        assert_eq!(fragment_no, first);
    }

    #[test]
    fn nearest_atom_respects_max_distance() {
        let mut mol: Mol<Atom, Bond> = Mol::new();
        mol.add_atom(Atom::at(6, 0.0, 0.0));
        mol.add_atom(Atom::at(6, 10.0, 0.0));
        assert_eq!(
            nearest_atom(&mol, [9.0, 0.0], 5.0),
            Some(NodeIndex::new(1))
        );
        assert_eq!(nearest_atom(&mol, [100.0, 0.0], 5.0), None);
    }
}
