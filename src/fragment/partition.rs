use crate::mol::Mol;

/// Numbers the connected components of `mol` by bond adjacency.
///
/// Returns the per-atom component id array and the component count.
/// Components are numbered in order of their lowest atom index, so the
/// numbering is deterministic for a given graph. A bond-free atom forms its
/// own singleton component.
pub fn number_fragments<A, B>(mol: &Mol<A, B>) -> (Vec<usize>, usize) {
    let n = mol.atom_count();
    let mut fragment_no = vec![usize::MAX; n];
    let mut fragments = 0usize;
    for start in mol.atoms() {
        if fragment_no[start.index()] != usize::MAX {
            continue;
        }
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if fragment_no[current.index()] != usize::MAX {
                continue;
            }
            fragment_no[current.index()] = fragments;
            for neighbor in mol.neighbors(current) {
                if fragment_no[neighbor.index()] == usize::MAX {
                    stack.push(neighbor);
                }
            }
        }
        fragments += 1;
    }
    (fragment_no, fragments)
}
