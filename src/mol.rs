use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

/// Molecular graph: atoms as nodes, bonds as edges.
///
/// A thin wrapper over [`petgraph::graph::UnGraph`] that fixes the vocabulary
/// (atoms/bonds) and keeps the editor model independent of the concrete atom
/// and bond payloads. Atom and bond indices are dense `[0, count)` as long as
/// nothing is removed; the fragment pipeline relies on that.
pub struct Mol<A, B> {
    graph: UnGraph<A, B>,
}

impl<A, B> Mol<A, B> {
    pub fn new() -> Self {
        Self {
            graph: UnGraph::default(),
        }
    }

    pub fn graph(&self) -> &UnGraph<A, B> {
        &self.graph
    }

    pub fn atom(&self, idx: NodeIndex) -> &A {
        &self.graph[idx]
    }

    pub fn atom_mut(&mut self, idx: NodeIndex) -> &mut A {
        &mut self.graph[idx]
    }

    pub fn bond(&self, idx: EdgeIndex) -> &B {
        &self.graph[idx]
    }

    pub fn bond_mut(&mut self, idx: EdgeIndex) -> &mut B {
        &mut self.graph[idx]
    }

    pub fn add_atom(&mut self, atom: A) -> NodeIndex {
        self.graph.add_node(atom)
    }

    pub fn add_bond(&mut self, a: NodeIndex, b: NodeIndex, bond: B) -> EdgeIndex {
        self.graph.add_edge(a, b, bond)
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(idx)
    }

    pub fn bonds_of(&self, idx: NodeIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edges(idx).map(|e| e.id())
    }

    pub fn atoms(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn bonds(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    pub fn bond_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }

    pub fn clear(&mut self) {
        self.graph.clear();
    }
}

impl<A: Clone, B: Clone> Mol<A, B> {
    /// Appends all atoms and bonds of `other`, preserving their order.
    ///
    /// Returns the index offset at which the appended atoms start, so callers
    /// can translate `other`-relative indices into this graph.
    pub fn append(&mut self, other: &Mol<A, B>) -> usize {
        let offset = self.atom_count();
        for idx in other.atoms() {
            self.add_atom(other.atom(idx).clone());
        }
        for edge in other.bonds() {
            let (a, b) = other
                .bond_endpoints(edge)
                .expect("edge index came from the same graph");
            self.add_bond(
                NodeIndex::new(offset + a.index()),
                NodeIndex::new(offset + b.index()),
                other.bond(edge).clone(),
            );
        }
        offset
    }
}

impl<A: Clone, B: Clone> Clone for Mol<A, B> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
        }
    }
}

impl<A, B> Default for Mol<A, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: PartialEq, B: PartialEq> PartialEq for Mol<A, B> {
    fn eq(&self, other: &Self) -> bool {
        if self.atom_count() != other.atom_count() || self.bond_count() != other.bond_count() {
            return false;
        }
        for idx in self.atoms() {
            if self.atom(idx) != other.atom(idx) {
                return false;
            }
        }
        for idx in self.bonds() {
            if self.bond(idx) != other.bond(idx) {
                return false;
            }
            if self.bond_endpoints(idx) != other.bond_endpoints(idx) {
                return false;
            }
        }
        true
    }
}

impl<A: std::fmt::Debug, B: std::fmt::Debug> std::fmt::Debug for Mol<A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mol")
            .field("atom_count", &self.atom_count())
            .field("bond_count", &self.bond_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::bond::Bond;

    fn chain(n: usize) -> Mol<Atom, Bond> {
        let mut mol = Mol::new();
        let mut prev = None;
        for i in 0..n {
            let idx = mol.add_atom(Atom::at(6, i as f64, 0.0));
            if let Some(p) = prev {
                mol.add_bond(p, idx, Bond::default());
            }
            prev = Some(idx);
        }
        mol
    }

    #[test]
    fn append_offsets_bonds() {
        let mut mol = chain(2);
        let other = chain(3);
        let offset = mol.append(&other);
        assert_eq!(offset, 2);
        assert_eq!(mol.atom_count(), 5);
        assert_eq!(mol.bond_count(), 3);
        assert!(mol
            .bond_between(NodeIndex::new(2), NodeIndex::new(3))
            .is_some());
        assert!(mol
            .bond_between(NodeIndex::new(1), NodeIndex::new(2))
            .is_none());
    }

    #[test]
    fn clone_is_independent() {
        let mol = chain(3);
        let mut copy = mol.clone();
        copy.atom_mut(NodeIndex::new(0)).pos = [99.0, 99.0];
        assert_eq!(mol.atom(NodeIndex::new(0)).pos, [0.0, 0.0]);
        assert_ne!(mol, copy);
    }

    #[test]
    fn clear_empties() {
        let mut mol = chain(4);
        mol.clear();
        assert!(mol.is_empty());
        assert_eq!(mol.bond_count(), 0);
    }
}
