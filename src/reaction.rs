use crate::atom::Atom;
use crate::bond::Bond;
use crate::mol::Mol;

/// A reaction view over the sketch: ordered reactant and product fragments.
///
/// Molecules index flat in reactant-then-product order, mirroring the
/// fragment order the sorter produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reaction {
    reactants: Vec<Mol<Atom, Bond>>,
    products: Vec<Mol<Atom, Bond>>,
}

impl Reaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_reactant(&mut self, mol: Mol<Atom, Bond>) {
        self.reactants.push(mol);
    }

    pub fn add_product(&mut self, mol: Mol<Atom, Bond>) {
        self.products.push(mol);
    }

    pub fn reactants(&self) -> &[Mol<Atom, Bond>] {
        &self.reactants
    }

    pub fn products(&self) -> &[Mol<Atom, Bond>] {
        &self.products
    }

    pub fn reactant_count(&self) -> usize {
        self.reactants.len()
    }

    pub fn molecule_count(&self) -> usize {
        self.reactants.len() + self.products.len()
    }

    /// The `i`-th molecule in reactant-then-product order.
    pub fn molecule(&self, i: usize) -> &Mol<Atom, Bond> {
        if i < self.reactants.len() {
            &self.reactants[i]
        } else {
            &self.products[i - self.reactants.len()]
        }
    }

    pub fn molecule_mut(&mut self, i: usize) -> &mut Mol<Atom, Bond> {
        if i < self.reactants.len() {
            &mut self.reactants[i]
        } else {
            let i = i - self.reactants.len();
            &mut self.products[i]
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reactants.is_empty() && self.products.is_empty()
    }
}

/// A Markush view: core scaffolds plus substitutable R-groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkushStructure {
    cores: Vec<Mol<Atom, Bond>>,
    r_groups: Vec<Mol<Atom, Bond>>,
}

impl MarkushStructure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_core(&mut self, mol: Mol<Atom, Bond>) {
        self.cores.push(mol);
    }

    pub fn add_r_group(&mut self, mol: Mol<Atom, Bond>) {
        self.r_groups.push(mol);
    }

    pub fn cores(&self) -> &[Mol<Atom, Bond>] {
        &self.cores
    }

    pub fn r_groups(&self) -> &[Mol<Atom, Bond>] {
        &self.r_groups
    }

    pub fn core_count(&self) -> usize {
        self.cores.len()
    }

    pub fn r_group_count(&self) -> usize {
        self.r_groups.len()
    }
}
