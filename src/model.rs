use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::atom::Atom;
use crate::bond::Bond;
use crate::engines::{Canonicalizer, LayoutEngine, MolCodec, ReactionMatcher};
use crate::fragment::{
    extract_fragments, join_close_fragments, nearest_atom, number_fragments,
    sort_fragments_by_position,
};
use crate::geometry::{center_of_gravity, scale_coords, translate_coords, Rect};
use crate::mapper::{protect_manual_maps, reconcile_maps};
use crate::mode::Mode;
use crate::mol::Mol;
use crate::notify::{ChangeNotifier, Observer};
use crate::reaction::{MarkushStructure, Reaction};
use crate::undo::UndoStack;

/// Maximum distance at which a click still selects a fragment.
pub const FRAGMENT_MAX_CLICK_DISTANCE: f64 = 24.0;

/// Distance within which a point hits an atom or bond.
pub const HIT_TOLERANCE: f64 = 5.0;

/// Callback invoked when the highlighted atom or bond changes; the flag is
/// `true` when the index gains the highlight and `false` when it loses it.
pub type AtomHighlightCallback = Box<dyn Fn(NodeIndex, bool)>;
pub type BondHighlightCallback = Box<dyn Fn(EdgeIndex, bool)>;

/// The editor model: one multi-component molecular sketch, its fragment
/// analysis, and the state the surrounding editor shells need.
///
/// The model owns the parent graph exclusively. External edits go through
/// [`mol_mut`](Model::mol_mut); after a geometry-changing edit the caller
/// runs [`analyze`](Model::analyze) (or the cheaper [`sync`](Model::sync)
/// when fragments cannot have regrouped) to rebuild the fragment list. The
/// returned fragment slice stays valid until the next analysis pass; the
/// [`generation`](Model::generation) counter tells callers when that
/// happened.
pub struct Model {
    mol: Mol<Atom, Bond>,
    fragments: Vec<Mol<Atom, Bond>>,
    fragment_no: Vec<usize>,
    reactant_count: usize,
    generation: u64,
    mode: Mode,
    display_size: [f64; 2],
    display_mode: u32,
    needs_layout: bool,
    undo: UndoStack<Mol<Atom, Bond>>,
    notifier: ChangeNotifier,
    highlighted_atom: Option<NodeIndex>,
    highlighted_bond: Option<EdgeIndex>,
    atom_highlight_callback: Option<AtomHighlightCallback>,
    bond_highlight_callback: Option<BondHighlightCallback>,
    key_stroke_buffer: String,
}

impl Model {
    pub fn new(mode: Mode) -> Self {
        Self {
            mol: Mol::new(),
            fragments: Vec::new(),
            fragment_no: Vec::new(),
            reactant_count: 0,
            generation: 0,
            mode,
            display_size: [0.0, 0.0],
            display_mode: 0,
            needs_layout: true,
            undo: UndoStack::new(),
            notifier: ChangeNotifier::new(),
            highlighted_atom: None,
            highlighted_bond: None,
            atom_highlight_callback: None,
            bond_highlight_callback: None,
            key_stroke_buffer: String::new(),
        }
    }

    // --- graph access -----------------------------------------------------

    pub fn mol(&self) -> &Mol<Atom, Bond> {
        &self.mol
    }

    /// Mutable access for external edits. The fragment analysis is stale
    /// afterwards until the caller runs [`analyze`](Model::analyze) or
    /// [`sync`](Model::sync).
    pub fn mol_mut(&mut self) -> &mut Mol<Atom, Bond> {
        &mut self.mol
    }

    /// Replaces the molecule wholesale and notifies change listeners.
    pub fn set_molecule(&mut self, mol: Mol<Atom, Bond>, needs_layout: bool) {
        self.mol = mol;
        self.needs_layout = needs_layout;
        self.notify_change();
    }

    pub fn new_molecule(&mut self) {
        self.set_molecule(Mol::new(), true);
    }

    // --- fragment analysis ------------------------------------------------

    /// Full fragment analysis: partition by connectivity, group fragments
    /// drawn close enough to be one unit, classify and order them.
    pub fn analyze(&mut self) {
        self.refresh_fragments(true);
        tracing::debug!(
            fragments = self.fragments.len(),
            reactants = self.reactant_count,
            "analyzed fragment membership"
        );
    }

    /// Re-derives fragment order and roles without re-grouping; enough when
    /// coordinates moved but nothing was drawn or deleted near a boundary.
    pub fn sync(&mut self) {
        self.refresh_fragments(false);
    }

    fn refresh_fragments(&mut self, merge: bool) {
        let (mut fragment_no, mut fragments) = number_fragments(&self.mol);
        if merge {
            fragments = join_close_fragments(&self.mol, &mut fragment_no, fragments);
        }
        let rule = self.mode.side_rule(self.display_size[0]);
        self.reactant_count =
            sort_fragments_by_position(&self.mol, &mut fragment_no, fragments, rule);
        self.fragments = extract_fragments(&self.mol, &fragment_no, fragments);
        self.fragment_no = fragment_no;
        self.generation += 1;
    }

    /// The fragments of the last analysis pass, in display order.
    pub fn fragments(&self) -> &[Mol<Atom, Bond>] {
        &self.fragments
    }

    /// Owning fragment index per parent atom.
    pub fn fragment_no(&self) -> &[usize] {
        &self.fragment_no
    }

    /// Number of side-0 fragments (reactants or cores) of the last pass.
    pub fn reactant_count(&self) -> usize {
        self.reactant_count
    }

    /// Monotonic counter bumped by every analysis pass; fragment slices
    /// obtained under an older generation are stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Installs an externally ordered fragment list as the new sketch.
    pub fn set_fragments(&mut self, fragments: Vec<Mol<Atom, Bond>>) {
        self.push_undo();
        self.mol.clear();
        self.fragment_no.clear();
        for (i, fragment) in fragments.iter().enumerate() {
            self.mol.append(fragment);
            self.fragment_no
                .extend(std::iter::repeat(i).take(fragment.atom_count()));
        }
        self.reactant_count = fragments.len();
        self.fragments = fragments;
        self.generation += 1;
        self.mode = Mode::multiple_fragments();
        self.notify_change();
    }

    // --- reaction / Markush views ----------------------------------------

    /// Rebuilds the sketch from a reaction; fragments keep the reaction's
    /// reactant-then-product order until the next analysis pass.
    pub fn set_reaction(&mut self, rxn: Reaction) {
        self.mol.clear();
        self.fragment_no.clear();
        self.reactant_count = rxn.reactant_count();
        let mut fragments = Vec::with_capacity(rxn.molecule_count());
        for i in 0..rxn.molecule_count() {
            let fragment = rxn.molecule(i).clone();
            self.mol.append(&fragment);
            self.fragment_no
                .extend(std::iter::repeat(i).take(fragment.atom_count()));
            fragments.push(fragment);
        }
        self.fragments = fragments;
        self.generation += 1;
        self.mode = Mode::reaction();
        self.notify_change();
    }

    /// The current reaction view, or `None` outside reaction mode. Syncs
    /// fragments first so side assignment reflects current coordinates.
    pub fn reaction(&mut self) -> Option<Reaction> {
        if !self.mode.is_reaction() {
            return None;
        }
        self.sync();
        let mut rxn = Reaction::new();
        for (i, fragment) in self.fragments.iter().enumerate() {
            if i < self.reactant_count {
                rxn.add_reactant(fragment.clone());
            } else {
                rxn.add_product(fragment.clone());
            }
        }
        Some(rxn)
    }

    pub fn set_markush_structure(&mut self, markush: MarkushStructure) {
        self.push_undo();
        self.mol.clear();
        self.fragment_no.clear();
        self.reactant_count = markush.core_count();
        let mut fragments = Vec::with_capacity(markush.core_count() + markush.r_group_count());
        for fragment in markush.cores().iter().chain(markush.r_groups()) {
            self.mol.append(fragment);
            self.fragment_no
                .extend(std::iter::repeat(fragments.len()).take(fragment.atom_count()));
            fragments.push(fragment.clone());
        }
        self.fragments = fragments;
        self.generation += 1;
        self.mode = Mode::markush();
        self.notify_change();
    }

    pub fn markush_structure(&self) -> Option<MarkushStructure> {
        if !self.mode.is_markush() {
            return None;
        }
        let mut markush = MarkushStructure::new();
        for (i, fragment) in self.fragments.iter().enumerate() {
            if i < self.reactant_count {
                markush.add_core(fragment.clone());
            } else {
                markush.add_r_group(fragment.clone());
            }
        }
        Some(markush)
    }

    // --- reaction mapping -------------------------------------------------

    /// One above the highest map number in use.
    pub fn next_map_no(&self) -> u16 {
        let used = self
            .mol
            .atoms()
            .map(|idx| self.mol.atom(idx).map_no)
            .max()
            .unwrap_or(0);
        used + 1
    }

    /// Interactive mapping gesture: the drag started on `atom` at `from` and
    /// ended at `to`. When the endpoints lie on different fragments on
    /// opposite sides of the reaction, `atom` and the atom nearest `to` get
    /// a fresh shared map number and the auto-mapper runs. Returns whether a
    /// mapping was assigned.
    pub fn map_atom_pair(
        &mut self,
        atom: NodeIndex,
        from: [f64; 2],
        to: [f64; 2],
        matcher: &dyn ReactionMatcher,
    ) -> bool {
        let source = self.fragment_index_at(from, false);
        let target = self.fragment_index_at(to, false);
        let (Some(source), Some(target)) = (source, target) else {
            return false;
        };
        if source == target || self.is_on_product_side(from) == self.is_on_product_side(to) {
            return false;
        }
        let Some(dest) = nearest_atom(&self.mol, to, FRAGMENT_MAX_CLICK_DISTANCE) else {
            return false;
        };
        let map_no = self.next_map_no();
        self.mol.atom_mut(atom).map_no = map_no;
        self.mol.atom_mut(dest).map_no = map_no;
        self.auto_map(matcher);
        true
    }

    /// Extends the atom mapping through the external matcher while keeping
    /// every manually assigned map number intact. Matcher failure leaves the
    /// mapping as it was; either way fragments are re-synced afterwards.
    pub fn auto_map(&mut self, matcher: &dyn ReactionMatcher) {
        let Some(mut rxn) = self.reaction() else {
            return;
        };
        protect_manual_maps(&mut rxn);
        match matcher.match_reaction(rxn) {
            Some(matched) => {
                debug_assert_eq!(
                    matched.molecule_count(),
                    self.fragments.len(),
                    "matcher must preserve the reaction shape"
                );
                reconcile_maps(&mut self.mol, &self.fragment_no, &matched);
                tracing::debug!("matcher extended atom mapping");
            }
            None => {
                tracing::debug!("matcher produced no atom mapping");
            }
        }
        self.sync();
        self.notify_change();
    }

    pub fn is_on_product_side(&self, point: [f64; 2]) -> bool {
        point[0] > self.display_size[0] / 2.0
    }

    // --- undo -------------------------------------------------------------

    /// Snapshots the current graph; call before a destructive edit.
    pub fn push_undo(&mut self) {
        self.undo.push(self.mol.clone());
    }

    /// Restores the most recent snapshot; a no-op on an empty history.
    pub fn pop_undo(&mut self) {
        if let Some(snapshot) = self.undo.pop() {
            tracing::debug!(atoms = snapshot.atom_count(), "restored undo snapshot");
            self.mol = snapshot;
            self.needs_layout = false;
            self.notify_change();
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    // --- coordinates ------------------------------------------------------

    /// Mirrors all atom coordinates about the center of gravity, along the
    /// x axis when `horizontal`, else along the y axis.
    pub fn flip(&mut self, horizontal: bool) {
        let Some(cog) = center_of_gravity(&self.mol) else {
            return;
        };
        translate_coords(&mut self.mol, -cog[0], -cog[1]);
        if horizontal {
            scale_coords(&mut self.mol, -1.0, 1.0);
        } else {
            scale_coords(&mut self.mol, 1.0, -1.0);
        }
        translate_coords(&mut self.mol, cog[0], cog[1]);
    }

    /// Uniform scale by the smaller of the two factors.
    pub fn scale(&mut self, dx: f64, dy: f64) {
        let s = dx.min(dy);
        scale_coords(&mut self.mol, s, s);
    }

    /// Regenerates and normalizes coordinates through the layout engine.
    ///
    /// With a partial selection, unselected atoms are marked fixed for the
    /// engine and the markers are cleared afterwards. In multi-fragment mode
    /// each fragment is normalized independently and the result is copied
    /// back into the parent graph.
    pub fn clean_coordinates(&mut self, layout: &dyn LayoutEngine) {
        let selected = self
            .mol
            .atoms()
            .filter(|&idx| self.mol.atom(idx).selected)
            .count();
        let selected_only = selected != 0 && selected != self.mol.atom_count();

        if !self.mode.has_multiple_fragments() {
            if selected_only {
                for idx in self.mol.atoms().collect::<Vec<_>>() {
                    let keep = !self.mol.atom(idx).selected;
                    self.mol.atom_mut(idx).marked = keep;
                }
            }
            layout.invent(&mut self.mol, selected_only);
            let rect = self.display_rect();
            layout.update_coords(&mut self.mol, Some(rect));
        } else {
            debug_assert_eq!(
                self.fragment_no.len(),
                self.mol.atom_count(),
                "multi-fragment layout needs a current analysis pass"
            );
            for fragment in &mut self.fragments {
                layout.update_coords(fragment, None);
            }
            let rect = self.display_rect();
            layout.update_coords(&mut self.mol, Some(rect));
            let mut cursor = vec![0usize; self.fragments.len()];
            for atom in 0..self.mol.atom_count() {
                let f = self.fragment_no[atom];
                let pos = self.fragments[f].atom(NodeIndex::new(cursor[f])).pos;
                self.mol.atom_mut(NodeIndex::new(atom)).pos = pos;
                cursor[f] += 1;
            }
        }

        if selected_only {
            for idx in self.mol.atoms().collect::<Vec<_>>() {
                self.mol.atom_mut(idx).marked = false;
            }
        }
    }

    // --- hit testing ------------------------------------------------------

    /// The fragment owning the atom nearest `point`, within the click
    /// distance.
    pub fn find_fragment(&self, point: [f64; 2]) -> Option<usize> {
        let mut best: Option<usize> = None;
        let mut best_distance = FRAGMENT_MAX_CLICK_DISTANCE;
        for idx in self.mol.atoms() {
            let d = crate::geometry::distance(self.mol.atom(idx).pos, point);
            if d < best_distance {
                best_distance = d;
                best = Some(self.fragment_no[idx.index()]);
            }
        }
        best
    }

    /// Index of the first fragment with an atom (or bond) under `point`.
    pub fn fragment_index_at(&self, point: [f64; 2], include_bonds: bool) -> Option<usize> {
        self.fragments
            .iter()
            .position(|fragment| hit_on(fragment, point, include_bonds))
    }

    pub fn fragment_at(&self, point: [f64; 2], include_bonds: bool) -> Option<&Mol<Atom, Bond>> {
        self.fragment_index_at(point, include_bonds)
            .map(|i| &self.fragments[i])
    }

    /// Whether `point` hits any atom (or bond) of the sketch.
    pub fn hit_test(&self, point: [f64; 2], include_bonds: bool) -> bool {
        hit_on(&self.mol, point, include_bonds)
    }

    // --- text round-trips -------------------------------------------------

    /// Parses `text` through `codec` and installs the result. A parse error
    /// leaves the current sketch untouched.
    pub fn set_from_text<C: MolCodec>(&mut self, codec: &C, text: &str) -> Result<(), C::Error> {
        let mol = codec.parse(text)?;
        self.set_molecule(mol, true);
        Ok(())
    }

    pub fn to_text<C: MolCodec>(&self, codec: &C) -> String {
        codec.write(&self.mol)
    }

    /// Canonical id plus encoded coordinates, `None` for an empty sketch.
    pub fn id_code(&self, canonicalizer: &dyn Canonicalizer) -> Option<String> {
        if self.mol.is_empty() {
            return None;
        }
        canonicalizer
            .canonicalize(&self.mol)
            .map(|form| format!("{} {}", form.id_code, form.coordinates))
    }

    // --- selection --------------------------------------------------------

    /// Copy of the selected subgraph, `None` when nothing is selected.
    pub fn selected_copy(&self) -> Option<Mol<Atom, Bond>> {
        selected_copy(&self.mol)
    }

    /// Reaction assembled from the selected part of each fragment.
    pub fn selected_reaction(&self) -> Reaction {
        let mut rxn = Reaction::new();
        for (i, fragment) in self.fragments.iter().enumerate() {
            if let Some(copy) = selected_copy(fragment) {
                if i < self.reactant_count {
                    rxn.add_reactant(copy);
                } else {
                    rxn.add_product(copy);
                }
            }
        }
        rxn
    }

    // --- highlight --------------------------------------------------------

    pub fn highlighted_atom(&self) -> Option<NodeIndex> {
        self.highlighted_atom
    }

    pub fn set_highlighted_atom(&mut self, atom: Option<NodeIndex>) {
        if self.highlighted_atom != atom {
            if let Some(callback) = &self.atom_highlight_callback {
                match atom {
                    Some(gained) => callback(gained, true),
                    None => {
                        if let Some(lost) = self.highlighted_atom {
                            callback(lost, false);
                        }
                    }
                }
            }
        }
        self.highlighted_atom = atom;
    }

    pub fn highlighted_bond(&self) -> Option<EdgeIndex> {
        self.highlighted_bond
    }

    pub fn set_highlighted_bond(&mut self, bond: Option<EdgeIndex>) {
        if self.highlighted_bond != bond {
            if let Some(callback) = &self.bond_highlight_callback {
                match bond {
                    Some(gained) => callback(gained, true),
                    None => {
                        if let Some(lost) = self.highlighted_bond {
                            callback(lost, false);
                        }
                    }
                }
            }
        }
        self.highlighted_bond = bond;
    }

    pub fn register_atom_highlight_callback(&mut self, callback: AtomHighlightCallback) {
        self.atom_highlight_callback = Some(callback);
    }

    pub fn register_bond_highlight_callback(&mut self, callback: BondHighlightCallback) {
        self.bond_highlight_callback = Some(callback);
    }

    // --- listeners --------------------------------------------------------

    pub fn add_change_listener(&self, observer: Observer) {
        self.notifier.changed().register(observer);
    }

    pub fn remove_change_listener(&self, observer: &Observer) {
        self.notifier.changed().unregister(observer);
    }

    pub fn add_validation_listener(&self, observer: Observer) {
        self.notifier.invalidated().register(observer);
    }

    pub fn remove_validation_listener(&self, observer: &Observer) {
        self.notifier.invalidated().unregister(observer);
    }

    pub fn notify_change(&self) {
        self.notifier.notify_change();
    }

    pub fn value_invalidated(&self) {
        self.notifier.notify_invalidated();
    }

    // --- mode, display, keystrokes ---------------------------------------

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn display_size(&self) -> [f64; 2] {
        self.display_size
    }

    pub fn set_display_size(&mut self, width: f64, height: f64) {
        self.display_size = [width, height];
    }

    fn display_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.display_size[0], self.display_size[1])
    }

    pub fn display_mode(&self) -> u32 {
        self.display_mode
    }

    pub fn set_display_mode(&mut self, display_mode: u32) {
        self.display_mode = display_mode;
        self.notify_change();
    }

    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    pub fn set_needs_layout(&mut self, needs_layout: bool) {
        self.needs_layout = needs_layout;
    }

    pub fn key_stroke_buffer(&self) -> &str {
        &self.key_stroke_buffer
    }

    pub fn key_stroke_buffer_mut(&mut self) -> &mut String {
        &mut self.key_stroke_buffer
    }
}

fn hit_on(mol: &Mol<Atom, Bond>, point: [f64; 2], include_bonds: bool) -> bool {
    for idx in mol.atoms() {
        if crate::geometry::distance(mol.atom(idx).pos, point) < HIT_TOLERANCE {
            return true;
        }
    }
    if include_bonds {
        for edge in mol.bonds() {
            if let Some((a, b)) = mol.bond_endpoints(edge) {
                let d = crate::geometry::point_segment_distance(
                    point,
                    mol.atom(a).pos,
                    mol.atom(b).pos,
                );
                if d < HIT_TOLERANCE {
                    return true;
                }
            }
        }
    }
    false
}

fn selected_copy(mol: &Mol<Atom, Bond>) -> Option<Mol<Atom, Bond>> {
    let selected: Vec<NodeIndex> = mol
        .atoms()
        .filter(|&idx| mol.atom(idx).selected)
        .collect();
    if selected.is_empty() {
        return None;
    }
    let mut copy = Mol::new();
    let mut local = vec![None; mol.atom_count()];
    for &idx in &selected {
        local[idx.index()] = Some(copy.add_atom(mol.atom(idx).clone()));
    }
    for edge in mol.bonds() {
        if let Some((a, b)) = mol.bond_endpoints(edge) {
            if let (Some(la), Some(lb)) = (local[a.index()], local[b.index()]) {
                copy.add_bond(la, lb, mol.bond(edge).clone());
            }
        }
    }
    Some(copy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn add_pair(model: &mut Model, atomic_num: u16, x: f64, y: f64) {
        let mol = model.mol_mut();
        let a = mol.add_atom(Atom::at(atomic_num, x, y));
        let b = mol.add_atom(Atom::at(atomic_num, x + 1.0, y));
        mol.add_bond(a, b, Bond::default());
    }

    #[test]
    fn next_map_no_skips_used_numbers() {
        let mut model = Model::new(Mode::reaction());
        add_pair(&mut model, 6, 0.0, 0.0);
        assert_eq!(model.next_map_no(), 1);
        model.mol_mut().atom_mut(n(1)).map_no = 7;
        assert_eq!(model.next_map_no(), 8);
    }

    #[test]
    fn reaction_requires_reaction_mode() {
        let mut model = Model::new(Mode::multiple_fragments());
        add_pair(&mut model, 6, 0.0, 0.0);
        assert!(model.reaction().is_none());
        assert!(model.markush_structure().is_none());
    }

    #[test]
    fn set_reaction_installs_fragments_and_mode() {
        let mut model = Model::new(Mode::molecule());
        let mut rxn = Reaction::new();
        let mut reactant = Mol::new();
        reactant.add_atom(Atom::at(6, 1.0, 1.0));
        rxn.add_reactant(reactant);
        let mut product = Mol::new();
        product.add_atom(Atom::at(8, 9.0, 1.0));
        rxn.add_product(product);

        model.set_reaction(rxn);
        assert!(model.mode().is_reaction());
        assert_eq!(model.fragments().len(), 2);
        assert_eq!(model.reactant_count(), 1);
        assert_eq!(model.fragment_no(), &[0, 1]);
        assert_eq!(model.mol().atom_count(), 2);
    }

    #[test]
    fn markush_round_trip() {
        let mut model = Model::new(Mode::molecule());
        model.set_display_size(100.0, 100.0);
        let mut markush = MarkushStructure::new();
        let mut core = Mol::new();
        core.add_atom(Atom::at(6, 0.0, 0.0));
        markush.add_core(core);
        let mut r_group = Mol::new();
        r_group.add_atom(Atom::at(0, 10.0, 0.0));
        markush.add_r_group(r_group);

        model.set_markush_structure(markush);
        assert!(model.mode().is_markush());
        let back = model.markush_structure().unwrap();
        assert_eq!(back.core_count(), 1);
        assert_eq!(back.r_group_count(), 1);
    }

    #[test]
    fn flip_is_an_involution() {
        let mut model = Model::new(Mode::molecule());
        add_pair(&mut model, 6, 2.0, 3.0);
        let before: Vec<[f64; 2]> = model.mol().atoms().map(|i| model.mol().atom(i).pos).collect();
        model.flip(true);
        model.flip(true);
        for (idx, &pos) in before.iter().enumerate() {
            let after = model.mol().atom(n(idx)).pos;
            assert!((after[0] - pos[0]).abs() < 1e-9);
            assert!((after[1] - pos[1]).abs() < 1e-9);
        }
    }

    #[test]
    fn flip_mirrors_about_center() {
        let mut model = Model::new(Mode::molecule());
        add_pair(&mut model, 6, 0.0, 0.0); // atoms at x=0 and x=1
        model.flip(true);
        assert!((model.mol().atom(n(0)).pos[0] - 1.0).abs() < 1e-9);
        assert!((model.mol().atom(n(1)).pos[0] - 0.0).abs() < 1e-9);
    }

    #[test]
    fn pop_undo_on_empty_is_no_op() {
        let mut model = Model::new(Mode::molecule());
        add_pair(&mut model, 6, 0.0, 0.0);
        model.pop_undo();
        assert_eq!(model.mol().atom_count(), 2);
    }

    #[test]
    fn undo_restores_previous_state() {
        let mut model = Model::new(Mode::molecule());
        add_pair(&mut model, 6, 0.0, 0.0);
        model.push_undo();
        model.mol_mut().add_atom(Atom::at(8, 5.0, 5.0));
        assert_eq!(model.mol().atom_count(), 3);
        model.pop_undo();
        assert_eq!(model.mol().atom_count(), 2);
    }

    #[test]
    fn hit_test_atoms_and_bonds() {
        let mut model = Model::new(Mode::molecule());
        let mol = model.mol_mut();
        let a = mol.add_atom(Atom::at(6, 0.0, 0.0));
        let b = mol.add_atom(Atom::at(6, 20.0, 0.0));
        mol.add_bond(a, b, Bond::default());
        // Mid-bond: no atom within tolerance, the bond is.
        assert!(!model.hit_test([10.0, 1.0], false));
        assert!(model.hit_test([10.0, 1.0], true));
        assert!(model.hit_test([1.0, 1.0], false));
        assert!(!model.hit_test([10.0, 8.0], true));
    }

    #[test]
    fn find_fragment_uses_click_distance() {
        let mut model = Model::new(Mode::multiple_fragments());
        add_pair(&mut model, 6, 0.0, 0.0);
        add_pair(&mut model, 6, 100.0, 0.0);
        model.analyze();
        assert_eq!(model.find_fragment([101.0, 5.0]), Some(1));
        assert_eq!(model.find_fragment([0.0, 10.0]), Some(0));
        assert_eq!(model.find_fragment([50.0, 50.0]), None);
    }

    #[test]
    fn highlight_callback_sees_transitions() {
        let mut model = Model::new(Mode::molecule());
        add_pair(&mut model, 6, 0.0, 0.0);
        let log: Rc<RefCell<Vec<(usize, bool)>>> = Rc::new(RefCell::new(Vec::new()));
        {
            let log = Rc::clone(&log);
            model.register_atom_highlight_callback(Box::new(move |atom, on| {
                log.borrow_mut().push((atom.index(), on));
            }));
        }
        model.set_highlighted_atom(Some(n(1)));
        model.set_highlighted_atom(Some(n(1))); // unchanged, no callback
        model.set_highlighted_atom(None);
        assert_eq!(*log.borrow(), vec![(1, true), (1, false)]);
    }

    #[test]
    fn selected_copy_keeps_inner_bonds_only() {
        let mut model = Model::new(Mode::molecule());
        let mol = model.mol_mut();
        let a = mol.add_atom(Atom::at(6, 0.0, 0.0));
        let b = mol.add_atom(Atom::at(6, 1.0, 0.0));
        let c = mol.add_atom(Atom::at(8, 2.0, 0.0));
        mol.add_bond(a, b, Bond::default());
        mol.add_bond(b, c, Bond::default());
        mol.atom_mut(a).selected = true;
        mol.atom_mut(b).selected = true;

        let copy = model.selected_copy().unwrap();
        assert_eq!(copy.atom_count(), 2);
        assert_eq!(copy.bond_count(), 1);
    }

    #[test]
    fn selected_copy_none_without_selection() {
        let mut model = Model::new(Mode::molecule());
        add_pair(&mut model, 6, 0.0, 0.0);
        assert!(model.selected_copy().is_none());
    }

    #[test]
    fn scale_uses_smaller_factor() {
        let mut model = Model::new(Mode::molecule());
        add_pair(&mut model, 6, 1.0, 1.0);
        model.scale(2.0, 3.0);
        assert_eq!(model.mol().atom(n(0)).pos, [2.0, 2.0]);
    }

    #[test]
    fn generation_tracks_analysis_passes() {
        let mut model = Model::new(Mode::multiple_fragments());
        add_pair(&mut model, 6, 0.0, 0.0);
        let g0 = model.generation();
        model.analyze();
        model.sync();
        assert_eq!(model.generation(), g0 + 2);
    }
}
