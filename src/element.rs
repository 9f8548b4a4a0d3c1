//! Element symbol table.
//!
//! Maps between atomic numbers and the labels a user can type into the
//! editor. Index 0 is the wildcard "any atom" placeholder, written `?`.

/// Symbols indexed by atomic number, `SYMBOLS[0]` being the wildcard.
pub const SYMBOLS: [&str; 119] = [
    "?", "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg",
    "Al", "Si", "P", "S", "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn",
    "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb",
    "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm",
    "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta",
    "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At",
    "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt",
    "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Looks up the atomic number for an element label.
///
/// The lookup is case-sensitive, matching the labels as drawn. Returns
/// `None` for the wildcard symbol and for unknown labels.
pub fn atomic_no_from_label(label: &str) -> Option<u16> {
    SYMBOLS
        .iter()
        .position(|&s| s == label)
        .filter(|&i| i != 0)
        .map(|i| i as u16)
}

/// The label for an atomic number; out-of-range values render as the
/// wildcard symbol.
pub fn label(atomic_no: u16) -> &'static str {
    SYMBOLS
        .get(atomic_no as usize)
        .copied()
        .unwrap_or(SYMBOLS[0])
}

/// Classification of a partially typed atom label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelValidity {
    /// The string is a complete element label.
    AtomLabel,
    /// Not a label yet, but appending characters may still form one.
    ValidStart,
    /// No element label starts with this string.
    Invalid,
}

/// Classifies a keystroke buffer against the element table.
pub fn label_validity(s: &str) -> LabelValidity {
    if atomic_no_from_label(s).is_some() {
        return LabelValidity::AtomLabel;
    }
    // No element symbol is longer than two characters.
    if !s.is_empty()
        && s.len() < 2
        && SYMBOLS[1..].iter().any(|sym| sym.starts_with(s))
    {
        return LabelValidity::ValidStart;
    }
    LabelValidity::Invalid
}
