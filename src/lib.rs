pub mod atom;
pub mod bond;
pub mod element;
pub mod engines;
pub mod fragment;
pub mod geometry;
pub mod mapper;
pub mod mode;
pub mod model;
pub mod mol;
pub mod notify;
pub mod reaction;
pub mod traits;
pub mod undo;

pub use atom::{Atom, ANY_ATOM};
pub use bond::{Bond, BondOrder};
pub use element::{label_validity, LabelValidity};
pub use engines::{CanonicalForm, Canonicalizer, LayoutEngine, MolCodec, ReactionMatcher};
pub use geometry::Rect;
pub use mode::{Mode, SideRule};
pub use model::{Model, FRAGMENT_MAX_CLICK_DISTANCE, HIT_TOLERANCE};
pub use mol::Mol;
pub use notify::{ChangeNotifier, Observer, ObserverRegistry};
pub use reaction::{MarkushStructure, Reaction};
pub use traits::{
    HasAtomicNum, HasAtomicNumMut, HasBondOrder, HasMapNo, HasMapNoMut, HasPosition2D,
    HasSelection,
};
pub use undo::{UndoStack, MAX_UNDO_SIZE};
