/// Editor mode as an explicit capability set.
///
/// The mode decides which side-classification rule the fragment sorter uses
/// and whether reaction/Markush views of the sketch are available. Reaction
/// and Markush editing both require multi-fragment analysis, so those
/// constructors imply it; the implication is re-applied by every `with_*`
/// combinator, making an un-normalized mode unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mode {
    multiple_fragments: bool,
    markush: bool,
    reaction: bool,
    drawing_objects: bool,
}

/// The fragment side-classification rule a [`Mode`] selects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SideRule {
    /// Single-structure editing: fragments carry no side.
    None,
    /// Reaction editing: fragments right of `half_width` are products.
    ByPosition { half_width: f64 },
    /// Markush editing: fragments containing a wildcard atom are R-groups.
    ByWildcard,
}

impl Mode {
    /// Plain single-structure editing.
    pub fn molecule() -> Self {
        Self::default()
    }

    /// Multi-fragment editing without reaction or Markush semantics.
    pub fn multiple_fragments() -> Self {
        Self {
            multiple_fragments: true,
            ..Self::default()
        }
    }

    /// Reaction editing (implies multiple fragments).
    pub fn reaction() -> Self {
        Self {
            reaction: true,
            ..Self::default()
        }
        .normalized()
    }

    /// Markush editing (implies multiple fragments).
    pub fn markush() -> Self {
        Self {
            markush: true,
            ..Self::default()
        }
        .normalized()
    }

    pub fn with_drawing_objects(mut self) -> Self {
        self.drawing_objects = true;
        self.normalized()
    }

    pub fn with_reaction(mut self) -> Self {
        self.reaction = true;
        self.normalized()
    }

    pub fn with_markush(mut self) -> Self {
        self.markush = true;
        self.normalized()
    }

    fn normalized(mut self) -> Self {
        if self.reaction || self.markush {
            self.multiple_fragments = true;
        }
        self
    }

    pub fn has_multiple_fragments(&self) -> bool {
        self.multiple_fragments
    }

    pub fn is_reaction(&self) -> bool {
        self.reaction
    }

    pub fn is_markush(&self) -> bool {
        self.markush
    }

    pub fn has_drawing_objects(&self) -> bool {
        self.drawing_objects
    }

    /// The side rule active under this mode. Reaction wins over Markush when
    /// both are set.
    pub fn side_rule(&self, display_width: f64) -> SideRule {
        if self.reaction {
            SideRule::ByPosition {
                half_width: display_width / 2.0,
            }
        } else if self.markush {
            SideRule::ByWildcard
        } else {
            SideRule::None
        }
    }
}
