/// `check` value of a slot that has no parent: free slots and the root.
pub const NO_PARENT: i32 = -1;

/// One cell of the double array.
///
/// The classic encoding overloads the sign of `base` to tell branches from
/// leaves. Here the distinction is an explicit discriminant; the signed
/// `(base, check)` pair only exists in the serialized form, see
/// [`Slot::encode`] and [`Slot::decode`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Unused slot.
    #[default]
    Free,
    /// The root state. Always stored at index 0.
    Root {
        /// Base offset of the root's children.
        offset: u32,
    },
    /// An inner state reached through a byte transition.
    Branch {
        /// State that owns this slot.
        parent: u32,
        /// Base offset of this state's children.
        offset: u32,
    },
    /// A terminal transition: the parent state spells a complete key.
    Leaf {
        /// State that owns this slot.
        parent: u32,
        /// Rank of the key in the sorted input.
        rank: u32,
    },
}

impl Slot {
    /// True if the slot is unclaimed.
    #[inline]
    pub fn is_free(&self) -> bool {
        matches!(self, Slot::Free)
    }

    /// The state owning this slot, if any.
    #[inline]
    pub fn parent(&self) -> Option<usize> {
        match *self {
            Slot::Branch { parent, .. } | Slot::Leaf { parent, .. } => Some(parent as usize),
            Slot::Free | Slot::Root { .. } => None,
        }
    }

    /// The base offset of this state's children, for states that can have any.
    #[inline]
    pub fn offset(&self) -> Option<usize> {
        match *self {
            Slot::Root { offset } | Slot::Branch { offset, .. } => Some(offset as usize),
            Slot::Free | Slot::Leaf { .. } => None,
        }
    }

    /// Returns the slot with its child offset replaced.
    ///
    /// Free slots and leaves are returned unchanged.
    pub(crate) fn with_offset(self, offset: u32) -> Slot {
        match self {
            Slot::Root { .. } => Slot::Root { offset },
            Slot::Branch { parent, .. } => Slot::Branch { parent, offset },
            other => other,
        }
    }

    /// Returns the slot with its owning state replaced.
    pub(crate) fn with_parent(self, parent: u32) -> Slot {
        match self {
            Slot::Branch { offset, .. } => Slot::Branch { parent, offset },
            Slot::Leaf { rank, .. } => Slot::Leaf { parent, rank },
            other => other,
        }
    }

    /// Encodes the slot as a serialized `(base, check)` pair.
    ///
    /// Leaves store `-(rank + 1)` in `base`.
    #[inline]
    pub fn encode(&self) -> (i32, i32) {
        match *self {
            Slot::Free => (0, NO_PARENT),
            Slot::Root { offset } => (offset as i32, NO_PARENT),
            Slot::Branch { parent, offset } => (offset as i32, parent as i32),
            Slot::Leaf { parent, rank } => (-(rank as i32) - 1, parent as i32),
        }
    }

    /// Decodes a serialized `(base, check)` pair found at `index` in an
    /// array of `size` slots.
    ///
    /// Returns `None` if the pair is not a valid encoding at that position.
    #[inline]
    pub fn decode(index: usize, size: usize, base: i32, check: i32) -> Option<Slot> {
        if index == 0 {
            return (base >= 0 && check == NO_PARENT).then_some(Slot::Root {
                offset: base as u32,
            });
        }
        if check == NO_PARENT {
            return (base == 0).then_some(Slot::Free);
        }
        if check < 0 || check as usize >= size {
            return None;
        }
        let parent = check as u32;
        Some(if base >= 0 {
            Slot::Branch {
                parent,
                offset: base as u32,
            }
        } else {
            Slot::Leaf {
                parent,
                rank: (-(base + 1)) as u32,
            }
        })
    }
}
