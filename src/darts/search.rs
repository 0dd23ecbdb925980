use super::key::{code_of, END_CODE};
use super::slot::Slot;

/// Read access to the slots of a double array.
///
/// Implemented by the in-memory slot vector and by the zero-copy
/// [`AutomatonView`](super::view::AutomatonView), so both answer queries
/// through the same traversal code.
pub trait SlotSource {
    /// Returns the slot at `index`, or `None` if it is out of bounds.
    fn slot(&self, index: usize) -> Option<Slot>;
}

impl SlotSource for [Slot] {
    #[inline]
    fn slot(&self, index: usize) -> Option<Slot> {
        self.get(index).copied()
    }
}

impl SlotSource for Vec<Slot> {
    #[inline]
    fn slot(&self, index: usize) -> Option<Slot> {
        self.get(index).copied()
    }
}

/// Follows the transition labelled `code` out of `state`.
#[inline]
pub(crate) fn transition<S: SlotSource + ?Sized>(
    slots: &S,
    state: usize,
    code: usize,
) -> Option<usize> {
    let target = slots.slot(state)?.offset()?.checked_add(code)?;
    match slots.slot(target)? {
        Slot::Branch { parent, .. } if parent as usize == state => Some(target),
        _ => None,
    }
}

/// Returns the rank stored on the terminal transition of `state`, if any.
#[inline]
pub(crate) fn terminal<S: SlotSource + ?Sized>(slots: &S, state: usize) -> Option<usize> {
    let target = slots.slot(state)?.offset()?.checked_add(END_CODE)?;
    match slots.slot(target)? {
        Slot::Leaf { parent, rank } if parent as usize == state => Some(rank as usize),
        _ => None,
    }
}

/// Walks `key` from the root and returns the rank of the key if it was stored.
pub(crate) fn exact_match<S: SlotSource + ?Sized>(slots: &S, key: &[u8]) -> Option<usize> {
    let state = key
        .iter()
        .try_fold(0, |state, &byte| transition(slots, state, code_of(byte)))?;
    terminal(slots, state)
}

/// A stored key found by a common-prefix search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrefixMatch {
    /// Rank of the matched key.
    pub rank: usize,
    /// Length in bytes of the matched key, i.e. of the prefix of the text.
    pub len: usize,
}

/// Iterator over every stored key that is a prefix of a text, shortest first.
///
/// Created by `common_prefix_iter` on [`Automaton`](super::Automaton) and
/// [`AutomatonView`](super::view::AutomatonView).
#[derive(Debug)]
pub struct CommonPrefixIter<'a, S: SlotSource + ?Sized> {
    slots: &'a S,
    text: &'a [u8],
    // None once the walk has fallen off the automaton.
    state: Option<usize>,
    depth: usize,
}

impl<'a, S: SlotSource + ?Sized> CommonPrefixIter<'a, S> {
    pub(crate) fn new(slots: &'a S, text: &'a [u8]) -> Self {
        CommonPrefixIter {
            slots,
            text,
            state: Some(0),
            depth: 0,
        }
    }
}

impl<S: SlotSource + ?Sized> Iterator for CommonPrefixIter<'_, S> {
    type Item = PrefixMatch;

    fn next(&mut self) -> Option<PrefixMatch> {
        while let Some(state) = self.state {
            let len = self.depth;
            let found = terminal(self.slots, state);
            self.state = self
                .text
                .get(len)
                .and_then(|&byte| transition(self.slots, state, code_of(byte)));
            self.depth += 1;
            if let Some(rank) = found {
                return Some(PrefixMatch { rank, len });
            }
        }
        None
    }
}
