use super::automaton::Automaton;
use super::codec::{self, CorruptDataError};
use super::search::{self, CommonPrefixIter, SlotSource};
use super::slot::Slot;

/// A read-only double array borrowed straight from its serialized bytes.
///
/// The buffer is validated once when the view is created; queries then decode
/// slots in place, so loading costs no allocation.
///
/// # Examples
///
/// ```
/// use libdarts::darts::{build_double_array, AutomatonView};
///
/// let bytes = build_double_array(["bake", "baker", "cake"]).unwrap().to_bytes();
/// let view = AutomatonView::new(&bytes).unwrap();
/// assert_eq!(view.exact_match_search("baker"), Some(1));
/// assert_eq!(view.common_prefix_search("bakery"), vec![0, 1]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct AutomatonView<'a> {
    bytes: &'a [u8],
    size: usize,
}

impl<'a> AutomatonView<'a> {
    /// Validates `bytes` and wraps them in a view.
    ///
    /// # Errors
    ///
    /// Returns [`CorruptDataError`] under the same conditions as
    /// [`Automaton::from_bytes`].
    pub fn new(bytes: &'a [u8]) -> Result<Self, CorruptDataError> {
        let size = codec::read_size(bytes)?;
        codec::validate(bytes, size)?;
        Ok(AutomatonView { bytes, size })
    }

    /// Number of slots.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the rank of `key` if it is one of the stored keys.
    #[inline]
    pub fn exact_match_search(&self, key: impl AsRef<[u8]>) -> Option<usize> {
        search::exact_match(self, key.as_ref())
    }

    /// Returns the ranks of all stored keys that are prefixes of `text`,
    /// shortest first.
    pub fn common_prefix_search(&self, text: impl AsRef<[u8]>) -> Vec<usize> {
        CommonPrefixIter::new(self, text.as_ref())
            .map(|m| m.rank)
            .collect()
    }

    /// Returns an iterator over all stored keys that are prefixes of `text`,
    /// shortest first, together with their lengths.
    #[inline]
    pub fn common_prefix_iter<'q, T>(&'q self, text: &'q T) -> CommonPrefixIter<'q, Self>
    where
        T: AsRef<[u8]> + ?Sized,
    {
        CommonPrefixIter::new(self, text.as_ref())
    }

    /// Copies the view into an owned [`Automaton`].
    pub fn to_automaton(&self) -> Automaton {
        Automaton {
            slots: (0..self.size).filter_map(|i| self.slot(i)).collect(),
        }
    }
}

impl SlotSource for AutomatonView<'_> {
    #[inline]
    fn slot(&self, index: usize) -> Option<Slot> {
        codec::read_slot(self.bytes, self.size, index)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::darts::build_double_array;

    #[test]
    fn view_answers_like_the_automaton() {
        let keys = ["a", "ab", "abc", "b", "bc"];
        let da = build_double_array(keys).unwrap();
        let bytes = da.to_bytes();
        let view = AutomatonView::new(&bytes).unwrap();
        assert_eq!(view.size(), da.size());
        for (rank, key) in keys.iter().enumerate() {
            assert_eq!(view.exact_match_search(key), Some(rank));
        }
        assert_eq!(view.exact_match_search("c"), None);
        assert_eq!(view.common_prefix_search("abcd"), da.common_prefix_search("abcd"));
        assert_eq!(
            view.common_prefix_iter(b"bcd").collect::<Vec<_>>(),
            da.common_prefix_iter(b"bcd").collect::<Vec<_>>()
        );
        assert_eq!(view.to_automaton(), da);
    }

    #[test]
    fn view_rejects_corrupt_buffers() {
        let bytes = build_double_array(["x"]).unwrap().to_bytes();
        assert!(AutomatonView::new(&bytes[..bytes.len() - 1]).is_err());
        let mut long = bytes.clone();
        long.extend_from_slice(&[0; 8]);
        assert!(matches!(
            AutomatonView::new(&long),
            Err(CorruptDataError::LengthMismatch { .. })
        ));
    }
}
