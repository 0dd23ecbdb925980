use std::io;

use super::codec::{self, CorruptDataError};
use super::search::{self, CommonPrefixIter};
use super::slot::Slot;

/// An immutable double-array trie.
///
/// Every state is an index into a single array of [`Slot`]s. A child of state
/// `s` reached by transition code `c` lives at `offset(s) + c` and records `s`
/// as its parent, which is how a lookup tells its own children apart from
/// slots owned by other states.
///
/// Automata are produced by a [`Builder`](super::builder::Builder) or decoded
/// from bytes with [`Automaton::from_bytes`]. Nothing mutates an automaton
/// after that, so it can be shared freely between threads.
///
/// # Examples
///
/// ```
/// use libdarts::darts::build_double_array;
///
/// let da = build_double_array(["印度", "印度尼西亚", "巴勒斯坦"]).unwrap();
/// assert_eq!(da.exact_match_search("印度尼西亚"), Some(1));
/// assert_eq!(da.exact_match_search("印"), None);
/// assert_eq!(da.common_prefix_search("印度尼西亚啊"), vec![0, 1]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Automaton {
    pub(crate) slots: Vec<Slot>,
}

impl Default for Automaton {
    fn default() -> Self {
        Automaton::root_only()
    }
}

impl Automaton {
    /// An automaton holding no keys.
    pub(crate) fn root_only() -> Self {
        Automaton {
            slots: vec![Slot::Root { offset: 0 }],
        }
    }

    /// Number of slots, including free slots between used ones.
    #[inline]
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Returns the slots of the automaton.
    #[inline]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Returns the rank of `key` if it is one of the stored keys.
    #[inline]
    pub fn exact_match_search(&self, key: impl AsRef<[u8]>) -> Option<usize> {
        search::exact_match(self.slots.as_slice(), key.as_ref())
    }

    /// Returns the ranks of all stored keys that are prefixes of `text`,
    /// shortest first.
    pub fn common_prefix_search(&self, text: impl AsRef<[u8]>) -> Vec<usize> {
        self.common_prefix_iter(text.as_ref())
            .map(|m| m.rank)
            .collect()
    }

    /// Returns an iterator over all stored keys that are prefixes of `text`,
    /// shortest first, together with their lengths.
    #[inline]
    pub fn common_prefix_iter<'a, T>(&'a self, text: &'a T) -> CommonPrefixIter<'a, [Slot]>
    where
        T: AsRef<[u8]> + ?Sized,
    {
        CommonPrefixIter::new(self.slots.as_slice(), text.as_ref())
    }

    /// Serializes the automaton into its flat binary layout.
    ///
    /// See [`codec`](super::codec) for the layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        codec::to_bytes(&self.slots)
    }

    /// Writes the flat binary layout to `writer`.
    pub fn write_to<W: io::Write>(&self, writer: W) -> io::Result<()> {
        codec::write_to(&self.slots, writer)
    }

    /// Decodes an automaton from bytes produced by [`Automaton::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns [`CorruptDataError`] if the buffer length disagrees with its
    /// header or a slot does not decode.
    pub fn from_bytes(bytes: &[u8]) -> Result<Automaton, CorruptDataError> {
        Ok(Automaton {
            slots: codec::from_bytes(bytes)?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn root_only_matches_nothing() {
        let da = Automaton::default();
        assert_eq!(da.size(), 1);
        assert_eq!(da.exact_match_search(""), None);
        assert_eq!(da.exact_match_search("a"), None);
        assert!(da.common_prefix_search("abc").is_empty());
    }

    #[test]
    fn root_only_round_trips() {
        let da = Automaton::default();
        let bytes = da.to_bytes();
        assert_eq!(bytes.len(), 12);
        assert_eq!(Automaton::from_bytes(&bytes).unwrap(), da);
    }

    #[test]
    fn empty_key_lives_on_the_root() {
        let da = Automaton {
            slots: vec![Slot::Root { offset: 1 }, Slot::Leaf { parent: 0, rank: 0 }],
        };
        assert_eq!(da.exact_match_search(""), Some(0));
        assert_eq!(da.exact_match_search("x"), None);
        assert_eq!(da.common_prefix_search("xyz"), vec![0]);
    }

    #[test]
    fn prefix_iter_takes_any_byte_text() {
        let da = Automaton {
            slots: vec![Slot::Root { offset: 1 }, Slot::Leaf { parent: 0, rank: 0 }],
        };
        let expected = [search::PrefixMatch { rank: 0, len: 0 }];
        let owned = String::from("xyz");
        assert!(da.common_prefix_iter("xyz").eq(expected));
        assert!(da.common_prefix_iter(&owned).eq(expected));
        assert!(da.common_prefix_iter(b"xyz").eq(expected));
        assert!(da.common_prefix_iter(owned.as_bytes()).eq(expected));
    }

    #[test]
    fn write_to_matches_to_bytes() {
        let da = Automaton {
            slots: vec![Slot::Root { offset: 1 }, Slot::Leaf { parent: 0, rank: 0 }],
        };
        let mut out = Vec::new();
        da.write_to(&mut out).unwrap();
        assert_eq!(out, da.to_bytes());
    }

    #[test]
    fn automaton_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Automaton>();
    }
}
