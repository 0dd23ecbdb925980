//! # libdarts
//!
//! A compact [double-array trie](https://linux.thai.net/~thep/datrie/datrie.html)
//! for Rust.
//!
//! A double array encodes a trie over byte strings as a single array of slots.
//! A child of state `s` reached by transition code `c` lives at
//! `offset(s) + c` and records `s` as its parent, so a transition costs one
//! addition and one comparison. Lookups are O(key length) and usually beat a
//! general-purpose hash map, while the whole index serializes to a flat buffer
//! that can be queried in place.
//!
//! ## Features
//!
//! - **Exact match**: map a key to its rank, its position in the sorted input
//! - **Common-prefix search**: every stored key that is a prefix of a text,
//!   shortest first
//! - **Flat serialization**: [`Automaton::to_bytes`](darts::Automaton::to_bytes)
//!   and [`Automaton::from_bytes`](darts::Automaton::from_bytes), or zero-copy
//!   queries through [`AutomatonView`](darts::AutomatonView)
//! - **Thread-safe**: a built [`Automaton`](darts::Automaton) is immutable
//!
//! ## Quick Start
//!
//! Keys must be sorted by their bytes and unique. Payloads live in the
//! caller's own storage, indexed by rank:
//!
//! ```
//! use libdarts::darts::Builder;
//!
//! let entries = [("BAKE", 1), ("BAKER", 2), ("CAKE", 3)];
//! let mut builder = Builder::new();
//! builder.build(entries.iter().map(|(key, _)| key)).unwrap();
//!
//! let rank = builder.exact_match_search("BAKER").unwrap();
//! assert_eq!(entries[rank].1, 2);
//! assert_eq!(builder.exact_match_search("BAK"), None);
//! assert_eq!(builder.common_prefix_search("BAKERY"), vec![0, 1]);
//! ```
//!
//! ## Serialization
//!
//! ```
//! use libdarts::darts::{build_double_array, Automaton, AutomatonView};
//!
//! let da = build_double_array(["one", "three", "two"]).unwrap();
//! let bytes = da.to_bytes();
//!
//! let loaded = Automaton::from_bytes(&bytes).unwrap();
//! assert_eq!(loaded.exact_match_search("two"), Some(2));
//!
//! let view = AutomatonView::new(&bytes).unwrap();
//! assert_eq!(view.exact_match_search("three"), Some(1));
//!
//! assert!(Automaton::from_bytes(&bytes[..bytes.len() - 1]).is_err());
//! ```

#![warn(missing_docs)]

/// Core double-array data structure: slots, builder, traversal and serialization.
pub mod darts;
