/// Automaton: the immutable, queryable double array.
pub mod automaton;
/// Double-array builder for sorted key lists.
pub mod builder;
/// Flat binary layout of a double array.
pub mod codec;
/// Key types and byte to transition-code mapping.
pub mod key;
/// Exact-match and common-prefix traversal.
pub mod search;
/// Tagged slots of the double array.
pub mod slot;
/// Zero-copy view over a serialized double array.
pub mod view;

pub use automaton::Automaton;
pub use builder::{build_double_array, BuildStats, Builder, BuilderConfig, BuilderError};
pub use codec::CorruptDataError;
pub use key::IntoKey;
pub use search::{CommonPrefixIter, PrefixMatch};
pub use slot::Slot;
pub use view::AutomatonView;
