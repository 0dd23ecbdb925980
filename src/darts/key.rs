use smallvec::SmallVec;

/// Transition code reserved for the end of a key.
pub const END_CODE: usize = 0;

/// Largest transition code produced by a key byte.
pub const MAX_CODE: usize = u8::MAX as usize + 1;

/// Maps a key byte to its transition code.
///
/// Codes are shifted by one so that no byte collides with [`END_CODE`].
#[inline]
pub fn code_of(byte: u8) -> usize {
    byte as usize + 1
}

/// Trait for types that can be used as a key when building a double array.
///
/// Implemented for common string and byte sequence types so that
/// [`Builder::build`](super::builder::Builder::build) and
/// [`build_double_array`](super::builder::build_double_array) accept them
/// directly. Strings are keyed by their UTF-8 bytes.
pub trait IntoKey {
    /// Collects this key into a byte buffer.
    fn collect_key(self) -> SmallVec<[u8; 32]>;
}

// String types → UTF-8 bytes

impl IntoKey for &str {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self.as_bytes())
    }
}

impl IntoKey for &&str {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self.as_bytes())
    }
}

impl IntoKey for String {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_vec(self.into_bytes())
    }
}

impl IntoKey for &String {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self.as_bytes())
    }
}

// Byte sequences

impl IntoKey for &[u8] {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self)
    }
}

impl IntoKey for Vec<u8> {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_vec(self)
    }
}

impl IntoKey for &Vec<u8> {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self)
    }
}

impl<const N: usize> IntoKey for [u8; N] {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(&self)
    }
}

impl<const N: usize> IntoKey for &[u8; N] {
    fn collect_key(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn codes_skip_end_marker() {
        assert_eq!(code_of(0), 1);
        assert_eq!(code_of(b'a'), 98);
        assert_eq!(code_of(u8::MAX), MAX_CODE);
        assert_ne!(code_of(0), END_CODE);
    }

    #[test]
    fn strings_are_keyed_by_utf8() {
        assert_eq!("印".collect_key().as_slice(), "印".as_bytes());
        assert_eq!(String::from("abc").collect_key().as_slice(), b"abc");
        assert_eq!((&String::from("ab")).collect_key().as_slice(), b"ab");
        assert_eq!((&"ab").collect_key().as_slice(), b"ab");
    }

    #[test]
    fn byte_sequences_are_copied() {
        assert_eq!([1u8, 2, 3].collect_key().as_slice(), &[1, 2, 3]);
        assert_eq!((&[4u8, 5]).collect_key().as_slice(), &[4, 5]);
        assert_eq!(vec![6u8].collect_key().as_slice(), &[6]);
        assert_eq!((&vec![7u8]).collect_key().as_slice(), &[7]);
        assert_eq!((&[8u8][..]).collect_key().as_slice(), &[8]);
    }
}
