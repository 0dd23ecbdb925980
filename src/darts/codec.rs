//! ```text
//! [size: u32][base: i32 × size][check: i32 × size]
//! ```
//!
//! All integers are little-endian and there is no padding, so a buffer holding
//! `size` slots is exactly `4 + 8 * size` bytes long.

use std::error::Error;
use std::io::{self, Write};

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use tracing::debug;

use super::slot::Slot;

/// Size in bytes of the `size` header.
pub const HEADER_SIZE: usize = 4;

/// Size in bytes of one serialized `base` or `check` entry.
pub const ENTRY_SIZE: usize = 4;

/// Errors returned when a byte buffer does not hold a valid double array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorruptDataError {
    /// The buffer ends before the header or before the arrays it declares.
    Truncated {
        /// Number of bytes the header requires.
        expected: usize,
        /// Number of bytes available.
        actual: usize,
    },
    /// The buffer is longer than the arrays it declares.
    LengthMismatch {
        /// Number of bytes the header requires.
        expected: usize,
        /// Number of bytes available.
        actual: usize,
    },
    /// The buffer declares no slots, or slot 0 is not a root.
    MissingRoot,
    /// A slot holds a `(base, check)` pair that no automaton produces.
    InvalidSlot {
        /// Index of the offending slot.
        index: usize,
    },
}

impl std::fmt::Display for CorruptDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorruptDataError::Truncated { expected, actual } => {
                write!(f, "CorruptData - truncated: expected {expected} bytes, got {actual}")
            }
            CorruptDataError::LengthMismatch { expected, actual } => {
                write!(f, "CorruptData - length mismatch: expected {expected} bytes, got {actual}")
            }
            CorruptDataError::MissingRoot => write!(f, "CorruptData - missing root slot"),
            CorruptDataError::InvalidSlot { index } => {
                write!(f, "CorruptData - invalid slot at index {index}")
            }
        }
    }
}

impl Error for CorruptDataError {}

/// Number of bytes needed to serialize `size` slots.
pub fn encoded_len(size: usize) -> usize {
    size.saturating_mul(2 * ENTRY_SIZE).saturating_add(HEADER_SIZE)
}

/// Serializes slots into a freshly allocated buffer.
pub(crate) fn to_bytes(slots: &[Slot]) -> Vec<u8> {
    let mut buf = vec![0u8; encoded_len(slots.len())];
    let (header, arrays) = buf.split_at_mut(HEADER_SIZE);
    let (bases, checks) = arrays.split_at_mut(ENTRY_SIZE * slots.len());
    LittleEndian::write_u32(header, slots.len() as u32);
    for ((slot, base), check) in slots
        .iter()
        .zip(bases.chunks_exact_mut(ENTRY_SIZE))
        .zip(checks.chunks_exact_mut(ENTRY_SIZE))
    {
        let (b, c) = slot.encode();
        LittleEndian::write_i32(base, b);
        LittleEndian::write_i32(check, c);
    }
    buf
}

/// Streams slots in the serialized layout to `writer`.
pub(crate) fn write_to<W: Write>(slots: &[Slot], mut writer: W) -> io::Result<()> {
    writer.write_u32::<LittleEndian>(slots.len() as u32)?;
    for slot in slots {
        writer.write_i32::<LittleEndian>(slot.encode().0)?;
    }
    for slot in slots {
        writer.write_i32::<LittleEndian>(slot.encode().1)?;
    }
    Ok(())
}

/// Checks the header and total length of `bytes` and returns the slot count.
pub(crate) fn read_size(bytes: &[u8]) -> Result<usize, CorruptDataError> {
    let Some(header) = bytes.get(..HEADER_SIZE) else {
        return Err(reject(CorruptDataError::Truncated {
            expected: HEADER_SIZE,
            actual: bytes.len(),
        }));
    };
    let size = LittleEndian::read_u32(header) as usize;
    let expected = encoded_len(size);
    if bytes.len() < expected {
        return Err(reject(CorruptDataError::Truncated {
            expected,
            actual: bytes.len(),
        }));
    }
    if bytes.len() > expected {
        return Err(reject(CorruptDataError::LengthMismatch {
            expected,
            actual: bytes.len(),
        }));
    }
    if size == 0 {
        return Err(reject(CorruptDataError::MissingRoot));
    }
    Ok(size)
}

/// Decodes the slot at `index` of a buffer whose length was checked by
/// [`read_size`].
#[inline]
pub(crate) fn read_slot(bytes: &[u8], size: usize, index: usize) -> Option<Slot> {
    if index >= size {
        return None;
    }
    let base_at = HEADER_SIZE + ENTRY_SIZE * index;
    let check_at = base_at + ENTRY_SIZE * size;
    let base = LittleEndian::read_i32(bytes.get(base_at..base_at + ENTRY_SIZE)?);
    let check = LittleEndian::read_i32(bytes.get(check_at..check_at + ENTRY_SIZE)?);
    Slot::decode(index, size, base, check)
}

/// Checks that every slot of the buffer decodes.
pub(crate) fn validate(bytes: &[u8], size: usize) -> Result<(), CorruptDataError> {
    match (0..size).find(|&index| read_slot(bytes, size, index).is_none()) {
        None => Ok(()),
        Some(0) => Err(reject(CorruptDataError::MissingRoot)),
        Some(index) => Err(reject(CorruptDataError::InvalidSlot { index })),
    }
}

/// Decodes every slot of `bytes`.
pub(crate) fn from_bytes(bytes: &[u8]) -> Result<Vec<Slot>, CorruptDataError> {
    let size = read_size(bytes)?;
    (0..size)
        .map(|index| {
            read_slot(bytes, size, index).ok_or_else(|| {
                reject(if index == 0 {
                    CorruptDataError::MissingRoot
                } else {
                    CorruptDataError::InvalidSlot { index }
                })
            })
        })
        .collect()
}

fn reject(err: CorruptDataError) -> CorruptDataError {
    debug!(error = %err, "rejected serialized double array");
    err
}
