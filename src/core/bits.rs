//! MSB-first bit packing for 16-bit community payloads.
//!
//! A community's data half is treated as a sequence of fixed-width fields.
//! The first field occupies the most significant bits, which matches the
//! order the bytes appear on the wire (big-endian, high byte first).
//! Values wider than their field are truncated to the low bits rather than
//! rejected.

use num_traits::{NumCast, PrimInt, Unsigned};
use thiserror::Error;

/// Number of bits in a community payload.
pub const WORD_BITS: u32 = 16;

/// Errors returned by the bit codec.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BitsError {
    /// Attempted to read more bits than remain in the word.
    #[error("read of {requested} bits with only {remaining} remaining")]
    Exhausted { requested: u32, remaining: u32 },
    /// Attempted to write more bits than fit in the word.
    #[error("write of {requested} bits with only {remaining} remaining")]
    Overflow { requested: u32, remaining: u32 },
    /// Field widths do not add up to exactly one word.
    #[error("field widths sum to {total}, expected 16")]
    WidthMismatch { total: u32 },
}

#[inline]
fn low_mask(width: u32) -> u16 {
    if width >= WORD_BITS {
        u16::MAX
    } else {
        (1u16 << width) - 1
    }
}

/// Sequential reader over a single 16-bit word.
#[derive(Debug, Clone, Copy)]
pub struct BitReader {
    word: u16,
    consumed: u32,
}

impl BitReader {
    pub fn new(word: u16) -> Self {
        Self { word, consumed: 0 }
    }

    /// Bits not yet read or skipped.
    #[inline]
    pub fn remaining(&self) -> u32 {
        WORD_BITS - self.consumed
    }

    /// Reads the next `width` bits as an unsigned value.
    pub fn read(&mut self, width: u32) -> Result<u16, BitsError> {
        self.reserve(width)?;
        if width == 0 {
            return Ok(0);
        }
        let shift = WORD_BITS - self.consumed - width;
        self.consumed += width;
        Ok((self.word >> shift) & low_mask(width))
    }

    /// Discards the next `width` bits.
    pub fn skip(&mut self, width: u32) -> Result<(), BitsError> {
        self.reserve(width)?;
        self.consumed += width;
        Ok(())
    }

    #[inline]
    fn reserve(&self, width: u32) -> Result<(), BitsError> {
        if width > self.remaining() {
            Err(BitsError::Exhausted {
                requested: width,
                remaining: self.remaining(),
            })
        } else {
            Ok(())
        }
    }
}

/// Sequential writer producing a single 16-bit word.
///
/// Bits that are never written stay zero, so a writer finished early is
/// right-padded.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitWriter {
    word: u16,
    written: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the low `width` bits of `value`; higher bits are dropped.
    pub fn put<T>(&mut self, width: u32, value: T) -> Result<&mut Self, BitsError>
    where
        T: PrimInt + Unsigned,
    {
        let remaining = WORD_BITS - self.written;
        if width > remaining {
            return Err(BitsError::Overflow {
                requested: width,
                remaining,
            });
        }
        if width == 0 {
            return Ok(self);
        }
        let mask = <T as NumCast>::from(low_mask(width)).unwrap_or_else(T::max_value);
        let truncated = (value & mask).to_u16().unwrap_or(0);
        let shift = remaining - width;
        self.word |= truncated << shift;
        self.written += width;
        Ok(self)
    }

    /// Appends `width` zero bits.
    pub fn pad(&mut self, width: u32) -> Result<&mut Self, BitsError> {
        self.put(width, 0u16)
    }

    pub fn finish(self) -> u16 {
        self.word
    }
}

fn check_total(widths: impl Iterator<Item = u32>) -> Result<(), BitsError> {
    let total: u32 = widths.sum();
    if total != WORD_BITS {
        return Err(BitsError::WidthMismatch { total });
    }
    Ok(())
}

/// Splits `word` into fields of the given widths, most significant first.
pub fn unpack<const N: usize>(word: u16, widths: [u32; N]) -> Result<[u16; N], BitsError> {
    check_total(widths.iter().copied())?;
    let mut reader = BitReader::new(word);
    let mut out = [0u16; N];
    for (slot, width) in out.iter_mut().zip(widths) {
        *slot = reader.read(width)?;
    }
    Ok(out)
}

/// Packs `(value, width)` pairs into one word, most significant first.
pub fn pack(fields: &[(u16, u32)]) -> Result<u16, BitsError> {
    check_total(fields.iter().map(|&(_, width)| width))?;
    let mut writer = BitWriter::new();
    for &(value, width) in fields {
        writer.put(width, value)?;
    }
    Ok(writer.finish())
}

/// A fixed field layout whose widths are checked at compile time.
///
/// `Layout::new` panics during const evaluation when the widths do not
/// sum to 16, so a `const` layout can never be inconsistent and its
/// `pack`/`unpack` have no error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout<const N: usize> {
    widths: [u32; N],
}

impl<const N: usize> Layout<N> {
    pub const fn new(widths: [u32; N]) -> Self {
        let mut total = 0;
        let mut i = 0;
        while i < N {
            total += widths[i];
            i += 1;
        }
        assert!(total == WORD_BITS, "layout widths must sum to 16");
        Self { widths }
    }

    pub const fn widths(&self) -> [u32; N] {
        self.widths
    }

    pub fn unpack(&self, word: u16) -> [u16; N] {
        let mut out = [0u16; N];
        let mut consumed = 0;
        for (slot, &width) in out.iter_mut().zip(self.widths.iter()) {
            if width > 0 {
                let shift = WORD_BITS - consumed - width;
                *slot = (word >> shift) & low_mask(width);
            }
            consumed += width;
        }
        out
    }

    /// Packs one value per field, truncating each to its width.
    pub fn pack(&self, values: [u16; N]) -> u16 {
        let mut word = 0u16;
        let mut written = 0;
        for (&value, &width) in values.iter().zip(self.widths.iter()) {
            if width > 0 {
                let shift = WORD_BITS - written - width;
                word |= (value & low_mask(width)) << shift;
            }
            written += width;
        }
        word
    }
}

/// Network byte order for a payload word.
#[inline]
pub fn to_wire(word: u16) -> [u8; 2] {
    word.to_be_bytes()
}

#[inline]
pub fn from_wire(bytes: [u8; 2]) -> u16 {
    u16::from_be_bytes(bytes)
}
