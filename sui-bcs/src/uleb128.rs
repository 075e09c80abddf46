//! Unsigned LEB128 variable-length integers.
//!
//! BCS uses ULEB128 for sequence lengths and enum discriminants: 7 payload bits per byte, least
//! significant group first, with bit 7 set on every byte except the last. Only the shortest
//! encoding of a value is canonical.

/// Maximum number of bytes a ULEB128-encoded `u64` can occupy.
pub const MAX_ENCODED_LEN: usize = 10;

const CONTINUATION_BIT: u8 = 0x80;
const PAYLOAD_MASK: u8 = 0x7f;

/// Encodes `value` into `buf`, returning the number of bytes written.
pub fn encode(mut value: u64, buf: &mut [u8; MAX_ENCODED_LEN]) -> usize {
    let mut len = 0;
    loop {
        let byte = (value as u8) & PAYLOAD_MASK;
        value >>= 7;
        if value == 0 {
            buf[len] = byte;
            return len + 1;
        }
        buf[len] = byte | CONTINUATION_BIT;
        len += 1;
    }
}

/// Returns the number of bytes `value` occupies when ULEB128-encoded.
pub const fn encoded_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    if bits == 0 { 1 } else { bits.div_ceil(7) }
}

/// Incremental decoder state for one ULEB128 value.
///
/// Bytes are fed one at a time with [Decoder::push]; the decoder reports completion, overflow of
/// `max` and non-canonical (over-long) encodings.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Decoder {
    value: u64,
    shift: u32,
    max: u64,
}

/// Outcome of feeding one byte into a [Decoder].
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Step {
    NeedMore,
    Done(u64),
    Overflow,
    NonCanonical,
}

impl Decoder {
    pub(crate) const fn new(max: u64) -> Self {
        Self { value: 0, shift: 0, max }
    }

    pub(crate) fn push(&mut self, byte: u8) -> Step {
        let digit = (byte & PAYLOAD_MASK) as u64;
        if self.shift >= 64 || (self.shift > 0 && digit >> (64 - self.shift) != 0) {
            return Step::Overflow;
        }
        self.value |= digit << self.shift;
        if self.value > self.max {
            return Step::Overflow;
        }
        if byte & CONTINUATION_BIT != 0 {
            self.shift += 7;
            return Step::NeedMore;
        }
        // a zero final group after the first byte means a shorter encoding existed
        if self.shift > 0 && digit == 0 {
            return Step::NonCanonical;
        }
        Step::Done(self.value)
    }
}
