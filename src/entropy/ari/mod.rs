/*!

Binary arithmetic encoder/decoder over 32-bit integer ranges.

The coder keeps a live interval `[low, high]` inside the 32-bit space and
narrows it by the probability range of each coded value. Whenever the
interval falls entirely into one half of the space the leading bit is
settled and shifted out; an interval straddling the middle quarter pair is
expanded with the bit deferred until the straddle resolves. The decoder
mirrors every narrowing step while tracking the 32-bit window `code` of the
input bit stream, so both sides walk identical interval sequences.

Probability ranges come from a [`Model`], which maps values to cumulative
frequency ranges and back. Models are free to adapt between calls as long
as encoder and decoder adapt identically.

# Links

http://en.wikipedia.org/wiki/Arithmetic_coding

# Example

See the `ppm` module, which drives this coder with adaptive context
models.

# Credit

This is an original implementation.

*/

use std::fmt;
use std::io::{self, Read, Write};

use log::debug;

use crate::bits::{BitReader, BitWriter};


/// A cumulative frequency border, also the bound on model totals
pub type Border = u32;
const BORDER_BITS: u32 = 32;
const MASK: u64 = (1 << BORDER_BITS) - 1;

const HALF: u64 = 1 << (BORDER_BITS - 1);
const QUARTER: u64 = 1 << (BORDER_BITS - 2);
const THREE_QUARTERS: u64 = 3 * QUARTER;

/// An abstract model to produce probability ranges.
/// Can be a fixed table, an adaptive one, or just a smart function.
pub trait Model<V: Copy + fmt::Debug> {
    /// Get the cumulative frequency range of a value
    fn get_range(&self, value: V) -> (Border, Border);
    /// Find the value covering a given cumulative frequency offset,
    /// returned with its range
    fn find_value(&self, offset: Border) -> (V, Border, Border);
    /// Get the sum of all frequencies
    fn get_denominator(&self) -> Border;
}

/// Range encoder basic primitive.
/// Narrows the live interval by incoming probability ranges and emits the
/// settled leading bits into a `BitWriter`.
pub struct RangeEncoder<W> {
    bits: BitWriter<W>,
    low: u64,
    high: u64,
    /// deferred straddle bits, emitted as complements of the next
    /// settled bit
    pending: u32,
}

impl<W: Write> RangeEncoder<W> {
    /// Create a new encoder on top of a given writer
    pub fn new(w: W) -> RangeEncoder<W> {
        RangeEncoder {
            bits: BitWriter::new(w),
            low: 0,
            high: MASK,
            pending: 0,
        }
    }

    fn push(&mut self, bit: bool) -> io::Result<()> {
        self.bits.write_bit(bit)?;
        while self.pending > 0 {
            self.bits.write_bit(!bit)?;
            self.pending -= 1;
        }
        Ok(())
    }

    /// Narrow the interval to `[from/total, to/total)` of its width and
    /// renormalize, emitting every bit that becomes settled
    pub fn process(&mut self, from: Border, to: Border, total: Border) -> io::Result<()> {
        if total == 0 {
            // an empty distribution carries nothing
            return Ok(());
        }
        debug_assert!(from < to && to <= total);
        let range = self.high - self.low + 1;
        debug!(
            "\t\tprocessing [{}-{})/{} under range {}",
            from, to, total, range
        );
        self.high = self.low + range * to as u64 / total as u64 - 1;
        self.low += range * from as u64 / total as u64;
        loop {
            if self.high < HALF {
                self.push(false)?;
            } else if self.low >= HALF {
                self.push(true)?;
                self.low -= HALF;
                self.high -= HALF;
            } else if self.low >= QUARTER && self.high < THREE_QUARTERS {
                self.pending += 1;
                self.low -= QUARTER;
                self.high -= QUARTER;
            } else {
                break;
            }
            self.low = (self.low << 1) & MASK;
            self.high = ((self.high << 1) | 1) & MASK;
        }
        Ok(())
    }

    /// Encode a value under the given model
    pub fn encode<V: Copy + fmt::Debug, M: Model<V>>(
        &mut self,
        value: V,
        model: &M,
    ) -> io::Result<()> {
        let (from, to) = model.get_range(value);
        let total = model.get_denominator();
        debug!("\tencoding {:?} as [{}-{}) of {}", value, from, to, total);
        self.process(from, to, total)
    }

    /// Settle the tail of the interval and close the bit stream,
    /// returning the inner writer.
    /// The deciding bit plus the pending complements pin a point that
    /// stays inside `[low, high]` once the decoder pads with zeros.
    pub fn finish(mut self) -> (W, io::Result<()>) {
        self.pending += 1;
        let bit = self.low >= QUARTER;
        let result = self.push(bit);
        let (w, flushed) = self.bits.finish();
        (w, result.and(flushed))
    }
}

/// Range decoder, the mirror of `RangeEncoder`.
/// Holds the 32-bit window `code` of the not-yet-consumed input bits.
pub struct RangeDecoder<R> {
    bits: BitReader<R>,
    low: u64,
    high: u64,
    code: u64,
}

impl<R: Read> RangeDecoder<R> {
    /// Create a decoder on top of a given reader, shifting in the first
    /// 32 bits of input (zero-padded if the input is shorter)
    pub fn new(r: R) -> io::Result<RangeDecoder<R>> {
        let mut bits = BitReader::new(r);
        let mut code = 0u64;
        for _ in 0..BORDER_BITS {
            code = (code << 1) | bits.read_bit()? as u64;
        }
        Ok(RangeDecoder {
            bits,
            low: 0,
            high: MASK,
            code,
        })
    }

    /// Query the cumulative frequency offset encoded by the current
    /// window in a distribution of the given total
    pub fn query(&self, total: Border) -> Border {
        debug_assert!(total > 0);
        let range = self.high - self.low + 1;
        (((self.code - self.low + 1) * total as u64 - 1) / range) as Border
    }

    /// Narrow the interval exactly as the encoder did, consuming one
    /// input bit per settled bit
    pub fn process(&mut self, from: Border, to: Border, total: Border) -> io::Result<()> {
        if total == 0 {
            return Ok(());
        }
        debug_assert!(from < to && to <= total);
        let range = self.high - self.low + 1;
        self.high = self.low + range * to as u64 / total as u64 - 1;
        self.low += range * from as u64 / total as u64;
        loop {
            if self.high < HALF {
                // leading bit settled, nothing to subtract
            } else if self.low >= HALF {
                self.low -= HALF;
                self.high -= HALF;
                self.code -= HALF;
            } else if self.low >= QUARTER && self.high < THREE_QUARTERS {
                self.low -= QUARTER;
                self.high -= QUARTER;
                self.code -= QUARTER;
            } else {
                break;
            }
            self.low = (self.low << 1) & MASK;
            self.high = ((self.high << 1) | 1) & MASK;
            self.code = ((self.code << 1) & MASK) | self.bits.read_bit()? as u64;
        }
        Ok(())
    }

    /// Decode a value under the given model
    pub fn decode<V: Copy + fmt::Debug, M: Model<V>>(&mut self, model: &M) -> io::Result<V> {
        let total = model.get_denominator();
        let offset = self.query(total);
        let (value, from, to) = model.find_value(offset);
        debug!("\tdecoded {:?} at offset {} of {}", value, offset, total);
        self.process(from, to, total)?;
        Ok(value)
    }
}
