/*!

PPM (Prediction by Partial Matching) compression and decompression.

Each byte is predicted by the frequency table of the longest known context,
a suffix of up to `order` preceding bytes. A byte unseen under that context
is announced with an escape and retried one context shorter, down to a flat
distribution over all byte values. After coding, the byte is counted under
the matched context and every shorter one, and additionally promoted one
context deeper, so repeated patterns migrate into longer contexts.

The decoder replays the identical walk, growing an identical model from the
decoded bytes alone. Escapes are counted at the moment they are coded, on
both sides, including under contexts that were never seen before; the model
state is therefore a pure function of the symbol sequence and never needs
to be transmitted.

The stream carries no length or terminator: the caller frames the byte
count out of band and reads exactly that many bytes back.

# Links

http://en.wikipedia.org/wiki/Prediction_by_partial_matching
http://en.wikipedia.org/wiki/Arithmetic_coding

# Example

```rust
use std::io::{Read, Write};
use ppmc::ppm;

let text = b"abracadabra";

// Encode some text
let mut e = ppm::Encoder::new(Vec::new(), 3);
e.write_all(text).unwrap();
let (encoded, result) = e.finish();
result.unwrap();

// Decode it back, telling the decoder how much to produce
let mut d = ppm::Decoder::new(&encoded[..], 3).unwrap();
let mut decoded = vec![0u8; text.len()];
d.read_exact(&mut decoded).unwrap();
assert_eq!(&decoded[..], &text[..]);
```

# Credit

This is an original implementation.

*/

use std::cmp;
use std::io::{self, Read, Write};

use log::debug;

use crate::entropy::ari::{RangeDecoder, RangeEncoder};

pub use self::model::{ContextStore, FreqTable, History, Symbol, Uniform};

pub mod model;
#[cfg(test)]
mod test;

/// Highest supported context order
pub const MAX_ORDER: usize = 8;
/// Context order used when the caller expresses no preference
pub const DEFAULT_ORDER: usize = 3;

/// A PPM compressor wrapping an inner writer.
/// Bytes written to it come out of the inner writer as a packed bit
/// stream; `finish` must be called to settle the tail.
pub struct Encoder<W> {
    range: RangeEncoder<W>,
    store: ContextStore,
    history: History,
    order: usize,
}

impl<W: Write> Encoder<W> {
    /// Create a new encoder with contexts of up to `order` bytes,
    /// `0..=MAX_ORDER`
    pub fn new(w: W, order: usize) -> Encoder<W> {
        assert!(order <= MAX_ORDER, "context order {} is out of range", order);
        Encoder {
            range: RangeEncoder::new(w),
            store: ContextStore::new(),
            history: History::new(order),
            order,
        }
    }

    fn encode_byte(&mut self, value: u8) -> io::Result<()> {
        let symbol = Symbol::Byte(value);
        let deepest = cmp::min(self.order, self.history.len());
        let mut matched = None;
        for k in (0..=deepest).rev() {
            if let Some(table) = self.store.table(self.history.suffix(k)) {
                if table.contains(symbol) {
                    self.range.encode(symbol, table)?;
                    matched = Some(k);
                    break;
                }
                debug!("escape from order {}", k);
                self.range.encode(Symbol::Escape, table)?;
            }
            // the escape is counted even under a context seen for the
            // first time, so the decoder grows the same table
            self.store.increment(self.history.suffix(k), Symbol::Escape);
        }
        if matched.is_none() {
            debug!("order -1 fallback for {}", value);
            self.range.encode(value, &Uniform)?;
        }
        // count the byte under the matched context and every shorter
        // one, and promote it one order deeper
        let top = match matched {
            Some(m) => cmp::min(m + 1, deepest),
            None => 0,
        };
        for k in 0..=top {
            self.store.increment(self.history.suffix(k), symbol);
        }
        self.history.push(value);
        Ok(())
    }

    /// Settle the trailing bits and return the inner writer
    pub fn finish(self) -> (W, io::Result<()>) {
        self.range.finish()
    }
}

impl<W: Write> Write for Encoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &byte in buf.iter() {
            self.encode_byte(byte)?;
        }
        Ok(buf.len())
    }

    /// No-op: coded bits only settle at `finish`
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A PPM decompressor wrapping an inner reader.
/// Produces decoded bytes indefinitely; the caller is responsible for
/// reading exactly as many as were originally encoded.
pub struct Decoder<R> {
    range: RangeDecoder<R>,
    store: ContextStore,
    history: History,
    order: usize,
}

impl<R: Read> Decoder<R> {
    /// Create a new decoder with the same `order` the encoder used
    pub fn new(r: R, order: usize) -> io::Result<Decoder<R>> {
        assert!(order <= MAX_ORDER, "context order {} is out of range", order);
        Ok(Decoder {
            range: RangeDecoder::new(r)?,
            store: ContextStore::new(),
            history: History::new(order),
            order,
        })
    }

    fn decode_byte(&mut self) -> io::Result<u8> {
        let deepest = cmp::min(self.order, self.history.len());
        let mut matched = None;
        for k in (0..=deepest).rev() {
            if let Some(table) = self.store.table(self.history.suffix(k)) {
                match self.range.decode(table)? {
                    Symbol::Byte(value) => {
                        matched = Some((value, k));
                        break;
                    }
                    Symbol::Escape => debug!("escape from order {}", k),
                }
            }
            self.store.increment(self.history.suffix(k), Symbol::Escape);
        }
        let (value, matched) = match matched {
            Some((value, k)) => (value, Some(k)),
            None => (self.range.decode(&Uniform)?, None),
        };
        let symbol = Symbol::Byte(value);
        // mirror the encoder's counting exactly
        let top = match matched {
            Some(m) => cmp::min(m + 1, deepest),
            None => 0,
        };
        for k in 0..=top {
            self.store.increment(self.history.suffix(k), symbol);
        }
        self.history.push(value);
        Ok(value)
    }
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        for slot in buf.iter_mut() {
            *slot = self.decode_byte()?;
        }
        Ok(buf.len())
    }
}
