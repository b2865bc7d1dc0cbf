/*!

Bit-granular I/O on top of byte streams.

Bits are packed MSB-first within each byte. The writer right-pads the last
partial byte with zeros; the reader keeps returning zero bits once the
underlying stream is exhausted, so a stream can be read slightly past the
point where the writer stopped. Both halves of the arithmetic coder rely on
that pairing.

*/

use std::io::{self, Read, Write};

/// Packs single bits into bytes and writes them to an inner stream.
pub struct BitWriter<W> {
    w: W,
    byte: u8,
    filled: u32,
}

impl<W: Write> BitWriter<W> {
    /// Create a new bit writer on top of a given writer
    pub fn new(w: W) -> BitWriter<W> {
        BitWriter {
            w,
            byte: 0,
            filled: 0,
        }
    }

    /// Append a single bit
    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.byte = (self.byte << 1) | bit as u8;
        self.filled += 1;
        if self.filled == 8 {
            self.w.write_all(&[self.byte])?;
            self.byte = 0;
            self.filled = 0;
        }
        Ok(())
    }

    /// Pad the last partial byte with zeros, flush, and return the inner
    /// writer
    pub fn finish(mut self) -> (W, io::Result<()>) {
        let mut result = Ok(());
        if self.filled > 0 {
            let tail = self.byte << (8 - self.filled);
            result = self.w.write_all(&[tail]);
        }
        let result = result.and(self.w.flush());
        (self.w, result)
    }
}

/// Serves single bits from an inner byte stream, yielding zeros once the
/// stream runs out.
pub struct BitReader<R> {
    r: R,
    byte: u8,
    left: u32,
}

impl<R: Read> BitReader<R> {
    /// Create a new bit reader on top of a given reader
    pub fn new(r: R) -> BitReader<R> {
        BitReader {
            r,
            byte: 0,
            left: 0,
        }
    }

    /// Fetch the next bit, or `false` past the end of the stream
    pub fn read_bit(&mut self) -> io::Result<bool> {
        if self.left == 0 {
            let mut buf = [0u8; 1];
            loop {
                match self.r.read(&mut buf) {
                    Ok(0) => return Ok(false),
                    Ok(_) => break,
                    Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            }
            self.byte = buf[0];
            self.left = 8;
        }
        self.left -= 1;
        Ok((self.byte >> self.left) & 1 != 0)
    }
}

#[cfg(test)]
mod test {
    use super::{BitReader, BitWriter};

    #[test]
    fn pack_msb_first() {
        let mut w = BitWriter::new(Vec::new());
        for &bit in &[true, false, true, false, false, false, false, true] {
            w.write_bit(bit).unwrap();
        }
        w.write_bit(true).unwrap();
        let (buf, result) = w.finish();
        result.unwrap();
        assert_eq!(&buf[..], &[0xA1, 0x80]);
    }

    #[test]
    fn empty_finish() {
        let (buf, result) = BitWriter::new(Vec::new()).finish();
        result.unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn read_back() {
        let input = [0xA1u8];
        let mut r = BitReader::new(&input[..]);
        let bits: Vec<bool> = (0..8).map(|_| r.read_bit().unwrap()).collect();
        assert_eq!(
            bits,
            vec![true, false, true, false, false, false, false, true]
        );
    }

    #[test]
    fn zeros_past_end() {
        let input = [0xFFu8];
        let mut r = BitReader::new(&input[..]);
        for _ in 0..8 {
            assert!(r.read_bit().unwrap());
        }
        for _ in 0..40 {
            assert!(!r.read_bit().unwrap());
        }
    }
}
