use std::io::{Read, Write};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Decoder, Encoder, Symbol};

fn encode(bytes: &[u8], order: usize) -> Vec<u8> {
    let mut e = Encoder::new(Vec::new(), order);
    e.write_all(bytes).unwrap();
    let (buf, result) = e.finish();
    result.unwrap();
    buf
}

fn decode(bits: &[u8], length: usize, order: usize) -> Vec<u8> {
    let mut d = Decoder::new(bits, order).unwrap();
    let mut out = vec![0u8; length];
    d.read_exact(&mut out).unwrap();
    out
}

fn roundtrip(bytes: &[u8], order: usize) {
    let encoded = encode(bytes, order);
    assert_eq!(
        &decode(&encoded, bytes.len(), order)[..],
        bytes,
        "broken roundtrip at order {}",
        order
    );
}

#[test]
fn roundtrips() {
    for order in 0..=4 {
        roundtrip(b"", order);
        roundtrip(b"AAAA", order);
        roundtrip(b"ABABAB", order);
        roundtrip(b"abracadabra", order);
        roundtrip(b"to be or not to be, that is the question", order);
    }
}

#[test]
fn roundtrips_max_order() {
    roundtrip(b"the quick brown fox jumps over the lazy dog", super::MAX_ORDER);
}

#[test]
#[should_panic]
fn order_out_of_range() {
    Encoder::new(Vec::new(), super::MAX_ORDER + 1);
}

#[test]
fn empty_input() {
    let encoded = encode(b"", 3);
    // just the coder flush
    assert!(encoded.len() <= 4);
    assert!(decode(&encoded, 0, 3).is_empty());
}

#[test]
fn single_bytes() {
    for value in 0..=255u8 {
        let input = [value];
        let encoded = encode(&input, 3);
        assert!(!encoded.is_empty() && encoded.len() <= 8);
        assert_eq!(decode(&encoded, 1, 3), &input[..]);
    }
}

#[test]
fn all_byte_values() {
    let input: Vec<u8> = (0..=255).collect();
    roundtrip(&input, 3);

    // every byte was new everywhere, so each one fell through to the
    // flat fallback and was counted once under the empty context,
    // which also took one escape per byte
    let mut e = Encoder::new(Vec::new(), 3);
    e.write_all(&input).unwrap();
    let root = e.store.table(b"").unwrap();
    for value in 0..=255u8 {
        assert_eq!(root.count(Symbol::Byte(value)), 1);
    }
    assert_eq!(root.count(Symbol::Escape), 256);
}

#[test]
fn alternating_counts() {
    let mut e = Encoder::new(Vec::new(), 3);
    e.write_all(b"ABABAB").unwrap();
    let root = e.store.table(b"").unwrap();
    assert_eq!(root.count(Symbol::Byte(b'A')), 3);
    assert_eq!(root.count(Symbol::Byte(b'B')), 3);
    assert_eq!(e.store.table(b"AB").unwrap().count(Symbol::Byte(b'A')), 1);
}

#[test]
fn long_run_stays_tiny() {
    let input = vec![b'x'; 100_000];
    let encoded = encode(&input, 3);
    assert!(
        encoded.len() < 64,
        "a single-byte run should cost a handful of bits, got {} bytes",
        encoded.len()
    );
    assert_eq!(decode(&encoded, input.len(), 3), input);
}

#[test]
fn random_bytes() {
    let mut rng = StdRng::seed_from_u64(0x5eed_1e55);
    let input: Vec<u8> = (0..1024).map(|_| rng.gen()).collect();
    roundtrip(&input, 0);
    roundtrip(&input, 3);
}

#[test]
fn english_text_compresses() {
    let paragraph = "It is a truth universally acknowledged, that a single \
                     man in possession of a good fortune, must be in want \
                     of a wife. However little known the feelings or views \
                     of such a man may be on his first entering a \
                     neighbourhood, this truth is so well fixed in the \
                     minds of the surrounding families, that he is \
                     considered as the rightful property of some one or \
                     other of their daughters. ";
    let mut text = String::new();
    while text.len() < 64 * 1024 {
        text.push_str(paragraph);
    }
    let input = text.as_bytes();
    let encoded = encode(input, 3);
    assert!(encoded.len() < input.len());
    assert_eq!(decode(&encoded, input.len(), 3), input);
}

#[test]
fn deterministic() {
    let input = b"deterministic bit streams or bust";
    assert_eq!(encode(input, 3), encode(input, 3));
}

// The decoder must grow the exact model the encoder grew, in the same
// order, after every byte. A fresh encoder fed each prefix doubles as
// the reference state.
#[test]
fn stores_stay_identical() {
    let input = b"mississippi riverbank mississippi";
    let encoded = encode(input, 3);
    let mut d = Decoder::new(&encoded[..], 3).unwrap();
    let mut decoded = Vec::new();
    for i in 0..input.len() {
        let mut byte = [0u8; 1];
        d.read_exact(&mut byte).unwrap();
        decoded.push(byte[0]);

        let mut e = Encoder::new(Vec::new(), 3);
        e.write_all(&input[..=i]).unwrap();
        assert_eq!(e.store, d.store, "model diverged after {} bytes", i + 1);
        assert_eq!(e.history, d.history);
    }
    assert_eq!(&decoded[..], &input[..]);
}
