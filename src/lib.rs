#![deny(missing_docs)]

//! Lossless byte-stream compression using Prediction by Partial Matching
//! over a binary arithmetic coder.

pub use self::ppm::{Decoder, Encoder};

pub mod bits;

/// Entropy coder family
// http://en.wikipedia.org/wiki/Entropy_encoding
pub mod entropy {
    pub mod ari;
}

pub mod ppm;
