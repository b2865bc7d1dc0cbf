/*!

Adaptive context models for the PPM driver.

Each context (a suffix of the recent history) owns a frequency table over
the symbols seen after it, plus the escape sentinel. Tables preserve the
order in which symbols were first observed: cumulative ranges are built by
walking that order, so it is part of the coded format, not an
implementation detail. Encoder and decoder grow their stores through the
same sequence of increments and therefore agree on every range.

*/

use std::collections::HashMap;

use crate::entropy::ari::{Border, Model};

/// A coded symbol: a plain byte, or the escape sentinel that defers to a
/// shorter context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    /// A literal byte value
    Byte(u8),
    /// Fall back to the next shorter context
    Escape,
}

/// A frequency table for one context, in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FreqTable {
    /// symbol counts in insertion order
    entries: Vec<(Symbol, Border)>,
    /// sum of all counts
    total: Border,
}

impl FreqTable {
    /// Create an empty table
    pub fn new() -> FreqTable {
        FreqTable::default()
    }

    /// Check whether a symbol has been counted under this context
    pub fn contains(&self, symbol: Symbol) -> bool {
        self.entries.iter().any(|&(s, _)| s == symbol)
    }

    /// Return the count of a symbol, zero if absent
    pub fn count(&self, symbol: Symbol) -> Border {
        self.entries
            .iter()
            .find(|&&(s, _)| s == symbol)
            .map_or(0, |&(_, count)| count)
    }

    /// Add one to a symbol's count, appending it to the order on first
    /// sight
    pub fn increment(&mut self, symbol: Symbol) {
        match self.entries.iter_mut().find(|entry| entry.0 == symbol) {
            Some(entry) => entry.1 += 1,
            None => self.entries.push((symbol, 1)),
        }
        self.total += 1;
    }
}

impl Model<Symbol> for FreqTable {
    fn get_range(&self, value: Symbol) -> (Border, Border) {
        let mut from = 0;
        for &(symbol, count) in self.entries.iter() {
            if symbol == value {
                return (from, from + count);
            }
            from += count;
        }
        panic!("no frequency recorded for {:?}", value)
    }

    fn find_value(&self, offset: Border) -> (Symbol, Border, Border) {
        assert!(
            offset < self.total,
            "invalid frequency offset {} requested under total {}",
            offset,
            self.total
        );
        let mut from = 0;
        for &(symbol, count) in self.entries.iter() {
            if offset < from + count {
                return (symbol, from, from + count);
            }
            from += count;
        }
        unreachable!()
    }

    fn get_denominator(&self) -> Border {
        self.total
    }
}

/// All context tables of one stream, keyed by materialized history
/// suffixes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContextStore {
    contexts: HashMap<Vec<u8>, FreqTable>,
}

impl ContextStore {
    /// Create an empty store
    pub fn new() -> ContextStore {
        ContextStore::default()
    }

    /// Look up the table of a context, if any symbol was counted under it
    pub fn table(&self, key: &[u8]) -> Option<&FreqTable> {
        self.contexts.get(key)
    }

    /// Add one to a symbol's count under a context, creating the table on
    /// first touch
    pub fn increment(&mut self, key: &[u8], symbol: Symbol) {
        match self.contexts.get_mut(key) {
            Some(table) => table.increment(symbol),
            None => {
                let mut table = FreqTable::new();
                table.increment(symbol);
                self.contexts.insert(key.to_vec(), table);
            }
        }
    }
}

/// The sliding window of the most recent bytes, bounded by the context
/// order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct History {
    bytes: Vec<u8>,
    limit: usize,
}

impl History {
    /// Create an empty window holding at most `limit` bytes
    pub fn new(limit: usize) -> History {
        History {
            bytes: Vec::with_capacity(limit),
            limit,
        }
    }

    /// Number of bytes currently held
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// The last `len` bytes, usable as a context key
    pub fn suffix(&self, len: usize) -> &[u8] {
        &self.bytes[self.bytes.len() - len..]
    }

    /// Append a byte, dropping the oldest one beyond the limit
    pub fn push(&mut self, byte: u8) {
        if self.limit == 0 {
            return;
        }
        if self.bytes.len() == self.limit {
            self.bytes.remove(0);
        }
        self.bytes.push(byte);
    }
}

/// The terminal fallback: every byte value equally likely, total 256.
/// Never adapted.
pub struct Uniform;

impl Model<u8> for Uniform {
    fn get_range(&self, value: u8) -> (Border, Border) {
        (value as Border, value as Border + 1)
    }

    fn find_value(&self, offset: Border) -> (u8, Border, Border) {
        assert!(offset < 256, "invalid byte offset {}", offset);
        (offset as u8, offset, offset + 1)
    }

    fn get_denominator(&self) -> Border {
        256
    }
}
