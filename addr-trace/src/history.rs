//! Per-CPU instruction history: an append-only arena, not an intrusive
//! linked list, so the backward scan in the dependency walker is a plain
//! slice search instead of a pointer chase.

use crate::decode::InsnDecode;

#[derive(Default)]
pub struct History {
    entries: Vec<InsnDecode>,
}

impl History {
    pub fn new() -> Self {
        History { entries: Vec::new() }
    }

    /// Append a newly-executed instruction and return its position, which
    /// the caller uses as the starting cursor for a dependency walk.
    pub fn record(&mut self, decode: InsnDecode) -> usize {
        self.entries.push(decode);
        self.entries.len() - 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, pos: usize) -> &InsnDecode {
        &self.entries[pos]
    }

    /// Search strictly older than `before`, newest-to-oldest, for the first
    /// entry whose `rd` equals `register_index`.
    pub fn find_producer(&self, before: usize, register_index: u8) -> Option<usize> {
        self.entries[..before]
            .iter()
            .enumerate()
            .rev()
            .find(|(_, d)| d.rd == Some(register_index))
            .map(|(i, _)| i)
    }
}
