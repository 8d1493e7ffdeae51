//! The instruction registry: `InsnRecord`s interned by
//! effective address, mutated under a mutex only at translation time; their
//! counters are mutated lock-free by execution callbacks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use plugin_host::InsnInfo;

/// Which magic marker, if any, this instruction's raw opcode matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagicKind {
    Start,
    Stop,
}

pub const MAGIC_START: u32 = 0xc010_2073;
pub const MAGIC_STOP: u32 = 0xc000_2073;

fn magic_kind_of(opcode: [u8; 4]) -> Option<MagicKind> {
    match u32::from_le_bytes(opcode) {
        MAGIC_START => Some(MagicKind::Start),
        MAGIC_STOP => Some(MagicKind::Stop),
        _ => None,
    }
}

#[derive(Debug)]
pub struct InsnRecord {
    pub vaddr: u64,
    pub disas: String,
    pub symbol: Option<String>,
    pub host_addr: Option<u64>,
    pub magic: Option<MagicKind>,
    pub l1_imisses: AtomicU64,
    pub l1_dmisses: AtomicU64,
    pub l1_iinvals: AtomicU64,
    pub l1_dinvals: AtomicU64,
    pub l2_misses: AtomicU64,
    pub l2_invals: AtomicU64,
}

impl InsnRecord {
    fn new(insn: &InsnInfo<'_>) -> Self {
        InsnRecord {
            vaddr: insn.vaddr,
            disas: insn.disas.to_string(),
            symbol: insn.symbol.map(str::to_string),
            host_addr: insn.host_addr,
            magic: magic_kind_of(insn.opcode),
            l1_imisses: AtomicU64::new(0),
            l1_dmisses: AtomicU64::new(0),
            l1_iinvals: AtomicU64::new(0),
            l1_dinvals: AtomicU64::new(0),
            l2_misses: AtomicU64::new(0),
            l2_invals: AtomicU64::new(0),
        }
    }

    pub fn reset_counters(&self) {
        self.l1_imisses.store(0, Ordering::Relaxed);
        self.l1_dmisses.store(0, Ordering::Relaxed);
        self.l1_iinvals.store(0, Ordering::Relaxed);
        self.l1_dinvals.store(0, Ordering::Relaxed);
        self.l2_misses.store(0, Ordering::Relaxed);
        self.l2_invals.store(0, Ordering::Relaxed);
    }
}

/// Handle passed across the host boundary. Wrapping an `Arc` means the
/// registry, not the host, owns the record's lifetime.
pub type InsnHandle = Arc<InsnRecord>;

#[derive(Default)]
pub struct Registry {
    table: Mutex<HashMap<u64, InsnHandle>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            table: Mutex::new(HashMap::new()),
        }
    }

    /// Look up or create the record for this instruction's effective
    /// address. Held only for the duration of the lookup/insert.
    pub fn intern(&self, insn: &InsnInfo<'_>) -> InsnHandle {
        let mut table = self.table.lock().expect("registry mutex poisoned");
        table
            .entry(insn.vaddr)
            .or_insert_with(|| Arc::new(InsnRecord::new(insn)))
            .clone()
    }

    pub fn snapshot(&self) -> Vec<InsnHandle> {
        self.table
            .lock()
            .expect("registry mutex poisoned")
            .values()
            .cloned()
            .collect()
    }
}
