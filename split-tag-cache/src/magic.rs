//! The optional instrumentation window gated by magic opcodes.
//!
//! "The 'magic opcode found' flag is a single write-rare boolean; races on
//! it may cause a bounded delay in start/stop taking effect but no data
//! corruption" — a plain `AtomicBool` with relaxed ordering is
//! exactly that contract.

use std::sync::atomic::{AtomicBool, Ordering};

pub struct MagicGate {
    active: AtomicBool,
}

impl MagicGate {
    pub fn new() -> Self {
        MagicGate {
            active: AtomicBool::new(false),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    pub fn start(&self) {
        self.active.store(true, Ordering::Relaxed);
    }

    pub fn stop(&self) {
        self.active.store(false, Ordering::Relaxed);
    }
}

impl Default for MagicGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_inactive_and_toggles() {
        let gate = MagicGate::new();
        assert!(!gate.is_active());
        gate.start();
        assert!(gate.is_active());
        gate.stop();
        assert!(!gate.is_active());
    }
}
