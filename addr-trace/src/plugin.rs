//! Binds decode + history + walker to the host's `Plugin` trait.

use std::sync::Mutex;

use log::info;
use plugin_host::{Host, InsnInfo, MemAccessInfo, Plugin};
use riscv_isa::AddressSource;

use crate::decode::{DecodeHandle, InsnDecode};
use crate::history::History;
use crate::walker::walk_chain;

pub struct AddrTracer {
    histories: Vec<Mutex<History>>,
}

impl AddrTracer {
    /// ADDR-TRACE takes no configuration options of its own; any `key=value`
    /// pair handed in is therefore an unrecognized key.
    pub fn install(args: &[String], host: &dyn Host) -> Result<Self, plugin_host::ConfigError> {
        let opts = plugin_host::parse_options(args)?;
        opts.finish()?;

        let vcpus = host.vcpu_count().max(1);
        let histories = (0..vcpus).map(|_| Mutex::new(History::new())).collect();
        info!("addr-trace installed: {vcpus} vCPU history lane(s)");
        Ok(AddrTracer { histories })
    }

    fn history_for(&self, cpu_index: usize) -> &Mutex<History> {
        &self.histories[cpu_index % self.histories.len()]
    }
}

impl Plugin for AddrTracer {
    type Handle = DecodeHandle;

    fn on_translate(&self, insn: &InsnInfo<'_>) -> Self::Handle {
        DecodeHandle::new(InsnDecode::from_insn(insn))
    }

    fn on_execute(&self, cpu_index: usize, handle: &Self::Handle) {
        let mut history = self.history_for(cpu_index).lock().expect("history mutex poisoned");
        let pos = history.record(handle.as_ref().clone());
        if handle.address_source == AddressSource::Rs1IsAddress {
            walk_chain(&history, pos, &mut |line| eprintln!("{line}"));
        }
    }

    fn on_mem_access(&self, _cpu_index: usize, _handle: &Self::Handle, _access: &MemAccessInfo) {
        // ADDR-TRACE's chains are keyed off the executing instruction's own
        // operand shape, not the resolved memory access, so there is
        // nothing to do here.
    }

    fn on_exit(&self) {
        info!("addr-trace exiting");
    }
}
