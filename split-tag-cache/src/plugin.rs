//! Ties the cache engine, the per-core access path, the registry, and the
//! magic-opcode gate together behind the `Plugin` trait.

use std::sync::atomic::Ordering;

use cache_core::AccessStatus;
use log::{debug, info, warn};
use plugin_host::{Host, InsnInfo, MemAccessInfo, Plugin};

use crate::config::CacheConfig;
use crate::magic::MagicGate;
use crate::percore::CoreCaches;
use crate::registry::{InsnHandle, MagicKind, Registry};
use crate::stats::{render_core_table, render_top_n, CoreRow};

pub struct SplitTagCache {
    config: CacheConfig,
    registry: Registry,
    cores: Vec<CoreCaches>,
    system_mode: bool,
    magic: Option<MagicGate>,
}

impl SplitTagCache {
    pub fn install(args: &[String], host: &dyn Host) -> Result<Self, plugin_host::ConfigError> {
        let config = CacheConfig::parse(args, host.vcpu_count())?;
        let cores = (0..config.cores.max(1))
            .map(|i| CoreCaches::new(&config, i))
            .collect::<Result<Vec<_>, _>>()?;
        let magic = config.magic.then(MagicGate::new);
        info!(
            "split-tag-cache installed: {} core(s), l2={}, policy={:?}",
            cores.len(),
            config.l2.is_some(),
            config.policy
        );
        Ok(SplitTagCache {
            config,
            registry: Registry::new(),
            cores,
            system_mode: host.system_mode(),
            magic,
        })
    }

    fn core_for(&self, cpu_index: usize) -> &CoreCaches {
        &self.cores[cpu_index % self.cores.len()]
    }

    fn dump_and_reset(&self) {
        info!("{}", self.render_report());
        for rec in self.registry.snapshot() {
            rec.reset_counters();
        }
    }

    fn render_report(&self) -> String {
        let has_l2 = self.config.l2.is_some();
        let rows: Vec<CoreRow> = self
            .cores
            .iter()
            .enumerate()
            .map(|(i, core)| {
                let l1i = core.l1i.lock().expect("l1i mutex poisoned");
                let l1d = core.l1d.lock().expect("l1d mutex poisoned");
                let (l2_accesses, l2_misses, l2_invals) = match &core.l2 {
                    Some(l2) => {
                        let l2 = l2.lock().expect("l2 mutex poisoned");
                        (Some(l2.accesses), Some(l2.misses), Some(l2.invalidations))
                    }
                    None => (None, None, None),
                };
                CoreRow {
                    core: i,
                    d_accesses: l1d.accesses,
                    d_misses: l1d.misses,
                    d_invals: l1d.invalidations,
                    i_accesses: l1i.accesses,
                    i_misses: l1i.misses,
                    i_invals: l1i.invalidations,
                    l2_accesses,
                    l2_misses,
                    l2_invals,
                }
            })
            .collect();

        let mut out = render_core_table(&rows);
        out.push('\n');
        out.push_str(&render_top_n(
            &self.registry.snapshot(),
            self.config.limit,
            has_l2,
        ));
        out
    }
}

impl Plugin for SplitTagCache {
    type Handle = InsnHandle;

    fn on_translate(&self, insn: &InsnInfo<'_>) -> Self::Handle {
        self.registry.intern(insn)
    }

    fn on_execute(&self, cpu_index: usize, handle: &Self::Handle) {
        if let Some(gate) = &self.magic {
            match handle.magic {
                Some(MagicKind::Start) => {
                    gate.start();
                    return;
                }
                Some(MagicKind::Stop) => {
                    self.dump_and_reset();
                    gate.stop();
                    return;
                }
                None => {}
            }
            if !gate.is_active() {
                return; // RuntimeSkip: outside the instrumentation window.
            }
        }

        let addr = if self.system_mode {
            handle.host_addr.unwrap_or(handle.vaddr)
        } else {
            handle.vaddr
        };
        let core = self.core_for(cpu_index);
        let status = core.l1i.lock().expect("l1i mutex poisoned").access(addr);
        if status.contains(AccessStatus::MISS) {
            handle.l1_imisses.fetch_add(1, Ordering::Relaxed);
            debug!("l1i miss @ 0x{addr:x} ({})", handle.disas);
        }
        if status.contains(AccessStatus::INVALIDATION) {
            handle.l1_iinvals.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn on_mem_access(&self, cpu_index: usize, handle: &Self::Handle, access: &MemAccessInfo) {
        if access.is_io {
            return; // RuntimeSkip
        }
        if let Some(gate) = &self.magic {
            if !gate.is_active() {
                return;
            }
        }

        let addr = access.hwaddr.unwrap_or(access.vaddr);
        let core = self.core_for(cpu_index);
        let status = core.l1d.lock().expect("l1d mutex poisoned").access(addr);
        let missed = status.contains(AccessStatus::MISS);
        if missed {
            handle.l1_dmisses.fetch_add(1, Ordering::Relaxed);
        }
        if status.contains(AccessStatus::INVALIDATION) {
            handle.l1_dinvals.fetch_add(1, Ordering::Relaxed);
        }

        if missed {
            if let Some(l2) = &core.l2 {
                let status = l2.lock().expect("l2 mutex poisoned").access(addr);
                if status.contains(AccessStatus::MISS) {
                    handle.l2_misses.fetch_add(1, Ordering::Relaxed);
                }
                if status.contains(AccessStatus::INVALIDATION) {
                    handle.l2_invals.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
    }

    fn on_exit(&self) {
        info!("{}", self.render_report());
        if self.registry.snapshot().is_empty() {
            warn!("split-tag-cache exiting with no instructions ever translated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeHost {
        system_mode: bool,
        vcpus: usize,
    }

    impl Host for FakeHost {
        fn system_mode(&self) -> bool {
            self.system_mode
        }
        fn vcpu_count(&self) -> usize {
            self.vcpus
        }
    }

    fn insn(vaddr: u64, disas: &'static str) -> InsnInfo<'static> {
        InsnInfo {
            disas,
            vaddr,
            opcode: [0, 0, 0, 0],
            host_addr: None,
            symbol: None,
        }
    }

    #[test]
    fn cold_then_hot_fetch_updates_counters() {
        let host = FakeHost { system_mode: false, vcpus: 1 };
        let plugin = SplitTagCache::install(&[], &host).unwrap();
        let handle = plugin.on_translate(&insn(0x1000, "00150513 addi a0,a0,1"));
        plugin.on_execute(0, &handle);
        plugin.on_execute(0, &handle);
        assert_eq!(handle.l1_imisses.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn io_access_is_skipped() {
        let host = FakeHost { system_mode: false, vcpus: 1 };
        let plugin = SplitTagCache::install(&[], &host).unwrap();
        let handle = plugin.on_translate(&insn(0x1000, "0005b583 ld a1,0(a0)"));
        plugin.on_mem_access(
            0,
            &handle,
            &MemAccessInfo {
                vaddr: 0x4000,
                hwaddr: Some(0x4000),
                is_io: true,
            },
        );
        assert_eq!(handle.l1_dmisses.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn magic_window_gates_counting() {
        let host = FakeHost { system_mode: false, vcpus: 1 };
        let plugin =
            SplitTagCache::install(&["magic=true".to_string()], &host).unwrap();

        let pre = plugin.on_translate(&insn(0x1000, "00150513 addi a0,a0,1"));
        plugin.on_execute(0, &pre);
        assert_eq!(pre.l1_imisses.load(Ordering::Relaxed), 0);

        let start = plugin.on_translate(&InsnInfo {
            disas: "c0102073 rdtime zero",
            vaddr: 0x1004,
            opcode: crate::registry::MAGIC_START.to_le_bytes(),
            host_addr: None,
            symbol: None,
        });
        plugin.on_execute(0, &start);

        let during = plugin.on_translate(&insn(0x1008, "00150513 addi a0,a0,1"));
        plugin.on_execute(0, &during);
        assert_eq!(during.l1_imisses.load(Ordering::Relaxed), 1);

        let stop = plugin.on_translate(&InsnInfo {
            disas: "c0002073 rdcycle zero",
            vaddr: 0x100c,
            opcode: crate::registry::MAGIC_STOP.to_le_bytes(),
            host_addr: None,
            symbol: None,
        });
        plugin.on_execute(0, &stop);
        assert_eq!(during.l1_imisses.load(Ordering::Relaxed), 0); // dumped and reset

        let post = plugin.on_translate(&insn(0x1010, "00150513 addi a0,a0,1"));
        plugin.on_execute(0, &post);
        assert_eq!(post.l1_imisses.load(Ordering::Relaxed), 0);
    }
}
