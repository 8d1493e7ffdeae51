//! The host contract.

/// Static facts about the host a core needs at install time.
pub trait Host {
    /// Whether the guest runs under system emulation (vs. user-mode).
    fn system_mode(&self) -> bool;
    /// Number of virtual CPUs the host schedules callbacks from.
    fn vcpu_count(&self) -> usize;
}

/// A decoded instruction as the host presents it during translation.
///
/// Borrowed for the duration of the translation-time callback only; a core
/// that needs the data past that point must copy what it needs into its own
/// registry (see `InsnRecord` / `InsnDecode` in the respective cores).
#[derive(Debug, Clone, Copy)]
pub struct InsnInfo<'a> {
    pub disas: &'a str,
    pub vaddr: u64,
    pub opcode: [u8; 4],
    /// Host-address-mapped pointer, when the host can provide one.
    pub host_addr: Option<u64>,
    pub symbol: Option<&'a str>,
}

/// A resolved memory access as the host presents it at execution time.
#[derive(Debug, Clone, Copy)]
pub struct MemAccessInfo {
    pub vaddr: u64,
    /// Physical/hardware address, when the host can resolve one.
    pub hwaddr: Option<u64>,
    pub is_io: bool,
}

/// What the host drives into a core. `Handle` is the core's own stable
/// identifier for a translated instruction — an arena index or interned
/// handle the core mints itself, never a host-owned pointer.
pub trait Plugin: Send + Sync {
    type Handle: Clone + Send + Sync;

    /// Called once per decoded instruction at translation time.
    fn on_translate(&self, insn: &InsnInfo<'_>) -> Self::Handle;

    /// Called every time the instruction executes, tagged with the
    /// executing vCPU index.
    fn on_execute(&self, cpu_index: usize, handle: &Self::Handle);

    /// Called for every memory access the instruction performs.
    fn on_mem_access(&self, cpu_index: usize, handle: &Self::Handle, access: &MemAccessInfo);

    /// Called once at host exit.
    fn on_exit(&self);
}
