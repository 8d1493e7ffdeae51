//! The backward dependency walk: starting from an address-consuming
//! instruction, follow producer links through `rs1`/`rs2` until a register
//! is synthesized from an immediate.

use riscv_isa::AddressSource;

use crate::history::History;

pub const SEPARATOR: &str = "@@@@@@@@@@@@@@@@@";

/// Trace the dependency chain for the instruction at `trigger_pos` in
/// `history`, calling `emit` with `(vaddr, disassembly)` for the trigger and
/// every producer found, then one final call with the separator line.
///
/// `trigger_pos` must be the position `history.record()` returned for this
/// instruction; it must have `address_source = rs1-is-address`.
pub fn walk_chain(history: &History, trigger_pos: usize, emit: &mut dyn FnMut(&str)) {
    let trigger = history.get(trigger_pos);
    debug_assert_eq!(trigger.address_source, AddressSource::Rs1IsAddress);

    emit_line(trigger.vaddr, &trigger.disas, emit);
    let mut last_emitted = Some(trigger.vaddr);

    if let Some(rs1) = trigger.rs1 {
        trace(history, trigger_pos, rs1, &mut last_emitted, emit);
    }

    emit(SEPARATOR);
}

fn trace(
    history: &History,
    before: usize,
    register_index: u8,
    last_emitted: &mut Option<u64>,
    emit: &mut dyn FnMut(&str),
) {
    let Some(producer_pos) = history.find_producer(before, register_index) else {
        return;
    };
    let producer = history.get(producer_pos);

    if *last_emitted != Some(producer.vaddr) {
        emit_line(producer.vaddr, &producer.disas, emit);
        *last_emitted = Some(producer.vaddr);
    }

    if producer.address_source == AddressSource::RdIsAddress {
        return;
    }

    if let Some(rs1) = producer.rs1 {
        trace(history, producer_pos, rs1, last_emitted, emit);
    }
    if let Some(rs2) = producer.rs2 {
        trace(history, producer_pos, rs2, last_emitted, emit);
    }
}

fn emit_line(vaddr: u64, disas: &str, emit: &mut dyn FnMut(&str)) {
    emit(&format!("0x{vaddr:08x} {disas}"));
}
