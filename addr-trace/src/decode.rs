//! One decoded instruction as ADDR-TRACE records it, plus the stable handle
//! passed back across the host boundary.

use std::sync::Arc;

use log::warn;
use plugin_host::InsnInfo;
use riscv_isa::{classify, AddressSource, InsnShape, RegSlot};

#[derive(Debug, Clone)]
pub struct InsnDecode {
    pub vaddr: u64,
    pub disas: String,
    pub shape: InsnShape,
    pub rd: RegSlot,
    pub rs1: RegSlot,
    pub rs2: RegSlot,
    pub address_source: AddressSource,
}

impl InsnDecode {
    pub fn from_insn(insn: &InsnInfo<'_>) -> Self {
        let decoded = classify(insn.disas);
        if decoded.shape == InsnShape::None && decoded.rd.is_none() {
            // Either a genuine no-operand instruction or an unmatched
            // mnemonic; both leave every register unused, so a DecodeMiss
            // is silent here rather than double-logged. classify() already
            // zero-initializes instead of reading uninitialized state.
            if !is_known_no_operand(insn.disas) {
                warn!("unrecognized mnemonic, skipping: {}", insn.disas);
            }
        }
        InsnDecode {
            vaddr: insn.vaddr,
            disas: insn.disas.to_string(),
            shape: decoded.shape,
            rd: decoded.rd,
            rs1: decoded.rs1,
            rs2: decoded.rs2,
            address_source: decoded.address_source,
        }
    }
}

fn is_known_no_operand(disas: &str) -> bool {
    let mnemonic = disas.split_whitespace().nth(1).unwrap_or("");
    matches!(
        mnemonic.split('.').next().unwrap_or(mnemonic),
        "fence" | "ecall" | "ebreak" | "wfi"
    )
}

/// Handle ADDR-TRACE hands the host in place of a raw pointer; the analysis
/// owns this record's lifetime independently of the host's translation cache.
pub type DecodeHandle = Arc<InsnDecode>;
