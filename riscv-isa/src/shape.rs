//! The operand-shape classifier: one table lookup by mnemonic,
//! then position-indexed operand extraction — replacing the source's
//! duck-typed per-mnemonic dispatch with a single enum plus a constant table.

use crate::abi::reg_index;
use crate::mnemonics::*;
use crate::tokenize::tokenize;

/// A register operand slot: `Some(index)` or the "unused" sentinel.
pub type RegSlot = Option<u8>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsnShape {
    RdRs1Rs2,
    RdImm,
    RdRs1Imm,
    Rs1Rs2Offset,
    RdOffsetRs1,
    Rs2OffsetRs1,
    AqrlRdRs1,
    AqrlRdRs2Rs1,
    Rs1Rs2,
    RdCsrRs1,
    RdCsrZimm,
    FrdOffsetRs1,
    FrsOffsetRs1,
    Fp,
    None,
}

/// Whether a register operand is known to hold a memory address.
/// Invariant: `Rs1IsAddress` implies `rs1 != None`, enforced at the end of
/// [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressSource {
    None,
    RdIsAddress,
    Rs1IsAddress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub shape: InsnShape,
    pub rd: RegSlot,
    pub rs1: RegSlot,
    pub rs2: RegSlot,
    pub address_source: AddressSource,
}

impl Decoded {
    fn none_shape() -> Self {
        Decoded {
            shape: InsnShape::None,
            rd: None,
            rs1: None,
            rs2: None,
            address_source: AddressSource::None,
        }
    }
}

/// Scan `operands` from `from`, keeping the first `n` tokens that resolve to
/// a register, in the order found. Used for the atomic shapes, where `k`
/// advances past any `.w`/`.d`/`.aq`/`.rl` suffix token until a recognized
/// register name appears.
fn first_registers(operands: &[String], from: usize, n: usize) -> Vec<RegSlot> {
    let mut found = Vec::with_capacity(n);
    for tok in &operands[from.min(operands.len())..] {
        if found.len() == n {
            break;
        }
        if let Some(idx) = reg_index(tok) {
            found.push(Some(idx));
        }
    }
    while found.len() < n {
        found.push(None);
    }
    found
}

/// Classify one instruction's disassembly into its operand shape and
/// extract register operands. A mnemonic matching no table row yields
/// `InsnShape::None` with every register slot unused.
pub fn classify(disas: &str) -> Decoded {
    let tokens = tokenize(disas);
    if tokens.len() < 2 {
        return Decoded::none_shape();
    }
    let mnemonic = tokens[1].as_str();
    let base = mnemonic.split('.').next().unwrap_or(mnemonic);
    let operands = &tokens[2..];
    let reg_at = |i: usize| -> RegSlot { operands.get(i).and_then(|t| reg_index(t)) };

    let mut decoded = if RD_RS1_RS2.contains(&base) {
        Decoded {
            shape: InsnShape::RdRs1Rs2,
            rd: reg_at(0),
            rs1: reg_at(1),
            rs2: reg_at(2),
            address_source: AddressSource::None,
        }
    } else if RD_IMM.contains(&base) {
        Decoded {
            shape: InsnShape::RdImm,
            rd: reg_at(0),
            rs1: None,
            rs2: None,
            address_source: AddressSource::RdIsAddress,
        }
    } else if RD_RS1_IMM.contains(&base) {
        Decoded {
            shape: InsnShape::RdRs1Imm,
            rd: reg_at(0),
            rs1: reg_at(1),
            rs2: None,
            address_source: if base.starts_with('j') {
                AddressSource::Rs1IsAddress
            } else {
                AddressSource::None
            },
        }
    } else if BRANCH.contains(&base) {
        Decoded {
            shape: InsnShape::Rs1Rs2Offset,
            rd: None,
            rs1: reg_at(0),
            rs2: reg_at(1),
            address_source: AddressSource::None,
        }
    } else if LOAD.contains(&base) {
        Decoded {
            shape: InsnShape::RdOffsetRs1,
            rd: reg_at(0),
            rs1: reg_at(2),
            rs2: None,
            address_source: AddressSource::Rs1IsAddress,
        }
    } else if STORE.contains(&base) {
        Decoded {
            shape: InsnShape::Rs2OffsetRs1,
            rd: None,
            rs1: reg_at(2),
            rs2: reg_at(0),
            address_source: AddressSource::Rs1IsAddress,
        }
    } else if base == "lr" {
        let regs = first_registers(operands, 0, 2);
        Decoded {
            shape: InsnShape::AqrlRdRs1,
            rd: None,
            rs1: regs[1],
            rs2: regs[0],
            address_source: AddressSource::Rs1IsAddress,
        }
    } else if base == "sc" || AMO.contains(&base) {
        let regs = first_registers(operands, 0, 3);
        Decoded {
            shape: InsnShape::AqrlRdRs2Rs1,
            rd: regs[0],
            rs1: regs[2],
            rs2: regs[1],
            address_source: AddressSource::Rs1IsAddress,
        }
    } else if base == "sfence" {
        Decoded {
            shape: InsnShape::Rs1Rs2,
            rd: None,
            rs1: reg_at(0),
            rs2: reg_at(1),
            address_source: AddressSource::Rs1IsAddress,
        }
    } else if CSR_RS1.contains(&base) {
        Decoded {
            shape: InsnShape::RdCsrRs1,
            rd: reg_at(0),
            rs1: reg_at(2),
            rs2: None,
            address_source: AddressSource::None,
        }
    } else if CSR_ZIMM.contains(&base) {
        Decoded {
            shape: InsnShape::RdCsrZimm,
            rd: reg_at(1),
            rs1: None,
            rs2: None,
            address_source: AddressSource::None,
        }
    } else if FLOAT_LOAD.contains(&base) {
        Decoded {
            shape: InsnShape::FrdOffsetRs1,
            rd: None,
            rs1: reg_at(2),
            rs2: None,
            address_source: AddressSource::Rs1IsAddress,
        }
    } else if FLOAT_STORE.contains(&base) {
        Decoded {
            shape: InsnShape::FrsOffsetRs1,
            rd: None,
            rs1: reg_at(2),
            rs2: None,
            address_source: AddressSource::Rs1IsAddress,
        }
    } else if FP.contains(&base) {
        Decoded {
            shape: InsnShape::Fp,
            rd: None,
            rs1: None,
            rs2: None,
            address_source: AddressSource::None,
        }
    } else if NONE.contains(&base) {
        Decoded::none_shape()
    } else {
        // DecodeMiss: unmatched mnemonic, logged by the caller.
        Decoded::none_shape()
    };

    if decoded.address_source == AddressSource::Rs1IsAddress && decoded.rs1.is_none() {
        decoded.address_source = AddressSource::None;
    }
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_auipc_as_address_source() {
        let d = classify("00000517 auipc a0,0x1000");
        assert_eq!(d.shape, InsnShape::RdImm);
        assert_eq!(d.rd, Some(10));
        assert_eq!(d.address_source, AddressSource::RdIsAddress);
    }

    #[test]
    fn classifies_addi_with_no_address_source() {
        let d = classify("00150513 addi a0,a0,1");
        assert_eq!(d.shape, InsnShape::RdRs1Imm);
        assert_eq!(d.rd, Some(10));
        assert_eq!(d.rs1, Some(10));
        assert_eq!(d.address_source, AddressSource::None);
    }

    #[test]
    fn classifies_jalr_as_address_source() {
        let d = classify("000080e7 jalr ra");
        assert_eq!(d.shape, InsnShape::RdRs1Imm);
        assert_eq!(d.rs1, Some(1));
        assert_eq!(d.address_source, AddressSource::Rs1IsAddress);
    }

    #[test]
    fn classifies_load_rs1_as_address() {
        let d = classify("0005b583 ld a1,0(a0)");
        assert_eq!(d.shape, InsnShape::RdOffsetRs1);
        assert_eq!(d.rd, Some(11));
        assert_eq!(d.rs1, Some(10));
        assert_eq!(d.address_source, AddressSource::Rs1IsAddress);
    }

    #[test]
    fn classifies_store_rs2_and_rs1() {
        let d = classify("00b53023 sd a1,0(a0)");
        assert_eq!(d.shape, InsnShape::Rs2OffsetRs1);
        assert_eq!(d.rs2, Some(11));
        assert_eq!(d.rs1, Some(10));
        assert_eq!(d.address_source, AddressSource::Rs1IsAddress);
    }

    #[test]
    fn classifies_branch_with_no_address_source() {
        let d = classify("00b50863 beq a0,a1,8");
        assert_eq!(d.shape, InsnShape::Rs1Rs2Offset);
        assert_eq!(d.rs1, Some(10));
        assert_eq!(d.rs2, Some(11));
        assert_eq!(d.address_source, AddressSource::None);
    }

    #[test]
    fn classifies_amo_shape() {
        let d = classify("1a55352f amoadd.w.aq a0,a1,(a2)");
        assert_eq!(d.shape, InsnShape::AqrlRdRs2Rs1);
        assert_eq!(d.rd, Some(10));
        assert_eq!(d.rs2, Some(11));
        assert_eq!(d.rs1, Some(12));
        assert_eq!(d.address_source, AddressSource::Rs1IsAddress);
    }

    #[test]
    fn unmatched_mnemonic_is_none_shape_with_unused_registers() {
        let d = classify("00000000 notreal a0,a1");
        assert_eq!(d.shape, InsnShape::None);
        assert_eq!(d.rd, None);
        assert_eq!(d.rs1, None);
        assert_eq!(d.rs2, None);
        assert_eq!(d.address_source, AddressSource::None);
    }
}
