//! Integration tests exercising riscv-isa's public API only.

use riscv_isa::{classify, reg_index, AddressSource, InsnShape};

#[test]
fn auipc_addi_ld_chain_classifies_as_walker_expects() {
    let auipc = classify("00000517 auipc a0,0x1000");
    assert_eq!(auipc.shape, InsnShape::RdImm);
    assert_eq!(auipc.address_source, AddressSource::RdIsAddress);

    let addi = classify("00150513 addi a0,a0,32");
    assert_eq!(addi.shape, InsnShape::RdRs1Imm);
    assert_eq!(addi.address_source, AddressSource::None);
    assert_eq!(addi.rd, reg_index("a0"));
    assert_eq!(addi.rs1, reg_index("a0"));

    let ld = classify("0005b583 ld a1,0(a0)");
    assert_eq!(ld.shape, InsnShape::RdOffsetRs1);
    assert_eq!(ld.address_source, AddressSource::Rs1IsAddress);
    assert_eq!(ld.rs1, reg_index("a0"));
}

#[test]
fn csr_instructions_carry_no_address_source() {
    let d = classify("10079073 csrrw zero,sstatus,a5");
    assert_eq!(d.shape, InsnShape::RdCsrRs1);
    assert_eq!(d.address_source, AddressSource::None);
}

#[test]
fn fence_and_ecall_are_shape_none() {
    assert_eq!(classify("0000000f fence").shape, InsnShape::None);
    assert_eq!(classify("00000073 ecall").shape, InsnShape::None);
}
