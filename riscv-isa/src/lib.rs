//! riscv-isa: ABI register naming and the RISC-V mnemonic → operand-shape
//! classifier used by the ADDR-TRACE core.

mod abi;
mod mnemonics;
mod shape;
mod tokenize;

pub use abi::{reg_index, ABI_NAMES};
pub use shape::{classify, AddressSource, Decoded, InsnShape, RegSlot};
pub use tokenize::tokenize;
