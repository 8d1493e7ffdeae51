//! addr-trace: the ADDR-TRACE analysis core. Classifies each executed
//! instruction's operand shape, records it into a per-CPU history, and on
//! any address-consuming instruction walks that history backward to print
//! the chain of instructions that computed the effective address.

mod decode;
mod history;
mod plugin;
mod walker;

pub use decode::{DecodeHandle, InsnDecode};
pub use history::History;
pub use plugin::AddrTracer;
pub use walker::{walk_chain, SEPARATOR};
