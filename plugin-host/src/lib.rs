//! plugin-host: the boundary between an analysis core and its emulator host.
//!
//! The host (an emulator such as QEMU) is an external collaborator: it
//! enumerates decoded instructions per translation block and drives
//! per-instruction and per-memory-access callbacks at execution time. This
//! crate only describes that boundary — [`Host`] is what a core expects from
//! the host, [`Plugin`] is what the host expects from a core — plus the
//! `key=value` configuration format and error taxonomy both cores share.

mod config;
mod error;
mod host;

pub use config::{parse_options, OptionMap};
pub use error::{ConfigError, ResourceError};
pub use host::{Host, InsnInfo, MemAccessInfo, Plugin};
