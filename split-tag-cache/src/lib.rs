//! split-tag-cache: the SPLIT-TAG CACHE analysis core.
//! A multi-level, multi-core cache simulator over a split-tag addressing
//! scheme, with pluggable eviction, an optional instrumentation window, and
//! aggregated miss statistics including a top-N worst-offender report.

mod config;
mod magic;
mod percore;
mod plugin;
mod registry;
mod stats;

pub use config::{CacheConfig, CacheGeometryConfig};
pub use plugin::SplitTagCache;
pub use registry::{InsnHandle, InsnRecord, MagicKind};
pub use stats::{render_core_table, render_top_n, CoreRow};
