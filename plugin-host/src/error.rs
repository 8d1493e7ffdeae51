//! Error taxonomy. Only install-time failures are `Result` errors;
//! `DecodeMiss` and `RuntimeSkip` are logged-and-skipped control flow, not
//! propagated (see the cores' own modules).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unrecognized option `{0}`")]
    UnknownKey(String),

    #[error("invalid value `{value}` for option `{key}`")]
    InvalidValue { key: String, value: String },

    #[error("`{field}` must be a power of two, got {value}")]
    NotPowerOfTwo { field: &'static str, value: u64 },

    #[error(
        "cache geometry invalid: cachesize ({cachesize}) must equal \
         num_sets * assoc * blksize ({computed})"
    )]
    GeometryMismatch { cachesize: u64, computed: u64 },

    #[error("unknown eviction policy `{0}`")]
    UnknownPolicy(String),
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to allocate {what}: {reason}")]
    Allocation { what: &'static str, reason: String },
}
