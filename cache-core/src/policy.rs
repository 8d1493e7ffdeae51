//! Eviction policy as a tagged variant.

use std::str::FromStr;

use plugin_host::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Lru,
    Fifo,
    Rand,
}

impl FromStr for Policy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lru" => Ok(Policy::Lru),
            "fifo" => Ok(Policy::Fifo),
            "rand" => Ok(Policy::Rand),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}
