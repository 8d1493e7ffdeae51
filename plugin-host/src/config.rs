//! `key=value` option parsing shared by both cores' configuration.
//!
//! The host hands over a flat argument vector, the way a QEMU TCG plugin
//! receives `-plugin foo,key=value,...`. There is no subcommand structure
//! here, so a hand-rolled parser is used rather than a full CLI framework.

use std::collections::HashMap;

use crate::ConfigError;

/// The raw `key=value` pairs, with helpers that consume keys as each core's
/// config struct reads them. Any key left unconsumed when [`OptionMap::finish`]
/// is called is an unrecognized option.
#[derive(Debug, Default)]
pub struct OptionMap(HashMap<String, String>);

/// Parse `key=value` pairs from an argument vector into an [`OptionMap`].
pub fn parse_options(args: &[String]) -> Result<OptionMap, ConfigError> {
    let mut map = HashMap::with_capacity(args.len());
    for arg in args {
        let (key, value) = arg.split_once('=').ok_or_else(|| ConfigError::InvalidValue {
            key: arg.clone(),
            value: String::new(),
        })?;
        map.insert(key.to_string(), value.to_string());
    }
    Ok(OptionMap(map))
}

impl OptionMap {
    pub fn take_str(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn take_int(&mut self, key: &str, default: u64) -> Result<u64, ConfigError> {
        match self.0.remove(key) {
            None => Ok(default),
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            }),
        }
    }

    pub fn take_bool(&mut self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.0.remove(key) {
            None => Ok(default),
            Some(value) => match value.as_str() {
                "1" | "true" | "on" | "yes" => Ok(true),
                "0" | "false" | "off" | "no" => Ok(false),
                _ => Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value,
                }),
            },
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Fail if any key was never consumed by `take_*`.
    pub fn finish(self) -> Result<(), ConfigError> {
        match self.0.into_iter().next() {
            Some((key, _)) => Err(ConfigError::UnknownKey(key)),
            None => Ok(()),
        }
    }
}
