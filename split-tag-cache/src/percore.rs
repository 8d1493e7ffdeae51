//! Per-core cache triple: each core owns an L1-I, an L1-D, and
//! — the source's faithful, non-shared contract — its own L2. Each cache
//! gets its own mutex; a callback holds at most one at a time.

use std::sync::Mutex;

use cache_core::Cache;

use crate::config::CacheConfig;

pub struct CoreCaches {
    pub l1i: Mutex<Cache>,
    pub l1d: Mutex<Cache>,
    pub l2: Option<Mutex<Cache>>,
}

impl CoreCaches {
    pub fn new(config: &CacheConfig, core_index: usize) -> Result<Self, plugin_host::ConfigError> {
        // Distinct seeds per core and per cache keep the RAND policy's
        // stream independent across caches without sharing a mutex on it.
        let seed_for = |salt: u64| (core_index as u64) * 4 + salt;
        let l1i = Cache::new(config.l1i.geometry()?, config.policy, seed_for(0));
        let l1d = Cache::new(config.l1d.geometry()?, config.policy, seed_for(1));
        let l2 = match &config.l2 {
            Some(geo) => Some(Cache::new(geo.geometry()?, config.policy, seed_for(2))),
            None => None,
        };
        Ok(CoreCaches {
            l1i: Mutex::new(l1i),
            l1d: Mutex::new(l1d),
            l2: l2.map(Mutex::new),
        })
    }
}
