//! The split-tag cache engine itself. A `Cache` is plain data —
//! the per-core layer in the `split-tag-cache` crate wraps each instance in
//! its own mutex; nothing here is thread-safe on its own.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::geometry::Geometry;
use crate::policy::Policy;
use crate::set::CacheSet;
use crate::status::AccessStatus;

pub struct Cache {
    pub geometry: Geometry,
    pub policy: Policy,
    sets: Vec<CacheSet>,
    rng: StdRng,
    pub accesses: u64,
    pub misses: u64,
    pub invalidations: u64,
}

impl Cache {
    pub fn new(geometry: Geometry, policy: Policy, seed: u64) -> Self {
        let num_sets = geometry.num_sets;
        let assoc = geometry.assoc;
        Cache {
            geometry,
            policy,
            sets: (0..num_sets).map(|_| CacheSet::new(assoc, policy)).collect(),
            rng: StdRng::seed_from_u64(seed),
            accesses: 0,
            misses: 0,
            invalidations: 0,
        }
    }

    /// Look up `addr`, installing it on a miss. Returns the 2-bit status so the caller can drive its
    /// own per-instruction counters.
    pub fn access(&mut self, addr: u64) -> AccessStatus {
        self.accesses += 1;
        let (high, set_idx, low) = self.geometry.decompose(addr);
        let set = &mut self.sets[set_idx as usize];

        if set.high_tag != Some(high) {
            set.invalidate_all();
            set.high_tag = Some(high);
            self.invalidations += 1;
            self.misses += 1;
            let idx = set.choose_install_target(&mut self.rng);
            set.record_install(idx, low);
            return AccessStatus::MISS | AccessStatus::INVALIDATION;
        }

        if let Some(idx) = set.find_valid(low) {
            set.record_hit(idx);
            return AccessStatus::empty();
        }

        self.misses += 1;
        let idx = set.choose_install_target(&mut self.rng);
        set.record_install(idx, low);
        AccessStatus::MISS
    }

    pub fn miss_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.misses as f64 / self.accesses as f64 * 100.0
        }
    }
}
