//! Integration tests exercising cache-core's public API only.

use cache_core::{AccessStatus, Cache, Geometry, Policy};

fn cache(policy: Policy) -> Cache {
    Cache::new(Geometry::new(64, 2, 256, 4).unwrap(), policy, 7)
}

#[test]
fn invalid_geometry_is_rejected_at_construction() {
    assert!(Geometry::new(3, 8, 16384, 53).is_err());
    assert!(Geometry::new(64, 8, 100, 53).is_err());
}

#[test]
fn first_access_misses_then_hits() {
    let mut c = cache(Policy::Lru);
    assert!(c.access(0x2000).contains(AccessStatus::MISS));
    assert!(c.access(0x2000).is_hit());
}

#[test]
fn at_most_assoc_valid_blocks_per_set() {
    let mut c = cache(Policy::Fifo); // assoc = 2
    for addr in [0x1000u64, 0x1080, 0x1100, 0x1180] {
        c.access(addr);
    }
    // repeated thrash over 4 distinct low tags in a 2-way set: all misses.
    assert_eq!(c.accesses, 4);
    assert_eq!(c.misses, 4);
}

#[test]
fn rand_policy_is_deterministic_for_a_fixed_seed() {
    let run = || {
        let mut c = Cache::new(Geometry::new(64, 2, 256, 4).unwrap(), Policy::Rand, 42);
        for addr in [0x1000u64, 0x1080, 0x1100, 0x1000] {
            c.access(addr);
        }
        (c.accesses, c.misses)
    };
    assert_eq!(run(), run());
}
