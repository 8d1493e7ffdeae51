//! Address decomposition for the split-tag scheme.

use plugin_host::ConfigError;

fn is_power_of_two(v: u64) -> bool {
    v != 0 && (v & (v - 1)) == 0
}

/// The address-bit layout derived from a cache's geometry: from low to
/// high, block offset, set index, low tag, high tag. Invariant: these four
/// fields partition the address bits with no overlap and no gaps.
#[derive(Debug, Clone, Copy)]
pub struct Geometry {
    pub blksize: u64,
    pub assoc: usize,
    pub cachesize: u64,
    pub num_sets: usize,
    block_shift: u32,
    set_bits: u32,
    set_mask: u64,
    low_tag_bits: u32,
    low_tag_mask: u64,
}

impl Geometry {
    pub fn new(blksize: u64, assoc: u64, cachesize: u64, taglsize: u64) -> Result<Self, ConfigError> {
        if !is_power_of_two(blksize) {
            return Err(ConfigError::NotPowerOfTwo { field: "blksize", value: blksize });
        }
        if !is_power_of_two(assoc) {
            return Err(ConfigError::NotPowerOfTwo { field: "assoc", value: assoc });
        }
        if !is_power_of_two(cachesize) {
            return Err(ConfigError::NotPowerOfTwo { field: "cachesize", value: cachesize });
        }
        let per_set = blksize * assoc;
        if cachesize % per_set != 0 {
            return Err(ConfigError::GeometryMismatch {
                cachesize,
                computed: per_set * (cachesize / per_set).max(1),
            });
        }
        let num_sets = cachesize / per_set;
        if !is_power_of_two(num_sets) {
            return Err(ConfigError::NotPowerOfTwo { field: "num_sets", value: num_sets });
        }

        let block_shift = blksize.trailing_zeros();
        let set_bits = num_sets.trailing_zeros();
        let remaining = 64 - block_shift - set_bits;
        if taglsize > remaining as u64 {
            return Err(ConfigError::GeometryMismatch {
                cachesize,
                computed: taglsize,
            });
        }
        let low_tag_bits = taglsize as u32;
        let set_mask = num_sets - 1;
        let low_tag_mask = if low_tag_bits == 64 {
            u64::MAX
        } else {
            (1u64 << low_tag_bits) - 1
        };

        Ok(Geometry {
            blksize,
            assoc: assoc as usize,
            cachesize,
            num_sets: num_sets as usize,
            block_shift,
            set_bits,
            set_mask,
            low_tag_bits,
            low_tag_mask,
        })
    }

    /// Split an address into `(high_tag, set_index, low_tag)`.
    pub fn decompose(&self, addr: u64) -> (u64, u64, u64) {
        let above_offset = addr >> self.block_shift;
        let set_index = above_offset & self.set_mask;
        let above_set = above_offset >> self.set_bits;
        let low_tag = above_set & self.low_tag_mask;
        let high_tag = above_set >> self.low_tag_bits;
        (high_tag, set_index, low_tag)
    }
}
