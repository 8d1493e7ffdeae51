//! A cache set: a shared high tag plus an associativity-sized array of
//! blocks, and per-set eviction metadata.

use std::collections::VecDeque;

use rand::Rng;

use crate::policy::Policy;

#[derive(Debug, Clone, Copy, Default)]
pub struct CacheBlock {
    pub low_tag: u64,
    pub valid: bool,
}

#[derive(Debug)]
enum SetMeta {
    Lru { priority: Vec<u64>, generation: u64 },
    Fifo { queue: VecDeque<usize> },
    Rand,
}

#[derive(Debug)]
pub struct CacheSet {
    pub high_tag: Option<u64>,
    pub blocks: Vec<CacheBlock>,
    meta: SetMeta,
}

impl CacheSet {
    pub fn new(assoc: usize, policy: Policy) -> Self {
        let meta = match policy {
            Policy::Lru => SetMeta::Lru {
                priority: vec![0; assoc],
                generation: 0,
            },
            Policy::Fifo => SetMeta::Fifo {
                queue: VecDeque::with_capacity(assoc),
            },
            Policy::Rand => SetMeta::Rand,
        };
        CacheSet {
            high_tag: None,
            blocks: vec![CacheBlock::default(); assoc],
            meta,
        }
    }

    /// Invalidate every block on a high-tag change.
    pub fn invalidate_all(&mut self) {
        for blk in &mut self.blocks {
            blk.valid = false;
        }
        match &mut self.meta {
            SetMeta::Fifo { queue } => queue.clear(),
            SetMeta::Lru { priority, generation } => {
                priority.iter_mut().for_each(|p| *p = 0);
                *generation = 0;
            }
            SetMeta::Rand => {}
        }
    }

    pub fn find_valid(&self, low_tag: u64) -> Option<usize> {
        self.blocks.iter().position(|b| b.valid && b.low_tag == low_tag)
    }

    fn find_invalid(&self) -> Option<usize> {
        self.blocks.iter().position(|b| !b.valid)
    }

    /// Pick the block to fill on a miss: the lowest-index invalid block, or
    /// a victim from the configured policy.
    pub fn choose_install_target(&mut self, rng: &mut impl Rng) -> usize {
        if let Some(idx) = self.find_invalid() {
            return idx;
        }
        match &mut self.meta {
            SetMeta::Lru { priority, .. } => priority
                .iter()
                .enumerate()
                .min_by_key(|&(idx, &p)| (p, idx))
                .map(|(idx, _)| idx)
                .expect("associativity is never zero"),
            SetMeta::Fifo { queue } => queue
                .pop_back()
                .expect("fifo queue must hold an entry for every valid block"),
            SetMeta::Rand => rng.gen_range(0..self.blocks.len()),
        }
    }

    /// A hit touches recency bookkeeping for LRU only.
    pub fn record_hit(&mut self, idx: usize) {
        if let SetMeta::Lru { priority, generation } = &mut self.meta {
            *generation += 1;
            priority[idx] = *generation;
        }
    }

    /// Install `low_tag` into block `idx`, marking it valid.
    pub fn record_install(&mut self, idx: usize, low_tag: u64) {
        self.blocks[idx].valid = true;
        self.blocks[idx].low_tag = low_tag;
        match &mut self.meta {
            SetMeta::Lru { priority, generation } => {
                *generation += 1;
                priority[idx] = *generation;
            }
            SetMeta::Fifo { queue } => queue.push_front(idx),
            SetMeta::Rand => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_invalid_blocks_before_evicting() {
        let mut set = CacheSet::new(2, Policy::Lru);
        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        assert_eq!(set.choose_install_target(&mut rng), 0);
        set.record_install(0, 1);
        assert_eq!(set.choose_install_target(&mut rng), 1);
    }

    #[test]
    fn lru_evicts_least_recently_used() {
        let mut set = CacheSet::new(2, Policy::Lru);
        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        set.record_install(set.choose_install_target(&mut rng), 1);
        set.record_install(set.choose_install_target(&mut rng), 2);
        set.record_hit(0);
        // block 0 (low_tag 1) was just touched; block 1 (low_tag 2) is LRU.
        assert_eq!(set.choose_install_target(&mut rng), 1);
    }

    #[test]
    fn fifo_evicts_oldest_enqueued() {
        let mut set = CacheSet::new(2, Policy::Fifo);
        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        set.record_install(set.choose_install_target(&mut rng), 1);
        set.record_install(set.choose_install_target(&mut rng), 2);
        // even after "touching" block 0 via a hit, FIFO ignores it.
        set.record_hit(0);
        assert_eq!(set.choose_install_target(&mut rng), 0);
    }
}
