use bitflags::bitflags;

bitflags! {
    /// Lookup result: bit 0 is a plain miss, bit
    /// 1 is a miss that additionally invalidated the whole set. Callers
    /// count both bits independently.
    pub struct AccessStatus: u8 {
        const MISS = 0b01;
        const INVALIDATION = 0b10;
    }
}

impl AccessStatus {
    pub fn is_hit(self) -> bool {
        !self.contains(AccessStatus::MISS)
    }
}
