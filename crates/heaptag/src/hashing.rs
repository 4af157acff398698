use std::hash::Hasher;

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a hasher with a fixed seed, so equal-hash results are reproducible
/// across runs and processes (unlike `DefaultHasher`).
#[derive(Clone, Copy, Debug)]
pub struct StableHasher {
    h: u64,
}

impl StableHasher {
    pub fn new() -> Self {
        Self { h: FNV_OFFSET_BASIS }
    }
}

impl Default for StableHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for StableHasher {
    fn finish(&self) -> u64 {
        self.h
    }

    fn write(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.h ^= *b as u64;
            self.h = self.h.wrapping_mul(FNV_PRIME);
        }
    }
}
