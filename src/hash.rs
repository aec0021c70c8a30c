//! Cheap hashing for pointer-shaped keys.
//!
//! The map takes any `BuildHasher` and defaults to `RandomState`. For keys
//! that are machine-word addresses (raw pointers, arena indices), a general
//! purpose hasher is more than needed; `PtrBuildHasher` folds the word with
//! a few shifted adds instead. Do not use it for structured keys.

use core::hash::{BuildHasher, Hasher};

#[derive(Clone, Copy, Debug, Default)]
pub struct PtrBuildHasher;

impl BuildHasher for PtrBuildHasher {
    type Hasher = PtrHasher;

    fn build_hasher(&self) -> Self::Hasher {
        PtrHasher { state: 0 }
    }
}

pub struct PtrHasher {
    state: u32,
}

impl Hasher for PtrHasher {
    fn write(&mut self, bytes: &[u8]) {
        // Pointer-shaped keys take the word-sized fast paths below; a wider
        // write means a structured key ended up on the wrong hasher, which
        // the byte fold would mask with a weak hash.
        debug_assert!(
            bytes.len() <= core::mem::size_of::<usize>(),
            "PtrHasher is for word-shaped keys; structured keys need a general hasher"
        );
        for &b in bytes {
            self.state = self.state.rotate_left(8) ^ u32::from(b);
        }
    }

    fn write_u32(&mut self, n: u32) {
        self.state = n;
    }

    fn write_u64(&mut self, n: u64) {
        self.state = n as u32;
    }

    fn write_usize(&mut self, n: usize) {
        self.state = n as u32;
    }

    fn finish(&self) -> u64 {
        let x = self.state;
        u64::from(
            x.wrapping_add(x >> 3)
                .wrapping_add(x >> 13)
                .wrapping_add(x >> 23),
        )
    }
}
