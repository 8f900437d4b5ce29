//! Positional hashing: every (seed, index, slot) coordinate maps to a stable choice.
//!
//! The mixing step is the FNV-1 prime multiply over 32-bit words. It is not a
//! good general-purpose hash, but it is fast and the output is fixed forever,
//! which is what makes a prompt reproducible from its coordinates alone.

/// 32-bit FNV prime.
pub const FNV_PRIME: u32 = 0x0100_0193;

/// Slot reserved for template selection. Pools use slots `1..=pool_count`.
pub const TEMPLATE_SLOT: u32 = 0;

/// Hash one generation slot.
///
/// `index` is folded to its low 32 bits before mixing, so the output for
/// indices beyond `u32::MAX` repeats the low range. The result is the
/// magnitude of the final state read as a signed 32-bit value.
pub fn hash_slot(seed: u32, index: u64, slot: u32) -> u32 {
    mix(seed, &[index as u32, slot])
}

/// Fold each coordinate into `seed` with xor-then-multiply.
pub fn mix(seed: u32, coords: &[u32]) -> u32 {
    let h = coords
        .iter()
        .fold(seed, |h, &c| (h ^ c).wrapping_mul(FNV_PRIME));
    (h as i32).unsigned_abs()
}

/// Map a hash onto `0..len`. `len` must be non-zero.
pub fn slot_index(hash: u32, len: usize) -> usize {
    (hash as u64 % len as u64) as usize
}
