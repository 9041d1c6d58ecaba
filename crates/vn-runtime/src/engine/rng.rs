/// Small seeded generator used by `idle_chat`. The whole state is one `u32`
/// so it can be carried in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub(super) fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub(super) fn state(&self) -> u32 {
        self.state
    }

    pub(super) fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6d2b79f5);
        let mut next = self.state;
        next = (next ^ (next >> 15)).wrapping_mul(next | 1);
        next ^= next.wrapping_add((next ^ (next >> 7)).wrapping_mul(next | 61));
        next ^ (next >> 14)
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub(super) fn pick_index(&mut self, len: usize) -> usize {
        let bound = u32::try_from(len).unwrap_or(u32::MAX);
        pick_bounded_with(self, bound, Self::next_u32) as usize
    }
}

/// Rejection sampling: draws above the largest multiple of `bound` are
/// thrown away so every residue is equally likely.
fn pick_bounded_with<F>(rng: &mut Mulberry32, bound: u32, mut next: F) -> u32
where
    F: FnMut(&mut Mulberry32) -> u32,
{
    let threshold = (u64::from(u32::MAX) + 1) / u64::from(bound) * u64::from(bound);
    let mut candidate = next(rng);
    while u64::from(candidate) >= threshold {
        candidate = next(rng);
    }
    candidate % bound
}
