//! Seeded pseudo-random numbers
//!
//! A tiny linear congruential generator used wherever a demo needs a layout
//! that must come out the same every run (obstacles, mazes, camera shake
//! jitter in tests). Not suitable for anything security related.

/// Multiplier, increment and modulus of the classic 9301/49297/233280 LCG.
const LCG_A: u32 = 9301;
const LCG_C: u32 = 49297;
const LCG_M: u32 = 233_280;

/// Linear congruential generator: `state = (state * 9301 + 49297) % 233280`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
    seed: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self {
            state: seed % LCG_M,
            seed,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Advance and return the raw state in `0..233280`
    pub fn next_u32(&mut self) -> u32 {
        // state < 233280, so state * 9301 + 49297 fits in u64 comfortably
        self.state = ((self.state as u64 * LCG_A as u64 + LCG_C as u64) % LCG_M as u64) as u32;
        self.state
    }

    /// Uniform float in `[0, 1)`
    pub fn next_f32(&mut self) -> f32 {
        self.next_u32() as f32 / LCG_M as f32
    }

    /// Uniform float in `[min, max)`
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Uniform integer in `[min, max]` (inclusive, like `Between` helpers)
    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f32;
        let offset = (self.next_f32() * span) as i32;
        min + offset.min(max - min)
    }

    /// Index in `0..len` (len must be non-zero)
    pub fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        ((self.next_f32() * len as f32) as usize).min(len - 1)
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let i = self.index(items.len());
        items.get(i)
    }

    /// In-place Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Lcg::new(12345);
        let mut b = Lcg::new(12345);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let a: Vec<u32> = {
            let mut r = Lcg::new(1);
            (0..8).map(|_| r.next_u32()).collect()
        };
        let b: Vec<u32> = {
            let mut r = Lcg::new(2);
            (0..8).map(|_| r.next_u32()).collect()
        };
        assert_ne!(a, b);
    }

    #[test]
    fn test_known_first_values() {
        // (12345 * 9301 + 49297) % 233280 = 114892342 % 233280
        let mut r = Lcg::new(12345);
        assert_eq!(r.next_u32(), (12345u64 * 9301 + 49297) as u32 % 233_280);
    }

    #[test]
    fn test_float_range() {
        let mut r = Lcg::new(42);
        for _ in 0..1000 {
            let f = r.next_f32();
            assert!((0.0..1.0).contains(&f));
            let x = r.range_f32(150.0, 650.0);
            assert!((150.0..650.0).contains(&x));
        }
    }

    #[test]
    fn test_int_range_inclusive() {
        let mut r = Lcg::new(7);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..2000 {
            let v = r.range_i32(-2, 2);
            assert!((-2..=2).contains(&v));
            seen_min |= v == -2;
            seen_max |= v == 2;
        }
        assert!(seen_min && seen_max);
        assert_eq!(r.range_i32(5, 5), 5);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut r = Lcg::new(99);
        let mut items: Vec<u32> = (0..10).collect();
        r.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, (0..10).collect::<Vec<_>>());
    }
}
