//! Deterministic demo values for named regions.
//!
//! The portal has no live data source for its LGA map yet, so the map is fed with
//! values drawn from a seeded generator. The same seed and the same ordered list of
//! names always produce the same values, in every process and on every platform:
//!
//! 1. the seed string is folded into a 32-bit integer (`hash * 31 + code_unit`,
//!    UTF-16 code units, wrapping),
//! 2. that integer seeds a small multiply-shift-xor generator ([`SeededRng`]),
//! 3. each name, in input order, consumes exactly one draw scaled to `0..=100`.
//!
//! ```
//! use lgamap_rs::generator::generate_values;
//!
//! let a = generate_values("anambra-demo-seed", &["Aguata", "Oyi"]);
//! let b = generate_values("anambra-demo-seed", &["Aguata", "Oyi"]);
//! assert_eq!(a, b);
//! assert!(a.values().all(|v| v <= 100));
//! ```

use crate::models::ValueMap;

/// Seed used by the portal's demo map.
pub const DEFAULT_SEED: &str = "anambra-demo-seed";

/// Exclusive upper bound of generated values (values land in `0..=100`).
const VALUE_SPAN: f64 = 101.0;

const INCREMENT: u32 = 0x6D2B_79F5;

/// Fold a seed string into a signed 32-bit hash.
///
/// Order-dependent: `"ab"` and `"ba"` hash differently. The empty string hashes to `0`.
pub fn hash_seed(seed: &str) -> i32 {
    seed.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Small 32-bit generator (mulberry-style multiply-shift-xor mixing).
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Seed from a string via [`hash_seed`].
    pub fn from_seed_str(seed: &str) -> Self {
        Self::new(hash_seed(seed) as u32)
    }

    /// Next raw 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

/// Generate one integer in `0..=100` per name, in input order.
///
/// A name that appears twice still consumes two draws; the later one wins.
pub fn generate_values<S: AsRef<str>>(seed: &str, names: &[S]) -> ValueMap {
    let mut rng = SeededRng::from_seed_str(seed);
    let mut out = ValueMap::new();
    for name in names {
        let value = (rng.next_f64() * VALUE_SPAN).floor() as u32;
        out.insert(name.as_ref().to_string(), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_order_dependent() {
        assert_eq!(hash_seed("ab"), 3105);
        assert_eq!(hash_seed("ba"), 3135);
        assert_eq!(hash_seed(""), 0);
    }

    #[test]
    fn hash_wraps_to_signed_32_bit() {
        assert_eq!(hash_seed(DEFAULT_SEED), -131_827_994);
    }

    #[test]
    fn rng_stream_is_reproducible() {
        let mut a = SeededRng::from_seed_str("x");
        let mut b = SeededRng::from_seed_str("x");
        for _ in 0..64 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
        let mut c = SeededRng::from_seed_str("x");
        assert_eq!(c.next_u32(), 4_059_697_750);
        assert_eq!(c.next_u32(), 44_963_739);
    }

    #[test]
    fn unit_interval() {
        let mut rng = SeededRng::new(7);
        for _ in 0..10_000 {
            let x = rng.next_f64();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn empty_list_and_empty_seed() {
        let names: [&str; 0] = [];
        assert!(generate_values("anything", &names).is_empty());
        let v = generate_values("", &["A"]);
        assert_eq!(v.get("A"), Some(26));
    }

    #[test]
    fn duplicate_name_keeps_last_draw() {
        let v = generate_values("x", &["A", "A"]);
        assert_eq!(v.len(), 1);
        assert_eq!(v.get("A"), Some(1));
    }
}
