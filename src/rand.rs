const GOLDEN_GAMMA: u64 = 0x9E3779B97F4A7C15;

/// One round of the splitmix64 output function, applied to `state + γ`.
pub fn splitmix64(state: u64) -> u64 {
    let mut z = state.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// A small counter-based generator (splitmix64). Cheap to construct, so callers derive a fresh
/// one from their coordinates instead of sharing a stream; results then do not depend on
/// evaluation order.
#[derive(Debug, Clone, PartialEq)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn from_seed(seed: u64) -> Rng {
        Rng { state: seed }
    }

    /// Seeds a generator by folding each of `parts` into the state with [`splitmix64`].
    pub fn from_parts(parts: &[u64]) -> Rng {
        let state = parts
            .iter()
            .fold(0u64, |h, &part| splitmix64(h ^ part));
        Rng { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        let out = splitmix64(self.state);
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        out
    }

    /// Picks a random value uniformly distributed between `0.0` (inclusive) and `1.0` (exclusive),
    /// with 53 bits of precision.
    pub fn rnd(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * 2.0f64.powi(-53)
    }

    /// Picks a random value uniformly distributed between `min` (inclusive) and `max` (exclusive).
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        self.rnd() * (max - min) + min
    }

    /// Constructs a new vector with a uniformly random permutation of the elements in `xs`.
    ///
    /// Elements are keyed by fresh 64-bit draws and sorted; ties (probability ~n²/2⁶⁵) keep their
    /// input order.
    pub fn shuffle<T, I: IntoIterator<Item = T>>(&mut self, xs: I) -> Vec<T> {
        let mut result: Vec<(u64, T)> = xs.into_iter().map(|x| (self.next_u64(), x)).collect();
        result.sort_by_key(|(k, _)| *k);
        result.into_iter().map(|(_, x)| x).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_splitmix64() {
        assert_eq!(splitmix64(0), 0xe220a8397b1dcdaf);
        assert_eq!(splitmix64(1), 0x910a2dec89025cc1);
        assert_eq!(splitmix64(123456789), 0x223c74d93deb7679);
    }

    #[test]
    fn test_u64_sequence() {
        let mut rng = Rng::from_seed(0);
        let vs: [u64; 4] = std::array::from_fn(|_| rng.next_u64());
        assert_eq!(
            vs,
            [
                0xe220a8397b1dcdaf,
                0x6e789e6aa1b965f4,
                0x06c45d188009454f,
                0xf88bb8a8724c81ec
            ]
        );
    }

    #[test]
    fn test_rnd_sequence() {
        let mut rng = Rng::from_seed(42);
        let us: [f64; 4] = std::array::from_fn(|_| rng.rnd());
        assert_eq!(
            us,
            [
                0.7415648787718233,
                0.1599103928769201,
                0.27860113025513866,
                0.34419071652363753
            ]
        );
    }

    #[test]
    fn test_uniform_range() {
        let mut rng = Rng::from_seed(7);
        for _ in 0..1000 {
            let v = rng.uniform(-2.0, 3.0);
            assert!((-2.0..3.0).contains(&v), "{}", v);
        }
    }

    #[test]
    fn test_from_parts_is_order_sensitive() {
        let a = Rng::from_parts(&[1, 2, 3]);
        let b = Rng::from_parts(&[1, 2, 3]);
        let c = Rng::from_parts(&[3, 2, 1]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(Rng::from_parts(&[5]), Rng::from_seed(splitmix64(5)));
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = Rng::from_seed(99);
        let mut shuffled = rng.shuffle(0..50);
        assert_ne!(shuffled, (0..50).collect::<Vec<_>>());
        shuffled.sort();
        assert_eq!(shuffled, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_empty_and_singleton() {
        let mut rng = Rng::from_seed(0);
        assert_eq!(rng.shuffle(Vec::<()>::new()), Vec::<()>::new());
        assert_eq!(rng.shuffle(vec![777]), vec![777]);
    }
}
