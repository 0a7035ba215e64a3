use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Build an RNG from a caller-controlled seed. `seed == 0` draws randomness
/// from the OS instead of producing a reproducible stream, mirroring the
/// common "0 means unseeded" convention used across this crate's hashers.
pub fn create_rng(seed: u64) -> SmallRng {
    if seed == 0 {
        SmallRng::from_entropy()
    } else {
        SmallRng::seed_from_u64(seed)
    }
}

/// Number of bits needed to encode `0..n_vertices` distinct values.
pub fn bits_for(n_vertices: usize) -> u32 {
    (n_vertices as f64).log2().ceil() as u32
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_bits_for() {
        assert_eq!(bits_for(128), 7);
        assert_eq!(bits_for(2), 1);
        assert_eq!(bits_for(1), 0);
    }

    #[test]
    fn test_create_rng_reproducible() {
        use rand::Rng;
        let mut a = create_rng(7);
        let mut b = create_rng(7);
        let xa: f32 = a.gen();
        let xb: f32 = b.gen();
        assert_eq!(xa, xb);
    }
}
