use rand::Rng;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Longest base-36 rendering of a `u64` ("3w5e11264sgsf")
const MAX_DIGITS: usize = 13;

/// Encodes `value` in lowercase base 36 without padding
pub fn encode_base36(mut value: u64) -> String {
    let mut digits = [0u8; MAX_DIGITS];
    let mut pos = MAX_DIGITS;

    loop {
        pos -= 1;
        digits[pos] = ALPHABET[(value % 36) as usize];
        value /= 36;
        if value == 0 {
            break;
        }
    }

    digits[pos..].iter().map(|&b| b as char).collect()
}

/// Draws a uniformly random `u64` and renders it as a slug candidate
pub fn random_slug<R: Rng>(rng: &mut R) -> String {
    encode_base36(rng.gen())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_encode_small_values() {
        assert_eq!(encode_base36(0), "0");
        assert_eq!(encode_base36(9), "9");
        assert_eq!(encode_base36(35), "z");
        assert_eq!(encode_base36(36), "10");
        assert_eq!(encode_base36(1295), "zz");
    }

    #[test]
    fn test_encode_known_values() {
        assert_eq!(encode_base36(123_456_789), "21i3v9");
        assert_eq!(encode_base36(u64::MAX), "3w5e11264sgsf");
    }

    #[test]
    fn test_random_slug_uses_alphabet() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let slug = random_slug(&mut rng);
            assert!(!slug.is_empty());
            assert!(slug.len() <= MAX_DIGITS);
            assert!(slug.bytes().all(|b| ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_random_slug_is_seed_deterministic() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(random_slug(&mut a), random_slug(&mut b));
    }
}
