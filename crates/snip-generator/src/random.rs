use crate::Generator;
use rand::Rng;
use snip_core::shortcode::{ALPHABET, CODE_LENGTH};
use snip_core::ShortCode;

/// Draws every character uniformly at random from the 52-letter alphabet.
///
/// Candidates may collide with existing codes; callers retry.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGenerator;

impl RandomGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        let mut rng = rand::thread_rng();
        let code: String = (0..CODE_LENGTH)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        ShortCode::new_unchecked(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generates_valid_codes() {
        let generator = RandomGenerator::new();

        for _ in 0..1_000 {
            let code = generator.generate();
            assert!(ShortCode::new(code.as_str()).is_ok(), "bad code {code}");
        }
    }

    #[test]
    fn covers_both_cases() {
        let generator = RandomGenerator::new();
        let chars: HashSet<char> = (0..1_000)
            .flat_map(|_| generator.generate().as_str().chars().collect::<Vec<_>>())
            .collect();

        assert!(chars.iter().any(char::is_ascii_uppercase));
        assert!(chars.iter().any(char::is_ascii_lowercase));
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandomGenerator>();
    }
}
