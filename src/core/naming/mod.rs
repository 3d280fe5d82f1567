//! # Naming Module
//!
//! Random output filenames. Every sanitized image is written under a fresh
//! alphanumeric token, so nothing the original name carried (subject, date
//! hints, sequence numbers) survives into the output directory.

use crate::core::format::ImageKind;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Token length used for output filenames
pub const DEFAULT_TOKEN_LEN: usize = 20;

/// Draw a random alphanumeric token from the thread-local RNG.
///
/// Thread-local means worker threads never contend on shared RNG state.
pub fn random_token(len: usize) -> String {
    random_token_with(&mut rand::thread_rng(), len)
}

/// Draw a random alphanumeric token from the given generator.
///
/// Split out so tests can pass a seeded `StdRng`.
pub fn random_token_with<R: Rng>(rng: &mut R, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Build a complete output filename: random token plus the canonical
/// extension of the detected format.
///
/// Collisions are not checked; at 62^20 the name space makes them a
/// non-concern.
pub fn output_file_name(kind: ImageKind) -> String {
    format!(
        "{}.{}",
        random_token(DEFAULT_TOKEN_LEN),
        kind.canonical_extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn token_has_requested_length() {
        assert_eq!(random_token(20).len(), 20);
        assert_eq!(random_token(8).len(), 8);
        assert_eq!(random_token(0).len(), 0);
    }

    #[test]
    fn token_is_alphanumeric() {
        let token = random_token(64);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn seeded_generator_is_reproducible() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(random_token_with(&mut a, 20), random_token_with(&mut b, 20));
    }

    #[test]
    fn different_seeds_produce_different_tokens() {
        let mut a = StdRng::seed_from_u64(1);
        let mut b = StdRng::seed_from_u64(2);
        assert_ne!(random_token_with(&mut a, 20), random_token_with(&mut b, 20));
    }

    #[test]
    fn output_file_name_has_token_and_canonical_extension() {
        let name = output_file_name(ImageKind::Png);
        assert_eq!(name.len(), DEFAULT_TOKEN_LEN + ".png".len());
        assert!(name.ends_with(".png"));

        let stem = name.trim_end_matches(".png");
        assert!(stem.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn consecutive_names_differ() {
        assert_ne!(
            output_file_name(ImageKind::Jpeg),
            output_file_name(ImageKind::Jpeg)
        );
    }
}
