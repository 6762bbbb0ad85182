use rand::distr::Alphanumeric;
use rand::Rng;

pub const RESET_TOKEN_LENGTH: usize = 64;

/// Draw a fresh alphanumeric reset token from the thread-local CSPRNG.
pub fn generate() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(RESET_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_64_alphanumeric_chars() {
        let token = generate();
        assert_eq!(token.len(), RESET_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn tokens_do_not_repeat() {
        assert_ne!(generate(), generate());
    }
}
