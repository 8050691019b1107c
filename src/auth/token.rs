use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};

use crate::auth::error::AuthError;

const REFRESH_TOKEN_BYTES: usize = 64;

/// Opaque, URL-safe session secret. Carries no structure or claims; it is
/// purely a lookup key into the users table. The OS CSPRNG is the only
/// accepted source; on failure we error out rather than degrade.
pub fn generate_refresh_token() -> Result<String, AuthError> {
    let mut buf = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(AuthError::EntropySource)?;
    Ok(Base64UrlUnpadded::encode_string(&buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_url_safe_and_long_enough() {
        let token = generate_refresh_token().expect("generate");
        // 64 bytes -> 86 base64url chars, unpadded
        assert_eq!(token.len(), 86);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn tokens_are_unique() {
        let a = generate_refresh_token().unwrap();
        let b = generate_refresh_token().unwrap();
        assert_ne!(a, b);
    }
}
