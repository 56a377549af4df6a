use rand::RngCore;

/// Number of random bytes in a token.
const TOKEN_BYTES: usize = 32;

/// Generate a new random reset token.
///
/// Tokens are URL-safe base64 without padding, so they can be placed in
/// a reset link as they are.
pub fn generate() -> String {
    let mut data = [0; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut data);
    base64::encode_config(&data, base64::URL_SAFE_NO_PAD)
}
