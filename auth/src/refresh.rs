use rand::rngs::OsRng;
use rand::RngCore;

/// Random bytes per refresh token (256 bits).
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Length of the hex-encoded token.
pub const REFRESH_TOKEN_LEN: usize = REFRESH_TOKEN_BYTES * 2;

/// Generate a new opaque refresh token.
///
/// Draws 256 bits from the operating system CSPRNG and hex-encodes them into
/// a 64 character lowercase string.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);

    hex::encode(bytes)
}

/// Whether `token` has the shape of a token produced by [`generate_refresh_token`].
pub fn is_well_formed(token: &str) -> bool {
    token.len() == REFRESH_TOKEN_LEN
        && token
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
