use rand::rngs::OsRng;
use rand::RngCore;

pub const KEY_BYTES: usize = 32;

/// Fresh shared secret for the `api-key` variable: 256 bits from the OS
/// generator, lowercase hex.
pub fn generate_api_key() -> Result<String, rand::Error> {
    let mut bytes = [0u8; KEY_BYTES];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(hex::encode(bytes))
}
