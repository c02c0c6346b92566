//! Base64url conversion for binary credential fields

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::error::PasskeyError;

/// Encode bytes as unpadded base64url text
pub fn encode_base64url(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode unpadded base64url text.
///
/// Padding, the standard alphabet's `+` and `/`, and non-canonical trailing
/// bits are all rejected.
pub fn decode_base64url(text: &str) -> Result<Vec<u8>, PasskeyError> {
    Ok(URL_SAFE_NO_PAD.decode(text)?)
}
