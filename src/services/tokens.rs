use rand::RngCore;

use crate::services::hashing::sha256_hex;

/// A freshly generated opaque token: the raw value goes to the client, the
/// hash goes to the database.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub raw: String,
    pub hash: String,
}

pub fn issue_token() -> IssuedToken {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    let raw = hex::encode(bytes);
    let hash = sha256_hex(&raw);
    IssuedToken { raw, hash }
}
