use rand::Rng;

use crate::services::hashing::sha256_hex;

pub const BACKUP_CODE_COUNT: usize = 10;

// No 0/O or 1/I/L to keep codes readable when typed by hand
const ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
const GROUP_LEN: usize = 4;

/// Generates `count` distinct codes formatted `XXXX-XXXX` from the
/// thread-local CSPRNG.
pub fn generate(count: usize) -> Vec<String> {
    let mut rng = rand::rng();
    let mut codes: Vec<String> = Vec::with_capacity(count);

    while codes.len() < count {
        let mut code = String::with_capacity(GROUP_LEN * 2 + 1);
        for i in 0..GROUP_LEN * 2 {
            if i == GROUP_LEN {
                code.push('-');
            }
            code.push(ALPHABET[rng.random_range(0..ALPHABET.len())] as char);
        }
        if !codes.contains(&code) {
            codes.push(code);
        }
    }

    codes
}

/// Uppercases and strips separators so `abcd efgh` matches `ABCD-EFGH`.
pub fn normalize(code: &str) -> String {
    code.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub fn hash(code: &str) -> String {
    sha256_hex(&normalize(code))
}
