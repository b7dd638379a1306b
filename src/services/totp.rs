//! RFC 6238 time-based one-time passwords (HMAC-SHA1, 6 digits, 30 s step)
//! compatible with common authenticator apps.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

pub const DIGITS: u32 = 6;
pub const STEP_SECS: i64 = 30;
/// Steps accepted on either side of the current one.
pub const ALLOWED_SKEW: i64 = 1;

const SECRET_BYTES: usize = 20;
const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TotpError {
    #[error("secret is not valid base32")]
    InvalidSecret,
}

/// Generates a random secret, base32 encoded without padding.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    base32_encode(&bytes)
}

/// `otpauth://` provisioning URI, rendered as a QR code by the client.
pub fn provisioning_url(issuer: &str, account: &str, secret: &str) -> String {
    format!(
        "otpauth://totp/{}:{}?secret={}&issuer={}&algorithm=SHA1&digits={}&period={}",
        percent_encode(issuer),
        percent_encode(account),
        secret,
        percent_encode(issuer),
        DIGITS,
        STEP_SECS
    )
}

pub fn code_at(secret: &str, unix_time: i64) -> Result<String, TotpError> {
    let key = base32_decode(secret).ok_or(TotpError::InvalidSecret)?;
    Ok(hotp(&key, unix_time.div_euclid(STEP_SECS) as u64))
}

/// Checks `code` against the current step and `ALLOWED_SKEW` neighbours.
pub fn verify(secret: &str, code: &str, unix_time: i64) -> Result<bool, TotpError> {
    let key = base32_decode(secret).ok_or(TotpError::InvalidSecret)?;
    let code = code.trim();
    if code.len() != DIGITS as usize || !code.chars().all(|c| c.is_ascii_digit()) {
        return Ok(false);
    }

    let step = unix_time.div_euclid(STEP_SECS);
    Ok((-ALLOWED_SKEW..=ALLOWED_SKEW)
        .map(|offset| step + offset)
        .filter(|s| *s >= 0)
        .any(|s| constant_time_eq(hotp(&key, s as u64).as_bytes(), code.as_bytes())))
}

fn hotp(key: &[u8], counter: u64) -> String {
    // HMAC accepts keys of any length
    let mut mac = match HmacSha1::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let binary = ((digest[offset] as u32 & 0x7f) << 24)
        | ((digest[offset + 1] as u32) << 16)
        | ((digest[offset + 2] as u32) << 8)
        | (digest[offset + 3] as u32);

    format!("{:0width$}", binary % 10u32.pow(DIGITS), width = DIGITS as usize)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn base32_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity((data.len() * 8).div_ceil(5));
    let mut buffer: u32 = 0;
    let mut bits = 0;

    for byte in data {
        buffer = (buffer << 8) | *byte as u32;
        bits += 8;
        while bits >= 5 {
            let index = (buffer >> (bits - 5)) & 0x1f;
            out.push(BASE32_ALPHABET[index as usize] as char);
            bits -= 5;
        }
    }
    if bits > 0 {
        let index = (buffer << (5 - bits)) & 0x1f;
        out.push(BASE32_ALPHABET[index as usize] as char);
    }
    out
}

fn base32_decode(input: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits = 0;

    for c in input.chars().filter(|c| *c != '=' && !c.is_whitespace()) {
        let upper = c.to_ascii_uppercase() as u8;
        let value = BASE32_ALPHABET.iter().position(|b| *b == upper)? as u32;
        buffer = (buffer << 5) | value;
        bits += 5;
        if bits >= 8 {
            out.push((buffer >> (bits - 8)) as u8);
            bits -= 8;
        }
    }

    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn percent_encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => (b as char).to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}
