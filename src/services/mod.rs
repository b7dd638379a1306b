pub mod analysis;
pub mod backup_codes;
pub mod client_info;
pub mod hashing;
pub mod jwt;
pub mod metrics;
pub mod pagination;
pub mod password;
pub mod rate_limit;
pub mod security;
pub mod tokens;
pub mod totp;
