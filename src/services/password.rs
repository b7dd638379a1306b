//! Password policy shared by registration, password reset and the
//! strength meter shown next to the signup form.

use serde::Serialize;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// True iff the password has at least 8 characters and contains an
/// uppercase letter, a lowercase letter, a digit and a special character.
pub fn is_password_secure(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_uppercase())
        && password.chars().any(|c| c.is_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(is_special)
}

/// Lists the requirements a password is missing, in display order.
pub fn password_violations(password: &str) -> Vec<&'static str> {
    let mut violations = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        violations.push("Password must be at least 8 characters");
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        violations.push("Password must contain an uppercase letter");
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        violations.push("Password must contain a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push("Password must contain a number");
    }
    if !password.chars().any(is_special) {
        violations.push("Password must contain a special character");
    }
    violations
}

/// Any character that is not a letter or digit, spaces included.
fn is_special(c: char) -> bool {
    !c.is_alphanumeric()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthLabel {
    Weak,
    Medium,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordStrength {
    pub score: u8,
    pub label: StrengthLabel,
}

/// Scores 0-5: length >= 8, length >= 12, mixed case, digit, special.
pub fn password_strength(password: &str) -> PasswordStrength {
    let len = password.chars().count();
    let checks = [
        len >= MIN_PASSWORD_LENGTH,
        len >= 12,
        password.chars().any(|c| c.is_uppercase()) && password.chars().any(|c| c.is_lowercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(is_special),
    ];
    let score = checks.iter().filter(|passed| **passed).count() as u8;

    let label = match score {
        0..=2 => StrengthLabel::Weak,
        3 => StrengthLabel::Medium,
        _ => StrengthLabel::Strong,
    };

    PasswordStrength { score, label }
}
