use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const TWO_FACTOR_PURPOSE: &str = "2fa_pending";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // user id
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Claims of the short-lived token handed out when a password check passes
/// but a TOTP or backup code is still required.
#[derive(Debug, Serialize, Deserialize)]
pub struct TwoFactorClaims {
    pub sub: String,
    pub purpose: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

pub struct JwtService {
    secret: String,
    access_token_duration: Duration,
    two_factor_token_duration: Duration,
}

impl JwtService {
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            access_token_duration: Duration::minutes(15),
            two_factor_token_duration: Duration::minutes(5),
        }
    }

    pub fn create_access_token(
        &self,
        user_id: &Uuid,
        email: &str,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let exp = now + self.access_token_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    pub fn create_two_factor_token(&self, user_id: &Uuid) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let exp = now + self.two_factor_token_duration;

        let claims = TwoFactorClaims {
            sub: user_id.to_string(),
            purpose: TWO_FACTOR_PURPOSE.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    pub fn verify_access_token(&self, token: &str) -> Result<TokenData<Claims>, jsonwebtoken::errors::Error> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
    }

    /// Returns the user id carried by a pending two-factor token.
    pub fn verify_two_factor_token(&self, token: &str) -> Result<Uuid, jsonwebtoken::errors::Error> {
        use jsonwebtoken::errors::{Error, ErrorKind};

        let data = decode::<TwoFactorClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        if data.claims.purpose != TWO_FACTOR_PURPOSE {
            return Err(Error::from(ErrorKind::InvalidToken));
        }

        Uuid::parse_str(&data.claims.sub).map_err(|_| Error::from(ErrorKind::InvalidSubject))
    }

    pub fn get_access_token_duration_secs(&self) -> i64 {
        self.access_token_duration.num_seconds()
    }
}
