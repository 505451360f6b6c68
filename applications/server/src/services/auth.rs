/// Authentication service - JWT and password handling
use crate::error::{Result, ServerError};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use melody_core::{Identity, Role, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct AuthService {
    secret: String,
    token_expiration: Duration,
    hash_cost: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub role: Role,
    pub exp: i64, // Expiration time
    pub iat: i64, // Issued at
}

impl AuthService {
    pub fn new(secret: String, expiration_hours: u64, hash_cost: u32) -> Self {
        Self {
            secret,
            token_expiration: Duration::hours(expiration_hours as i64),
            hash_cost,
        }
    }

    /// Hash a password using bcrypt
    pub fn hash_password(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.hash_cost).map_err(ServerError::from)
    }

    /// Verify a password against a hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash).map_err(ServerError::from)
    }

    /// Issue a signed HS256 token carrying the caller's id and role
    pub fn create_token(&self, identity: &Identity) -> Result<String> {
        let now = Utc::now();
        let exp = now + self.token_expiration;

        let claims = Claims {
            sub: identity.id.to_string(),
            role: identity.role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key).map_err(ServerError::from)
    }

    /// Verify and decode a token
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    /// Verify a token and return the identity it was issued to
    pub fn verify_identity(&self, token: &str) -> Result<Identity> {
        let claims = self.verify_token(token)?;
        let id = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| ServerError::Auth("Invalid token subject".to_string()))?;
        Ok(Identity::new(id, claims.role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing() {
        let auth = AuthService::new("secret".to_string(), 24, 4);
        let password = "My_secure_password1";

        let hash = auth.hash_password(password).unwrap();
        assert!(auth.verify_password(password, &hash).unwrap());
        assert!(!auth.verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_token_round_trip_keeps_role() {
        let auth = AuthService::new("secret".to_string(), 24, 4);
        let admin = Identity::new(7, Role::Admin);

        let token = auth.create_token(&admin).unwrap();
        assert_eq!(auth.verify_identity(&token).unwrap(), admin);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = AuthService::new("one".to_string(), 24, 4);
        let verifier = AuthService::new("two".to_string(), 24, 4);

        let token = issuer.create_token(&Identity::new(1, Role::User)).unwrap();
        assert!(matches!(
            verifier.verify_identity(&token),
            Err(ServerError::Jwt(_))
        ));
    }
}
