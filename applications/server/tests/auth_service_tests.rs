/// Authentication service tests
/// Tests JWT generation, password hashing, token validation
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use melody_core::{Identity, Role};
use melody_server::{
    error::ServerError,
    services::auth::{AuthService, Claims},
};

const SECRET: &str = "test-secret-key";

fn create_test_auth_service() -> AuthService {
    AuthService::new(SECRET.to_string(), 24, 4)
}

/// Test password hashing produces valid bcrypt hashes
#[test]
fn test_password_hashing() {
    let auth_service = create_test_auth_service();

    let password = "MySecurePassword123";
    let hash = auth_service.hash_password(password).unwrap();

    assert!(hash.starts_with("$2b$") || hash.starts_with("$2a$"));
    assert_eq!(hash.len(), 60);

    // Salt is random
    let hash2 = auth_service.hash_password(password).unwrap();
    assert_ne!(hash, hash2);
}

#[test]
fn test_password_verification() {
    let auth_service = create_test_auth_service();
    let hash = auth_service.hash_password("Secret1").unwrap();

    assert!(auth_service.verify_password("Secret1", &hash).unwrap());
    assert!(!auth_service.verify_password("secret1", &hash).unwrap());
}

#[test]
fn test_password_verification_invalid_hash() {
    let auth_service = create_test_auth_service();

    let result = auth_service.verify_password("password", "not-a-valid-hash");
    assert!(matches!(result, Err(ServerError::Bcrypt(_))));
}

#[test]
fn test_token_carries_id_and_role() {
    let auth_service = create_test_auth_service();

    let token = auth_service
        .create_token(&Identity::new(42, Role::Admin))
        .unwrap();
    let claims = auth_service.verify_token(&token).unwrap();

    assert_eq!(claims.sub, "42");
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);

    let identity = auth_service.verify_identity(&token).unwrap();
    assert_eq!(identity, Identity::new(42, Role::Admin));
    assert!(identity.is_admin());
}

#[test]
fn test_expired_token_is_rejected() {
    let auth_service = create_test_auth_service();
    let issued = Utc::now() - Duration::hours(48);

    let claims = Claims {
        sub: "1".to_string(),
        role: Role::User,
        iat: issued.timestamp(),
        exp: (issued + Duration::hours(24)).timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    assert!(matches!(
        auth_service.verify_identity(&token),
        Err(ServerError::Jwt(_))
    ));
}

#[test]
fn test_tampered_and_garbage_tokens_are_rejected() {
    let auth_service = create_test_auth_service();
    let token = auth_service
        .create_token(&Identity::new(1, Role::User))
        .unwrap();

    // Flip the first character of the signature segment
    let signature_start = token.rfind('.').unwrap() + 1;
    let mut tampered = token.clone();
    let replacement = if tampered[signature_start..].starts_with('A') { "B" } else { "A" };
    tampered.replace_range(signature_start..signature_start + 1, replacement);

    assert!(auth_service.verify_token(&tampered).is_err());
    assert!(auth_service.verify_token("garbage").is_err());
    assert!(auth_service.verify_token("").is_err());
}

#[test]
fn test_non_numeric_subject_is_rejected() {
    let auth_service = create_test_auth_service();
    let claims = Claims {
        sub: "not-a-number".to_string(),
        role: Role::User,
        iat: Utc::now().timestamp(),
        exp: (Utc::now() + Duration::hours(1)).timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    assert!(matches!(
        auth_service.verify_identity(&token),
        Err(ServerError::Auth(_))
    ));
}
