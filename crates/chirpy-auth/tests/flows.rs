//! End-to-end auth flows against a file store in a temporary directory.

use chirpy_auth::{
    AuthConfig, AuthService, UPGRADE_EVENT, WebhookOutcome, generate_refresh_token,
    verify_session_token,
};
use chirpy_core::error::{AuthError, HeaderError, InvalidInputError};
use chirpy_core::{
    Credentials, Error, ErrorKind, RefreshTokenRecord, RefreshTokenStore, UserId, UserStore,
};
use chirpy_file::FileStore;
use chrono::{Duration, Utc};
use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderValue};
use tempfile::TempDir;

const SECRET: &str = "test-secret-0123456789";
const API_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

fn service(dir: &TempDir) -> AuthService<FileStore> {
    let config = AuthConfig::new(SECRET, Some(API_KEY.to_string())).unwrap();
    AuthService::new(config, FileStore::new(dir.path())).unwrap()
}

fn authorization(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
}

fn bearer(token: &str) -> HeaderMap {
    authorization(&format!("Bearer {}", token))
}

fn alice() -> Credentials {
    Credentials::new("alice@example.com", "correct horse battery staple")
}

fn auth_err(err: Error) -> AuthError {
    match err {
        Error::Auth(e) => e,
        other => panic!("expected auth error, got {:?}", other),
    }
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_issues_session_and_refresh_tokens() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);
    let user = service.register(&alice()).await.unwrap();

    let login = service.login(&alice()).await.unwrap();

    assert_eq!(login.user.id, user.id);
    assert_eq!(
        verify_session_token(login.session_token.as_str(), SECRET.as_bytes()).unwrap(),
        user.id
    );
    assert_eq!(login.refresh_token.as_str().len(), 64);
    assert_ne!(login.refresh_token.as_str(), login.session_token.as_str());

    let record = service
        .store()
        .find_refresh_token(&login.refresh_token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.user_id, user.id);
    assert!(record.revoked_at.is_none());
    assert_eq!(record.expires_at - record.created_at, Duration::days(60));
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_email_look_the_same() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);
    service.register(&alice()).await.unwrap();

    let wrong_password = service
        .login(&Credentials::new("alice@example.com", "Correct horse battery staple"))
        .await
        .unwrap_err();
    let unknown_email = service
        .login(&Credentials::new("nobody@example.com", "whatever"))
        .await
        .unwrap_err();

    assert_eq!(auth_err(wrong_password), AuthError::InvalidCredentials);
    assert_eq!(auth_err(unknown_email), AuthError::InvalidCredentials);
}

#[tokio::test]
async fn test_each_login_gets_its_own_refresh_token() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);
    service.register(&alice()).await.unwrap();

    let first = service.login(&alice()).await.unwrap();
    let second = service.login(&alice()).await.unwrap();

    assert_ne!(first.refresh_token, second.refresh_token);
}

// ============================================================================
// Refresh / Revoke
// ============================================================================

#[tokio::test]
async fn test_refresh_token_is_reusable_until_revoked() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);
    let user = service.register(&alice()).await.unwrap();
    let login = service.login(&alice()).await.unwrap();
    let headers = bearer(login.refresh_token.as_str());

    for _ in 0..2 {
        let session = service.refresh(&headers).await.unwrap();
        assert_eq!(service.authorize_token(session.as_str()).unwrap(), user.id);
    }

    service.revoke(&headers).await.unwrap();

    let err = service.refresh(&headers).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(auth_err(err), AuthError::TokenRevoked);
}

#[tokio::test]
async fn test_revoke_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);
    service.register(&alice()).await.unwrap();
    let login = service.login(&alice()).await.unwrap();
    let headers = bearer(login.refresh_token.as_str());

    service.revoke(&headers).await.unwrap();
    let first = service
        .store()
        .find_refresh_token(&login.refresh_token)
        .await
        .unwrap()
        .unwrap()
        .revoked_at;

    service.revoke(&headers).await.unwrap();
    let second = service
        .store()
        .find_refresh_token(&login.refresh_token)
        .await
        .unwrap()
        .unwrap()
        .revoked_at;

    assert!(first.is_some());
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_revoke_unknown_or_malformed_token_succeeds() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);

    service.revoke_token(&"ab".repeat(32)).await.unwrap();
    service.revoke_token("not-a-refresh-token").await.unwrap();
}

#[tokio::test]
async fn test_revoke_requires_bearer_header() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);

    let err = service.revoke(&HeaderMap::new()).await.unwrap_err();
    assert!(matches!(err, Error::Header(HeaderError::Missing)));
}

#[tokio::test]
async fn test_refresh_requires_bearer_header() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);

    let missing = service.refresh(&HeaderMap::new()).await.unwrap_err();
    assert!(matches!(missing, Error::Header(HeaderError::Missing)));

    let bare = service.refresh(&authorization("Bearer")).await.unwrap_err();
    assert!(matches!(bare, Error::Header(HeaderError::Truncated { .. })));

    let wrong_scheme = service
        .refresh(&authorization(&format!("ApiKey {}", "ab".repeat(32))))
        .await
        .unwrap_err();
    assert!(matches!(wrong_scheme, Error::Header(HeaderError::WrongScheme { .. })));
    assert_eq!(wrong_scheme.kind(), ErrorKind::MalformedHeader);
}

#[tokio::test]
async fn test_refresh_with_expired_record_fails() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);
    let user = service.register(&alice()).await.unwrap();

    let token = generate_refresh_token().unwrap();
    let issued = Utc::now() - Duration::days(61);
    let record = RefreshTokenRecord::issue(token.clone(), user.id, issued, issued + Duration::days(60));
    service.store().insert_refresh_token(&record).await.unwrap();

    let err = service.refresh_token(token.as_str()).await.unwrap_err();
    assert_eq!(auth_err(err), AuthError::TokenExpired);
}

#[tokio::test]
async fn test_refresh_with_unknown_token_fails() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);

    let unknown = service.refresh_token(&"cd".repeat(32)).await.unwrap_err();
    assert_eq!(auth_err(unknown), AuthError::UnknownToken);

    let malformed = service.refresh_token("short").await.unwrap_err();
    assert_eq!(auth_err(malformed), AuthError::UnknownToken);
}

#[tokio::test]
async fn test_session_token_is_not_a_refresh_token() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);
    service.register(&alice()).await.unwrap();
    let login = service.login(&alice()).await.unwrap();

    let err = service
        .refresh(&bearer(login.session_token.as_str()))
        .await
        .unwrap_err();
    assert_eq!(auth_err(err), AuthError::UnknownToken);

    let err = service
        .authorize(&bearer(login.refresh_token.as_str()))
        .unwrap_err();
    assert!(err.is_unauthorized());
}

// ============================================================================
// Authorization
// ============================================================================

#[tokio::test]
async fn test_authorize_bearer_session() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);
    let user = service.register(&alice()).await.unwrap();
    let login = service.login(&alice()).await.unwrap();

    let id = service
        .authorize(&bearer(login.session_token.as_str()))
        .unwrap();
    assert_eq!(id, user.id);

    let err = service
        .authorize(&authorization(&format!("bearer {}", login.session_token.as_str())))
        .unwrap_err();
    assert!(matches!(err, Error::Header(HeaderError::WrongScheme { .. })));
}

#[test]
fn test_authorize_rejects_token_signed_with_other_secret() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);
    let forged = chirpy_auth::issue_session_token(
        &UserId::generate(),
        b"some-other-secret",
        Duration::hours(1),
    )
    .unwrap();

    let err = service.authorize_token(forged.as_str()).unwrap_err();
    assert_eq!(auth_err(err), AuthError::TokenTampered);
}

#[test]
fn test_api_key_checks() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);

    service
        .authorize_api_key(&authorization(&format!("ApiKey {}", API_KEY)))
        .unwrap();

    let wrong = service
        .authorize_api_key(&authorization("ApiKey f271c81ff7084ee5b99a5091b42d486f"))
        .unwrap_err();
    assert_eq!(auth_err(wrong), AuthError::InvalidApiKey);

    let wrong_scheme = service
        .authorize_api_key(&bearer(API_KEY))
        .unwrap_err();
    assert!(matches!(wrong_scheme, Error::Header(HeaderError::WrongScheme { .. })));
}

#[test]
fn test_api_key_rejected_when_none_configured() {
    let dir = TempDir::new().unwrap();
    let config = AuthConfig::new(SECRET, None).unwrap();
    let service = AuthService::new(config, FileStore::new(dir.path())).unwrap();

    let err = service
        .authorize_api_key(&authorization(&format!("ApiKey {}", API_KEY)))
        .unwrap_err();
    assert_eq!(auth_err(err), AuthError::InvalidApiKey);
}

// ============================================================================
// Account Management
// ============================================================================

#[tokio::test]
async fn test_register_stores_hash_not_password() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);
    let user = service.register(&alice()).await.unwrap();

    assert_ne!(user.password_hash.as_str(), alice().password());
    assert!(user.password_hash.as_str().starts_with("$2"));
}

#[tokio::test]
async fn test_register_duplicate_email_fails() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);
    service.register(&alice()).await.unwrap();

    let err = service.register(&alice()).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(InvalidInputError::Email { .. })));
}

#[tokio::test]
async fn test_register_empty_email_fails() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);

    let err = service
        .register(&Credentials::new("  ", "password"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(InvalidInputError::Email { .. })));
}

#[tokio::test]
async fn test_update_credentials_changes_login() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);
    service.register(&alice()).await.unwrap();
    let login = service.login(&alice()).await.unwrap();

    let updated = Credentials::new("alice@new.example", "new password");
    let user = service
        .update_credentials(&bearer(login.session_token.as_str()), &updated)
        .await
        .unwrap();
    assert_eq!(user.email, "alice@new.example");

    assert!(service.login(&alice()).await.is_err());
    assert_eq!(service.login(&updated).await.unwrap().user.id, user.id);
}

#[tokio::test]
async fn test_update_credentials_requires_session() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);

    let err = service
        .update_credentials(&HeaderMap::new(), &alice())
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
}

// ============================================================================
// Payment Webhook
// ============================================================================

#[tokio::test]
async fn test_upgrade_event_marks_user() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);
    let user = service.register(&alice()).await.unwrap();
    let headers = authorization(&format!("ApiKey {}", API_KEY));

    let outcome = service
        .handle_payment_event(&headers, UPGRADE_EVENT, &user.id)
        .await
        .unwrap();

    assert_eq!(outcome, WebhookOutcome::Upgraded(user.id));
    let stored = service.store().get_user(&user.id).await.unwrap().unwrap();
    assert!(stored.is_chirpy_red);
}

#[tokio::test]
async fn test_other_events_are_ignored() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);
    let user = service.register(&alice()).await.unwrap();
    let headers = authorization(&format!("ApiKey {}", API_KEY));

    let outcome = service
        .handle_payment_event(&headers, "user.payment_failed", &user.id)
        .await
        .unwrap();

    assert_eq!(outcome, WebhookOutcome::Ignored);
    let stored = service.store().get_user(&user.id).await.unwrap().unwrap();
    assert!(!stored.is_chirpy_red);
}

#[tokio::test]
async fn test_upgrade_unknown_user_fails() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);
    let headers = authorization(&format!("ApiKey {}", API_KEY));

    let err = service
        .handle_payment_event(&headers, UPGRADE_EVENT, &UserId::generate())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidInput(InvalidInputError::UserNotFound { .. })
    ));
}

#[tokio::test]
async fn test_webhook_with_wrong_key_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);
    let user = service.register(&alice()).await.unwrap();

    let err = service
        .handle_payment_event(&authorization("ApiKey nope"), UPGRADE_EVENT, &user.id)
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());

    let stored = service.store().get_user(&user.id).await.unwrap().unwrap();
    assert!(!stored.is_chirpy_red);
}
