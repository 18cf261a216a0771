//! Session cap, rotation, revocation, and guard tests.

use crate::domain::entities::session::MAX_SESSIONS_PER_ACCOUNT;
use crate::domain::value_objects::{AuthenticatedAccount, LoginOutcome};
use crate::errors::{AuthError, DomainError, TokenError};

use super::mocks::*;

async fn login(h: &TestHarness, email: &str, ip: &str, ua: &str) -> AuthenticatedAccount {
    match h.service.login(email, "Secret123!", ip, ua).await.unwrap() {
        LoginOutcome::Authenticated(a) => a,
        LoginOutcome::TwoFactorPending => panic!("no second factor configured"),
    }
}

#[tokio::test]
async fn test_sixth_login_rejected_without_mutating_state() {
    let h = harness();
    let account = signup_verified(&h, "ada@example.com", "Secret123!").await;

    for i in 0..MAX_SESSIONS_PER_ACCOUNT {
        login(&h, "ada@example.com", "10.0.0.1", &format!("device-{i}")).await;
    }

    let result = h
        .service
        .login("ada@example.com", "Secret123!", "10.0.0.1", "device-extra")
        .await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::TooManySessions))
    ));

    let stored = h.repository.find_by_id(account.id).await.unwrap().unwrap();
    assert_eq!(stored.sessions.len(), MAX_SESSIONS_PER_ACCOUNT);
    assert!(stored.sessions.iter().all(|s| s.user_agent != "device-extra"));
}

#[tokio::test]
async fn test_refresh_rotates_and_kills_the_old_token() {
    let h = harness();
    let account = signup_verified(&h, "ada@example.com", "Secret123!").await;
    let first = login(&h, "ada@example.com", "10.0.0.1", "ua").await;

    let refreshed = h
        .service
        .refresh(&first.tokens.refresh_token)
        .await
        .unwrap();
    assert_ne!(refreshed.tokens.refresh_token, first.tokens.refresh_token);

    // Still one session; rotation happened in place
    let stored = h.repository.find_by_id(account.id).await.unwrap().unwrap();
    assert_eq!(stored.sessions.len(), 1);

    // Replaying the pre-rotation value is treated as theft
    let replay = h.service.refresh(&first.tokens.refresh_token).await;
    assert!(matches!(
        replay,
        Err(DomainError::Auth(AuthError::SessionNotFound))
    ));

    // The rotated token remains usable
    h.service
        .refresh(&refreshed.tokens.refresh_token)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_refresh_rejects_malformed_token() {
    let h = harness();
    let result = h.service.refresh("not-a-jwt").await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::Invalid))
    ));
}

#[tokio::test]
async fn test_revoke_all_kills_every_refresh_token() {
    let h = harness();
    let account = signup_verified(&h, "ada@example.com", "Secret123!").await;
    let a = login(&h, "ada@example.com", "10.0.0.1", "phone").await;
    let b = login(&h, "ada@example.com", "10.0.0.2", "laptop").await;

    let revoked = h.service.revoke_all_sessions(account.id).await.unwrap();
    assert_eq!(revoked, 2);

    for token in [&a.tokens.refresh_token, &b.tokens.refresh_token] {
        assert!(matches!(
            h.service.refresh(token).await,
            Err(DomainError::Auth(AuthError::SessionNotFound))
        ));
    }
}

#[tokio::test]
async fn test_revoke_all_with_no_sessions_is_not_found() {
    let h = harness();
    let account = signup_verified(&h, "ada@example.com", "Secret123!").await;

    let result = h.service.revoke_all_sessions(account.id).await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::SessionNotFound))
    ));
}

#[tokio::test]
async fn test_logout_removes_only_the_matching_session() {
    let h = harness();
    let account = signup_verified(&h, "ada@example.com", "Secret123!").await;
    let phone = login(&h, "ada@example.com", "10.0.0.1", "phone").await;
    let laptop = login(&h, "ada@example.com", "10.0.0.2", "laptop").await;

    h.service.logout(&phone.tokens.refresh_token).await.unwrap();

    let stored = h.repository.find_by_id(account.id).await.unwrap().unwrap();
    assert_eq!(stored.sessions.len(), 1);
    assert!(matches!(
        h.service.refresh(&phone.tokens.refresh_token).await,
        Err(DomainError::Auth(AuthError::SessionNotFound))
    ));
    h.service
        .refresh(&laptop.tokens.refresh_token)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_logout_twice_reports_missing_session() {
    let h = harness();
    signup_verified(&h, "ada@example.com", "Secret123!").await;
    let session = login(&h, "ada@example.com", "10.0.0.1", "ua").await;

    h.service
        .logout(&session.tokens.refresh_token)
        .await
        .unwrap();
    let again = h.service.logout(&session.tokens.refresh_token).await;
    assert!(matches!(
        again,
        Err(DomainError::Auth(AuthError::SessionNotFound))
    ));
}

#[tokio::test]
async fn test_list_and_get_sessions() {
    let h = harness();
    let account = signup_verified(&h, "ada@example.com", "Secret123!").await;
    login(&h, "ada@example.com", "10.0.0.1", "phone").await;
    login(&h, "ada@example.com", "10.0.0.2", "laptop").await;

    let sessions = h.service.list_sessions(account.id).await.unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].ip, "10.0.0.1");
    assert_eq!(sessions[1].user_agent, "laptop");

    let fetched = h
        .service
        .get_session(account.id, sessions[0].id)
        .await
        .unwrap();
    assert_eq!(fetched.id, sessions[0].id);

    let missing = h.service.get_session(account.id, uuid::Uuid::new_v4()).await;
    assert!(matches!(
        missing,
        Err(DomainError::Auth(AuthError::SessionNotFound))
    ));
}

#[tokio::test]
async fn test_revoke_single_session() {
    let h = harness();
    let account = signup_verified(&h, "ada@example.com", "Secret123!").await;
    let phone = login(&h, "ada@example.com", "10.0.0.1", "phone").await;
    login(&h, "ada@example.com", "10.0.0.2", "laptop").await;

    let sessions = h.service.list_sessions(account.id).await.unwrap();
    let phone_session = sessions
        .iter()
        .find(|s| s.user_agent == "phone")
        .unwrap();

    h.service
        .revoke_session(account.id, phone_session.id)
        .await
        .unwrap();

    assert!(matches!(
        h.service.refresh(&phone.tokens.refresh_token).await,
        Err(DomainError::Auth(AuthError::SessionNotFound))
    ));
    assert_eq!(h.service.list_sessions(account.id).await.unwrap().len(), 1);

    let again = h.service.revoke_session(account.id, phone_session.id).await;
    assert!(matches!(
        again,
        Err(DomainError::Auth(AuthError::SessionNotFound))
    ));
}

#[tokio::test]
async fn test_concurrent_logins_are_both_recorded() {
    let h = harness();
    let account = signup_verified(&h, "ada@example.com", "Secret123!").await;

    // Racing read-modify-write cycles; the version conflict retry must keep
    // both sessions
    let (a, b) = tokio::join!(
        h.service
            .login("ada@example.com", "Secret123!", "10.0.0.1", "phone"),
        h.service
            .login("ada@example.com", "Secret123!", "10.0.0.2", "laptop"),
    );
    a.unwrap();
    b.unwrap();

    let stored = h.repository.find_by_id(account.id).await.unwrap().unwrap();
    assert_eq!(stored.sessions.len(), 2);
}

#[tokio::test]
async fn test_access_guard_accepts_live_token() {
    let h = harness();
    let account = signup_verified(&h, "ada@example.com", "Secret123!").await;
    let session = login(&h, "ada@example.com", "10.0.0.1", "ua").await;

    let resolved = h
        .service
        .authorize_access(&session.tokens.access_token)
        .await
        .unwrap();
    assert_eq!(resolved.id, account.id);
}

#[tokio::test]
async fn test_access_guard_rejects_deactivated_account() {
    let h = harness();
    let account = signup_verified(&h, "ada@example.com", "Secret123!").await;
    let session = login(&h, "ada@example.com", "10.0.0.1", "ua").await;

    h.service.deactivate_account(account.id).await.unwrap();

    assert!(matches!(
        h.service.authorize_access(&session.tokens.access_token).await,
        Err(DomainError::Auth(AuthError::InactiveAccount))
    ));
    // Deactivation also revoked the session behind the refresh token
    assert!(matches!(
        h.service.refresh(&session.tokens.refresh_token).await,
        Err(DomainError::Auth(AuthError::InactiveAccount))
    ));
}

#[tokio::test]
async fn test_access_guard_rejects_garbage_token() {
    let h = harness();
    assert!(matches!(
        h.service.authorize_access("garbage").await,
        Err(DomainError::Token(TokenError::Invalid))
    ));
}
