//! Main authentication service implementation.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::account::{Account, AccountRole};
use crate::domain::entities::one_time_code::{CodeError, OneTimeCode, OtpPurpose};
use crate::domain::entities::reset_ticket::PasswordResetTicket;
use crate::domain::entities::session::Session;
use crate::domain::value_objects::{AuthenticatedAccount, LoginOutcome, SessionView};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};
use crate::repositories::AccountRepository;
use crate::services::clock::Clock;
use crate::services::mail::{mask_email, Mailer};
use crate::services::password::PasswordHasher;
use crate::services::token::TokenService;

use super::config::{AuthConfig, TwoFactorPolicy};

const VERIFY_SUBJECT: &str = "Your FoodyDrop verification code";
const TWO_FACTOR_SUBJECT: &str = "Your FoodyDrop login code";
const RESET_SUBJECT: &str = "Reset your FoodyDrop password";

/// Orchestrates every identity and session flow.
///
/// The only component exposed to the request layer. Each operation is a
/// read-modify-write against the account repository; mutations of persisted
/// state go through a conditional update retried on version conflicts, so
/// concurrent logins and refreshes on one account cannot lose sessions or
/// resurrect revoked tokens.
pub struct AuthService<R, M>
where
    R: AccountRepository,
    M: Mailer,
{
    /// Account repository for persistence
    repository: Arc<R>,
    /// Outbound mail dispatch
    mailer: Arc<M>,
    /// JWT issuance and verification
    tokens: Arc<TokenService>,
    /// Password hashing and timing mitigation
    hasher: PasswordHasher,
    /// Injectable time source for TTL checks
    clock: Arc<dyn Clock>,
    /// Service configuration
    config: AuthConfig,
}

impl<R, M> AuthService<R, M>
where
    R: AccountRepository,
    M: Mailer,
{
    /// Creates a new authentication service
    pub fn new(
        repository: Arc<R>,
        mailer: Arc<M>,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
        clock: Arc<dyn Clock>,
        config: AuthConfig,
    ) -> Self {
        Self {
            repository,
            mailer,
            tokens,
            hasher,
            clock,
            config,
        }
    }

    /// Registers a new, unverified account and emails it a verification code.
    ///
    /// The code is embedded in the account record before creation. If
    /// delivery fails the code is cleared but the account is kept, and the
    /// failure surfaces as retryable; the caller resends rather than
    /// re-registering.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        password_confirmation: &str,
    ) -> DomainResult<Account> {
        require("name", name)?;
        require("email", email)?;
        validate_email(email)?;
        self.validate_new_password(password, password_confirmation)?;

        let normalized = Account::normalize_email(email);
        if self.repository.exists_by_email(&normalized).await? {
            // Same cost as the hash the happy path pays below
            self.hasher.mitigate_timing_attack().await;
            return Err(AuthError::EmailAlreadyRegistered.into());
        }

        let password_hash = self.hasher.hash(password).await?;
        let now = self.clock.now();

        let mut account = Account::new(name.trim().to_string(), email, password_hash, now);
        let code = OneTimeCode::generate(OtpPurpose::EmailVerify, now);
        let body = verify_body(&code);
        account.store_code(code, now);

        let created = self.repository.create(account).await.map_err(|e| match e {
            // Lost the race between the existence check and the insert
            DomainError::Conflict { .. } => AuthError::EmailAlreadyRegistered.into(),
            other => other,
        })?;

        if let Err(err) = self.mailer.send(&created.email, VERIFY_SUBJECT, &body).await {
            tracing::warn!(
                email = %mask_email(&created.email),
                "verification email failed, clearing the issued code"
            );
            self.invalidate_code(created.id, OtpPurpose::EmailVerify).await?;
            return Err(err);
        }

        tracing::info!(email = %mask_email(&created.email), "account registered");
        Ok(created)
    }

    /// Authenticates an account by email and password.
    ///
    /// Unknown email, inactive account, wrong password, and unverified email
    /// all yield the same generic error; the first two run the timing
    /// mitigation so no branch is distinguishable by response time, and the
    /// unverified branch silently dispatches a fresh verification code.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        ip: &str,
        user_agent: &str,
    ) -> DomainResult<LoginOutcome> {
        require("email", email)?;
        require("password", password)?;

        let normalized = Account::normalize_email(email);
        let account = match self.repository.find_by_email(&normalized).await? {
            Some(account) if account.is_active => account,
            _ => {
                self.hasher.mitigate_timing_attack().await;
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !self.hasher.verify(password, &account.password_hash).await? {
            return Err(AuthError::InvalidCredentials.into());
        }

        if !account.is_email_verified {
            // Re-issue the verification code but do not confirm the
            // verification state to the caller
            let _ = self
                .dispatch_code(
                    account.id,
                    OtpPurpose::EmailVerify,
                    &account.email,
                    VERIFY_SUBJECT,
                )
                .await;
            return Err(AuthError::InvalidCredentials.into());
        }

        if self.config.two_factor == TwoFactorPolicy::AdminOnly
            && account.role == AccountRole::Admin
        {
            let to = account
                .two_factor_email
                .clone()
                .unwrap_or_else(|| account.email.clone());
            self.dispatch_code(account.id, OtpPurpose::AdminTwoFactor, &to, TWO_FACTOR_SUBJECT)
                .await?;
            return Ok(LoginOutcome::TwoFactorPending);
        }

        let authenticated = self.establish_session(account.id, ip, user_agent).await?;
        tracing::info!(email = %mask_email(&normalized), "login succeeded");
        Ok(LoginOutcome::Authenticated(authenticated))
    }

    /// Completes an admin login gated by the two-factor policy.
    ///
    /// Re-verifies the password, checks the stored code, then proceeds
    /// exactly like a successful login.
    pub async fn verify_two_factor(
        &self,
        email: &str,
        password: &str,
        code: &str,
        ip: &str,
        user_agent: &str,
    ) -> DomainResult<AuthenticatedAccount> {
        let normalized = Account::normalize_email(email);
        let account = match self.repository.find_by_email(&normalized).await? {
            Some(account) if account.is_active => account,
            _ => {
                self.hasher.mitigate_timing_attack().await;
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !self.hasher.verify(password, &account.password_hash).await? {
            return Err(AuthError::InvalidCredentials.into());
        }

        let stored = account
            .two_factor_code
            .clone()
            .ok_or(AuthError::InvalidOneTimeCode)?;
        match stored.check(code, self.clock.now()) {
            Ok(()) => {}
            Err(CodeError::Mismatch) => return Err(AuthError::InvalidOneTimeCode.into()),
            Err(CodeError::Expired) => {
                self.invalidate_code(account.id, OtpPurpose::AdminTwoFactor)
                    .await?;
                return Err(AuthError::OneTimeCodeExpired.into());
            }
        }

        let now = self.clock.now();
        let ip = ip.to_string();
        let user_agent = user_agent.to_string();
        let (saved, pair) = self
            .update_with_retry(account.id, |account| {
                account.clear_code(OtpPurpose::AdminTwoFactor, now);
                if !account.sessions.has_capacity() {
                    return Err(AuthError::TooManySessions.into());
                }
                let pair = self.tokens.issue_pair(account.id, now)?;
                account
                    .sessions
                    .add(Session::new(
                        pair.refresh_token.clone(),
                        ip.clone(),
                        user_agent.clone(),
                        now,
                    ))
                    .map_err(|_| DomainError::Auth(AuthError::TooManySessions))?;
                Ok(pair)
            })
            .await?;

        Ok(AuthenticatedAccount::new(&saved, pair))
    }

    /// Confirms control of the signup email with a one-time code.
    ///
    /// Verification is terminal; the code is consumed whether it succeeds or
    /// turns out to be expired.
    pub async fn verify_email(&self, email: &str, code: &str) -> DomainResult<Account> {
        let normalized = Account::normalize_email(email);
        let account = self
            .repository
            .find_by_email(&normalized)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if account.is_email_verified {
            return Err(AuthError::EmailAlreadyVerified.into());
        }

        let stored = account.otp.clone().ok_or(AuthError::InvalidOneTimeCode)?;
        match stored.check(code, self.clock.now()) {
            Ok(()) => {}
            Err(CodeError::Mismatch) => return Err(AuthError::InvalidOneTimeCode.into()),
            Err(CodeError::Expired) => {
                self.invalidate_code(account.id, OtpPurpose::EmailVerify)
                    .await?;
                return Err(AuthError::OneTimeCodeExpired.into());
            }
        }

        let now = self.clock.now();
        let (saved, _) = self
            .update_with_retry(account.id, |account| {
                account.clear_code(OtpPurpose::EmailVerify, now);
                account.verify_email(now);
                Ok(())
            })
            .await?;

        tracing::info!(email = %mask_email(&saved.email), "email verified");
        Ok(saved)
    }

    /// Issues a fresh verification code, replacing any unconsumed one
    pub async fn resend_otp(&self, email: &str) -> DomainResult<()> {
        let normalized = Account::normalize_email(email);
        let account = self
            .repository
            .find_by_email(&normalized)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if account.is_email_verified {
            return Err(AuthError::EmailAlreadyVerified.into());
        }

        self.dispatch_code(
            account.id,
            OtpPurpose::EmailVerify,
            &account.email,
            VERIFY_SUBJECT,
        )
        .await
    }

    /// Issues a password-reset ticket and emails the plaintext token.
    ///
    /// The plaintext is embedded in the mail and never returned to the
    /// caller; only its hash is persisted. A new ticket silently invalidates
    /// any unconsumed prior one.
    pub async fn forgot_password(&self, email: &str) -> DomainResult<()> {
        let normalized = Account::normalize_email(email);
        let account = self
            .repository
            .find_by_email(&normalized)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        let now = self.clock.now();
        let (ticket, plaintext) = PasswordResetTicket::issue(now);
        self.update_with_retry(account.id, |account| {
            account.store_reset_ticket(ticket.clone(), now);
            Ok(())
        })
        .await?;

        let body = format!(
            "Use the following token to reset your FoodyDrop password: {plaintext}\n\
             It expires in 15 minutes. If you did not request a reset, ignore this email."
        );
        if let Err(err) = self.mailer.send(&account.email, RESET_SUBJECT, &body).await {
            tracing::warn!(
                email = %mask_email(&account.email),
                "reset email failed, clearing the issued ticket"
            );
            self.invalidate_code(account.id, OtpPurpose::PasswordReset)
                .await?;
            return Err(err);
        }

        Ok(())
    }

    /// Redeems a reset ticket and replaces the password.
    ///
    /// Unknown email and wrong token are deliberately conflated into one
    /// error so the response does not reveal which was wrong. An expired
    /// ticket is consumed and the password left unchanged. On success every
    /// session is revoked, so a refresh token stolen along with the old
    /// password dies here; the caller logs in again.
    pub async fn reset_password(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
        password_confirmation: &str,
    ) -> DomainResult<()> {
        self.validate_new_password(new_password, password_confirmation)?;

        let normalized = Account::normalize_email(email);
        let account = self
            .repository
            .find_by_email(&normalized)
            .await?
            .ok_or(AuthError::InvalidResetTicket)?;

        let ticket = account
            .password_reset
            .clone()
            .filter(|t| t.matches(token))
            .ok_or(AuthError::InvalidResetTicket)?;

        if ticket.is_expired(self.clock.now()) {
            self.invalidate_code(account.id, OtpPurpose::PasswordReset)
                .await?;
            return Err(AuthError::ResetTicketExpired.into());
        }

        let password_hash = self.hasher.hash(new_password).await?;
        let now = self.clock.now();
        self.update_with_retry(account.id, |account| {
            account.clear_code(OtpPurpose::PasswordReset, now);
            account.set_password(password_hash.clone(), now);
            account.sessions.clear();
            Ok(())
        })
        .await?;

        tracing::info!(email = %mask_email(&normalized), "password reset");
        Ok(())
    }

    /// Changes the password of an authenticated account.
    ///
    /// Requires the current password and rejects a new password equal to it.
    /// On success a fresh token pair is minted and a new session appended;
    /// tokens issued before the change are invalidated by the stamped
    /// password-changed instant.
    pub async fn update_password(
        &self,
        account_id: Uuid,
        current_password: &str,
        new_password: &str,
        password_confirmation: &str,
        ip: &str,
        user_agent: &str,
    ) -> DomainResult<AuthenticatedAccount> {
        self.validate_new_password(new_password, password_confirmation)?;

        let account = self
            .repository
            .find_by_id(account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !self
            .hasher
            .verify(current_password, &account.password_hash)
            .await?
        {
            return Err(AuthError::InvalidCredentials.into());
        }
        if self
            .hasher
            .verify(new_password, &account.password_hash)
            .await?
        {
            return Err(AuthError::SamePassword.into());
        }

        let password_hash = self.hasher.hash(new_password).await?;
        let now = self.clock.now();
        let ip = ip.to_string();
        let user_agent = user_agent.to_string();
        let (saved, pair) = self
            .update_with_retry(account_id, |account| {
                account.set_password(password_hash.clone(), now);
                if !account.sessions.has_capacity() {
                    return Err(AuthError::TooManySessions.into());
                }
                let pair = self.tokens.issue_pair(account.id, now)?;
                account
                    .sessions
                    .add(Session::new(
                        pair.refresh_token.clone(),
                        ip.clone(),
                        user_agent.clone(),
                        now,
                    ))
                    .map_err(|_| DomainError::Auth(AuthError::TooManySessions))?;
                Ok(pair)
            })
            .await?;

        Ok(AuthenticatedAccount::new(&saved, pair))
    }

    /// Exchanges a valid refresh token for a fresh token pair.
    ///
    /// The presented token must match a live session; on success the session
    /// rotates in place and the old token value is permanently dead. A
    /// signature-valid token with no matching session is treated as replay.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<AuthenticatedAccount> {
        let claims = self.tokens.verify_refresh(refresh_token)?;
        let account_id = claims
            .account_id()
            .map_err(|_| DomainError::Token(TokenError::Invalid))?;

        let now = self.clock.now();
        let token = refresh_token.to_string();
        let result = self
            .update_with_retry(account_id, |account| {
                if !account.is_active {
                    return Err(AuthError::InactiveAccount.into());
                }
                let pair = self.tokens.issue_pair(account.id, now)?;
                account
                    .sessions
                    .rotate(&token, pair.refresh_token.clone(), now)
                    .map_err(|_| DomainError::Auth(AuthError::SessionNotFound))?;
                Ok(pair)
            })
            .await;

        match result {
            Ok((saved, pair)) => Ok(AuthenticatedAccount::new(&saved, pair)),
            // The subject no longer exists; indistinguishable from a revoked
            // session as far as the caller is concerned
            Err(DomainError::Auth(AuthError::AccountNotFound)) => {
                Err(AuthError::SessionNotFound.into())
            }
            Err(e) => Err(e),
        }
    }

    /// Revokes the session holding the presented refresh token.
    ///
    /// The request layer clears both cookies regardless of the outcome here.
    pub async fn logout(&self, refresh_token: &str) -> DomainResult<()> {
        let claims = self.tokens.verify_refresh(refresh_token)?;
        let account_id = claims
            .account_id()
            .map_err(|_| DomainError::Token(TokenError::Invalid))?;

        let token = refresh_token.to_string();
        self.update_with_retry(account_id, |account| {
            account
                .sessions
                .remove_by_token(&token)
                .map_err(|_| DomainError::Auth(AuthError::SessionNotFound))?;
            Ok(())
        })
        .await?;
        Ok(())
    }

    /// Lists the account's active sessions
    pub async fn list_sessions(&self, account_id: Uuid) -> DomainResult<Vec<SessionView>> {
        let account = self
            .repository
            .find_by_id(account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;
        Ok(account.sessions.iter().map(SessionView::from).collect())
    }

    /// Fetches a single session by identifier
    pub async fn get_session(
        &self,
        account_id: Uuid,
        session_id: Uuid,
    ) -> DomainResult<SessionView> {
        let account = self
            .repository
            .find_by_id(account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;
        account
            .sessions
            .get(session_id)
            .map(SessionView::from)
            .ok_or_else(|| AuthError::SessionNotFound.into())
    }

    /// Revokes one session by identifier
    pub async fn revoke_session(&self, account_id: Uuid, session_id: Uuid) -> DomainResult<()> {
        self.update_with_retry(account_id, |account| {
            account
                .sessions
                .remove(session_id)
                .map_err(|_| DomainError::Auth(AuthError::SessionNotFound))?;
            Ok(())
        })
        .await?;
        Ok(())
    }

    /// Revokes every session, killing all outstanding refresh tokens.
    ///
    /// Fails when no session exists; returns the number revoked otherwise.
    pub async fn revoke_all_sessions(&self, account_id: Uuid) -> DomainResult<usize> {
        let (_, revoked) = self
            .update_with_retry(account_id, |account| {
                if account.sessions.is_empty() {
                    return Err(AuthError::SessionNotFound.into());
                }
                let count = account.sessions.len();
                account.sessions.clear();
                Ok(count)
            })
            .await?;
        tracing::info!(%account_id, revoked, "all sessions revoked");
        Ok(revoked)
    }

    /// Soft-deactivates an account and revokes its sessions
    pub async fn deactivate_account(&self, account_id: Uuid) -> DomainResult<()> {
        let now = self.clock.now();
        self.update_with_retry(account_id, |account| {
            account.deactivate(now);
            Ok(())
        })
        .await?;
        tracing::info!(%account_id, "account deactivated");
        Ok(())
    }

    /// Resolves an access token to its account for the request guard.
    ///
    /// Rejects inactive accounts and tokens minted before the last password
    /// change.
    pub async fn authorize_access(&self, access_token: &str) -> DomainResult<Account> {
        let claims = self.tokens.verify_access(access_token)?;
        let account_id = claims
            .account_id()
            .map_err(|_| DomainError::Token(TokenError::Invalid))?;

        let account = self
            .repository
            .find_by_id(account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !account.is_active {
            return Err(AuthError::InactiveAccount.into());
        }
        if account.password_changed_after(claims.issued_at()) {
            return Err(AuthError::PasswordChanged.into());
        }
        Ok(account)
    }

    // ---- internals ----

    /// Mints a token pair and appends a session, cap-checked before minting
    /// so a rejection never leaves an orphaned refresh token.
    async fn establish_session(
        &self,
        account_id: Uuid,
        ip: &str,
        user_agent: &str,
    ) -> DomainResult<AuthenticatedAccount> {
        let now = self.clock.now();
        let ip = ip.to_string();
        let user_agent = user_agent.to_string();
        let (saved, pair) = self
            .update_with_retry(account_id, |account| {
                if !account.sessions.has_capacity() {
                    return Err(AuthError::TooManySessions.into());
                }
                let pair = self.tokens.issue_pair(account.id, now)?;
                account
                    .sessions
                    .add(Session::new(
                        pair.refresh_token.clone(),
                        ip.clone(),
                        user_agent.clone(),
                        now,
                    ))
                    .map_err(|_| DomainError::Auth(AuthError::TooManySessions))?;
                Ok(pair)
            })
            .await?;
        Ok(AuthenticatedAccount::new(&saved, pair))
    }

    /// Stores a fresh code, then attempts delivery; a failed send clears the
    /// code so no valid, undelivered code stays live.
    async fn dispatch_code(
        &self,
        account_id: Uuid,
        purpose: OtpPurpose,
        to: &str,
        subject: &str,
    ) -> DomainResult<()> {
        let now = self.clock.now();
        let code = OneTimeCode::generate(purpose, now);
        let body = verify_body(&code);
        self.update_with_retry(account_id, |account| {
            account.store_code(code.clone(), now);
            Ok(())
        })
        .await?;

        if let Err(err) = self.mailer.send(to, subject, &body).await {
            tracing::warn!(
                email = %mask_email(to),
                "code delivery failed, clearing the issued code"
            );
            self.invalidate_code(account_id, purpose).await?;
            return Err(err);
        }
        Ok(())
    }

    /// Clears a stored ephemeral secret and persists the clear
    async fn invalidate_code(&self, account_id: Uuid, purpose: OtpPurpose) -> DomainResult<()> {
        let now = self.clock.now();
        self.update_with_retry(account_id, |account| {
            account.clear_code(purpose, now);
            Ok(())
        })
        .await?;
        Ok(())
    }

    /// Read-modify-write cycle retried on version conflicts.
    ///
    /// `apply` runs against a fresh read on every attempt; an error from it
    /// aborts without retrying. Bounded by the configured retry budget.
    async fn update_with_retry<T, F>(&self, account_id: Uuid, mut apply: F) -> DomainResult<(Account, T)>
    where
        F: FnMut(&mut Account) -> DomainResult<T>,
    {
        let mut attempt: u32 = 0;
        loop {
            let mut account = self
                .repository
                .find_by_id(account_id)
                .await?
                .ok_or(AuthError::AccountNotFound)?;
            let value = apply(&mut account)?;
            match self.repository.update(account).await {
                Ok(saved) => return Ok((saved, value)),
                Err(DomainError::VersionConflict) if attempt + 1 < self.config.update_retries => {
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn validate_new_password(&self, password: &str, confirmation: &str) -> DomainResult<()> {
        if password.len() < self.config.min_password_length {
            return Err(ValidationError::PasswordTooShort {
                min: self.config.min_password_length,
            }
            .into());
        }
        if password != confirmation {
            return Err(ValidationError::PasswordMismatch.into());
        }
        Ok(())
    }
}

fn require(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::RequiredField {
            field: field.to_string(),
        }
        .into());
    }
    Ok(())
}

fn validate_email(email: &str) -> DomainResult<()> {
    let trimmed = email.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ValidationError::InvalidEmail.into()),
    }
}

fn verify_body(code: &OneTimeCode) -> String {
    format!(
        "Your FoodyDrop code is {}. It expires in {} minutes.",
        code.code,
        code.purpose.ttl().num_minutes()
    )
}
