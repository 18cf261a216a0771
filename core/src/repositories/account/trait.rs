//! Account repository trait defining the interface for account persistence.
//!
//! The trait is async-first and keeps the domain/infrastructure boundary:
//! implementations handle the actual datastore while the auth service only
//! sees these operations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::account::Account;
use crate::errors::DomainError;

/// Repository contract for Account persistence.
///
/// `update` is the concurrency seam: it must persist conditionally on the
/// version the caller read (bumping it by one on success) and fail with
/// [`DomainError::VersionConflict`] when another writer got there first.
/// Session-collection mutations rely on this to avoid lost updates.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by its case-normalized email
    ///
    /// # Returns
    /// * `Ok(Some(Account))` - Account found
    /// * `Ok(None)` - No account registered under this email
    /// * `Err(DomainError)` - Datastore failure
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    /// Find an account by its unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError>;

    /// Persist a new account
    ///
    /// Fails with a conflict when the email is already registered; the email
    /// uniqueness invariant is enforced here, not in the service.
    async fn create(&self, account: Account) -> Result<Account, DomainError>;

    /// Conditionally persist an updated account.
    ///
    /// The write succeeds only if the stored version still equals
    /// `account.version`; the returned account carries the bumped version.
    async fn update(&self, account: Account) -> Result<Account, DomainError>;

    /// Check whether an email is already registered
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError>;
}
