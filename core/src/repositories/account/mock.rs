//! Mock implementation of AccountRepository for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::account::Account;
use crate::errors::DomainError;

use super::trait_::AccountRepository;

/// In-memory account repository.
///
/// Enforces the same email-uniqueness and conditional-version semantics as
/// the MySQL implementation so concurrency properties are testable without
/// a database.
pub struct MockAccountRepository {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl MockAccountRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored accounts (test helper)
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }
}

impl Default for MockAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).cloned())
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|a| a.email == account.email) {
            return Err(DomainError::Conflict {
                message: "email already registered".to_string(),
            });
        }

        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(&self, mut account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        let stored = accounts.get(&account.id).ok_or(DomainError::NotFound {
            resource: "Account".to_string(),
        })?;

        if stored.version != account.version {
            return Err(DomainError::VersionConflict);
        }

        account.version += 1;
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().any(|a| a.email == email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn account(email: &str) -> Account {
        Account::new(
            "Test".to_string(),
            email,
            "$2b$04$hash".to_string(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = MockAccountRepository::new();
        let created = repo.create(account("a@x.com")).await.unwrap();

        let by_email = repo.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);

        let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = MockAccountRepository::new();
        repo.create(account("a@x.com")).await.unwrap();

        let result = repo.create(account("a@x.com")).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_bumps_version() {
        let repo = MockAccountRepository::new();
        let created = repo.create(account("a@x.com")).await.unwrap();
        assert_eq!(created.version, 0);

        let updated = repo.update(created).await.unwrap();
        assert_eq!(updated.version, 1);
    }

    #[tokio::test]
    async fn test_stale_version_rejected() {
        let repo = MockAccountRepository::new();
        let created = repo.create(account("a@x.com")).await.unwrap();

        // Two readers observe version 0
        let first = created.clone();
        let second = created;

        repo.update(first).await.unwrap();
        let result = repo.update(second).await;
        assert!(matches!(result, Err(DomainError::VersionConflict)));
    }
}
