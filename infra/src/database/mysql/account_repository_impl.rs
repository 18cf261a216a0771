//! MySQL implementation of the AccountRepository trait.
//!
//! Accounts live in a single `accounts` table; the session collection and
//! the ephemeral secrets are JSON columns, so every account mutation is one
//! row write. Optimistic concurrency is a conditional `UPDATE ... WHERE
//! version = ?`: a lost race affects zero rows and surfaces as a version
//! conflict for the service to retry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use fd_core::domain::entities::account::{Account, AccountRole};
use fd_core::domain::entities::one_time_code::OneTimeCode;
use fd_core::domain::entities::reset_ticket::PasswordResetTicket;
use fd_core::domain::entities::session::SessionSet;
use fd_core::errors::DomainError;
use fd_core::repositories::AccountRepository;

/// MySQL implementation of AccountRepository
pub struct MySqlAccountRepository {
    /// Database connection pool
    pool: MySqlPool,
}

const SELECT_COLUMNS: &str = "id, email, name, password_hash, role, is_active, \
    is_email_verified, two_factor_email, otp, two_factor_code, password_reset, \
    sessions, password_changed_at, created_at, updated_at, version";

impl MySqlAccountRepository {
    /// Creates a new MySQL account repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn role_to_str(role: AccountRole) -> &'static str {
        match role {
            AccountRole::Customer => "customer",
            AccountRole::Admin => "admin",
            AccountRole::DeliveryAgent => "delivery-agent",
            AccountRole::RestaurantOwner => "restaurant-owner",
        }
    }

    fn role_from_str(raw: &str) -> Result<AccountRole, DomainError> {
        match raw {
            "customer" => Ok(AccountRole::Customer),
            "admin" => Ok(AccountRole::Admin),
            "delivery-agent" => Ok(AccountRole::DeliveryAgent),
            "restaurant-owner" => Ok(AccountRole::RestaurantOwner),
            other => Err(DomainError::Internal {
                message: format!("unknown role in database: {other}"),
            }),
        }
    }

    fn json_column<T: serde::de::DeserializeOwned>(
        row: &sqlx::mysql::MySqlRow,
        column: &str,
    ) -> Result<Option<T>, DomainError> {
        let raw: Option<String> = row.try_get(column).map_err(|e| DomainError::Internal {
            message: format!("failed to get {column}: {e}"),
        })?;
        raw.map(|json| {
            serde_json::from_str(&json).map_err(|e| DomainError::Internal {
                message: format!("corrupt {column} column: {e}"),
            })
        })
        .transpose()
    }

    fn to_json<T: serde::Serialize>(value: &Option<T>) -> Result<Option<String>, DomainError> {
        value
            .as_ref()
            .map(|v| {
                serde_json::to_string(v).map_err(|e| DomainError::Internal {
                    message: format!("failed to serialize column: {e}"),
                })
            })
            .transpose()
    }

    fn row_to_account(row: &sqlx::mysql::MySqlRow) -> Result<Account, DomainError> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("failed to get id: {e}"),
        })?;
        let role: String = row.try_get("role").map_err(|e| DomainError::Internal {
            message: format!("failed to get role: {e}"),
        })?;
        let sessions: String = row.try_get("sessions").map_err(|e| DomainError::Internal {
            message: format!("failed to get sessions: {e}"),
        })?;

        Ok(Account {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("invalid account UUID: {e}"),
            })?,
            email: row.try_get("email").map_err(|e| DomainError::Internal {
                message: format!("failed to get email: {e}"),
            })?,
            name: row.try_get("name").map_err(|e| DomainError::Internal {
                message: format!("failed to get name: {e}"),
            })?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| DomainError::Internal {
                    message: format!("failed to get password_hash: {e}"),
                })?,
            role: Self::role_from_str(&role)?,
            is_active: row.try_get("is_active").map_err(|e| DomainError::Internal {
                message: format!("failed to get is_active: {e}"),
            })?,
            is_email_verified: row
                .try_get("is_email_verified")
                .map_err(|e| DomainError::Internal {
                    message: format!("failed to get is_email_verified: {e}"),
                })?,
            two_factor_email: row
                .try_get("two_factor_email")
                .map_err(|e| DomainError::Internal {
                    message: format!("failed to get two_factor_email: {e}"),
                })?,
            otp: Self::json_column::<OneTimeCode>(row, "otp")?,
            two_factor_code: Self::json_column::<OneTimeCode>(row, "two_factor_code")?,
            password_reset: Self::json_column::<PasswordResetTicket>(row, "password_reset")?,
            sessions: serde_json::from_str::<SessionSet>(&sessions).map_err(|e| {
                DomainError::Internal {
                    message: format!("corrupt sessions column: {e}"),
                }
            })?,
            password_changed_at: row
                .try_get::<Option<DateTime<Utc>>, _>("password_changed_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("failed to get password_changed_at: {e}"),
                })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("failed to get created_at: {e}"),
                })?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("failed to get updated_at: {e}"),
                })?,
            version: row.try_get("version").map_err(|e| DomainError::Internal {
                message: format!("failed to get version: {e}"),
            })?,
        })
    }
}

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM accounts WHERE email = ? LIMIT 1");
        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("failed to find account by email: {e}"),
            })?;
        row.as_ref().map(Self::row_to_account).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM accounts WHERE id = ? LIMIT 1");
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("failed to find account by id: {e}"),
            })?;
        row.as_ref().map(Self::row_to_account).transpose()
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let query = r#"
            INSERT INTO accounts (
                id, email, name, password_hash, role, is_active, is_email_verified,
                two_factor_email, otp, two_factor_code, password_reset, sessions,
                password_changed_at, created_at, updated_at, version
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let sessions = serde_json::to_string(&account.sessions).map_err(|e| {
            DomainError::Internal {
                message: format!("failed to serialize sessions: {e}"),
            }
        })?;

        sqlx::query(query)
            .bind(account.id.to_string())
            .bind(&account.email)
            .bind(&account.name)
            .bind(&account.password_hash)
            .bind(Self::role_to_str(account.role))
            .bind(account.is_active)
            .bind(account.is_email_verified)
            .bind(&account.two_factor_email)
            .bind(Self::to_json(&account.otp)?)
            .bind(Self::to_json(&account.two_factor_code)?)
            .bind(Self::to_json(&account.password_reset)?)
            .bind(sessions)
            .bind(account.password_changed_at)
            .bind(account.created_at)
            .bind(account.updated_at)
            .bind(account.version)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                // Unique index on email
                sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::Conflict {
                    message: "email already registered".to_string(),
                },
                _ => DomainError::Internal {
                    message: format!("failed to create account: {e}"),
                },
            })?;

        Ok(account)
    }

    async fn update(&self, mut account: Account) -> Result<Account, DomainError> {
        let query = r#"
            UPDATE accounts SET
                email = ?, name = ?, password_hash = ?, role = ?, is_active = ?,
                is_email_verified = ?, two_factor_email = ?, otp = ?,
                two_factor_code = ?, password_reset = ?, sessions = ?,
                password_changed_at = ?, updated_at = ?, version = version + 1
            WHERE id = ? AND version = ?
        "#;

        let sessions = serde_json::to_string(&account.sessions).map_err(|e| {
            DomainError::Internal {
                message: format!("failed to serialize sessions: {e}"),
            }
        })?;

        let result = sqlx::query(query)
            .bind(&account.email)
            .bind(&account.name)
            .bind(&account.password_hash)
            .bind(Self::role_to_str(account.role))
            .bind(account.is_active)
            .bind(account.is_email_verified)
            .bind(&account.two_factor_email)
            .bind(Self::to_json(&account.otp)?)
            .bind(Self::to_json(&account.two_factor_code)?)
            .bind(Self::to_json(&account.password_reset)?)
            .bind(sessions)
            .bind(account.password_changed_at)
            .bind(account.updated_at)
            .bind(account.id.to_string())
            .bind(account.version)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("failed to update account: {e}"),
            })?;

        if result.rows_affected() == 0 {
            // Either the row is gone or another writer bumped the version
            let exists = self.find_by_id(account.id).await?.is_some();
            if exists {
                return Err(DomainError::VersionConflict);
            }
            return Err(DomainError::NotFound {
                resource: "Account".to_string(),
            });
        }

        account.version += 1;
        Ok(account)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = ?) AS present")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("failed to check email existence: {e}"),
            })?;
        let present: i8 = row.try_get("present").map_err(|e| DomainError::Internal {
            message: format!("failed to get existence result: {e}"),
        })?;
        Ok(present == 1)
    }
}
