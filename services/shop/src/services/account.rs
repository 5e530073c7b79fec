//! Signup, login and bearer-token authentication

use common::error::DatabaseError;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::task;
use tracing::{error, info, warn};

use crate::{
    jwt::{JwtService, TokenError},
    models::{NewUser, UserResponse},
    password::{PasswordError, PasswordService},
    repositories::UserStore,
    validation,
};

/// Account rules that are configurable at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountPolicy {
    /// Reject signups whose username is already taken
    pub enforce_unique_username: bool,
}

impl Default for AccountPolicy {
    fn default() -> Self {
        Self {
            enforce_unique_username: true,
        }
    }
}

/// Token returned by a successful login
#[derive(Debug, Clone, Serialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: &'static str,
}

/// Account service errors
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0}")]
    Validation(String),

    #[error("user already registered")]
    DuplicateAccount,

    /// Unknown username and wrong password both end up here
    #[error("incorrect username or password")]
    InvalidCredentials,

    #[error("invalid token: {0}")]
    InvalidToken(#[source] TokenError),

    #[error("token subject does not exist")]
    UnknownSubject,

    #[error("failed to issue token: {0}")]
    TokenIssue(#[source] TokenError),

    #[error("persistence error: {0}")]
    Persistence(#[from] DatabaseError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("password task failed: {0}")]
    Task(#[from] task::JoinError),
}

/// Account service
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    passwords: PasswordService,
    jwt: JwtService,
    policy: AccountPolicy,
}

impl AccountService {
    /// Create a new account service
    pub fn new(
        users: Arc<dyn UserStore>,
        passwords: PasswordService,
        jwt: JwtService,
        policy: AccountPolicy,
    ) -> Self {
        Self {
            users,
            passwords,
            jwt,
            policy,
        }
    }

    /// Register a new user
    ///
    /// The email must not be on file. The username must not be either, unless
    /// the policy allows duplicates. A unique violation raised by the store
    /// (two concurrent signups) is reported as a duplicate as well.
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserResponse, AccountError> {
        validation::validate_username(username).map_err(AccountError::Validation)?;
        validation::validate_email(email).map_err(AccountError::Validation)?;
        validation::validate_password(password).map_err(AccountError::Validation)?;

        info!("Signup attempt for user: {}", username);

        if self.users.find_by_email(email).await?.is_some() {
            warn!("Signup rejected, email already registered: {}", username);
            return Err(AccountError::DuplicateAccount);
        }

        if self.policy.enforce_unique_username
            && self.users.find_by_username(username).await?.is_some()
        {
            warn!("Signup rejected, username already taken: {}", username);
            return Err(AccountError::DuplicateAccount);
        }

        let password_hash = self.hash_password(password).await?;

        let new_user = NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
        };

        match self.users.create(new_user).await {
            Ok(user) => {
                info!("User {} registered with id {}", user.username, user.id);
                Ok(user.into())
            }
            Err(DatabaseError::UniqueViolation { constraint }) => {
                warn!("Signup lost a race on {}: {}", constraint, username);
                Err(AccountError::DuplicateAccount)
            }
            Err(e) => {
                error!("Failed to create user: {}", e);
                Err(AccountError::Persistence(e))
            }
        }
    }

    /// Check credentials and issue an access token for the user
    pub async fn login(&self, username: &str, password: &str) -> Result<AccessToken, AccountError> {
        info!("Login attempt for user: {}", username);

        let user = if username.is_empty() {
            None
        } else {
            self.users.find_by_username(username).await?
        };

        let verified = match &user {
            Some(user) => self.verify_password(password, &user.password_hash).await?,
            None => {
                self.verify_dummy(password).await?;
                false
            }
        };

        let user = match user {
            Some(user) if verified => user,
            _ => {
                warn!("Login failed for user: {}", username);
                return Err(AccountError::InvalidCredentials);
            }
        };

        let access_token = self
            .jwt
            .issue(&user.username, Some(self.jwt.access_token_ttl()))
            .map_err(|e| {
                error!("Failed to generate access token: {}", e);
                AccountError::TokenIssue(e)
            })?;

        Ok(AccessToken {
            access_token,
            token_type: "bearer",
        })
    }

    /// Resolve a bearer token to the user it was issued for
    pub async fn authenticate(&self, token: &str) -> Result<UserResponse, AccountError> {
        let claims = self.jwt.verify(token).map_err(AccountError::InvalidToken)?;

        let user = self
            .users
            .find_by_username(&claims.sub)
            .await?
            .ok_or(AccountError::UnknownSubject)?;

        Ok(user.into())
    }

    async fn hash_password(&self, password: &str) -> Result<String, AccountError> {
        let passwords = self.passwords.clone();
        let password = password.to_string();
        let hash = task::spawn_blocking(move || passwords.hash(&password)).await??;
        Ok(hash)
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AccountError> {
        let passwords = self.passwords.clone();
        let password = password.to_string();
        let hash = hash.to_string();
        Ok(task::spawn_blocking(move || passwords.verify(&password, &hash)).await?)
    }

    async fn verify_dummy(&self, password: &str) -> Result<(), AccountError> {
        let passwords = self.passwords.clone();
        let password = password.to_string();
        task::spawn_blocking(move || passwords.verify_dummy(&password)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{jwt::JwtConfig, password, repositories::MemoryStore};

    fn service_with(policy: AccountPolicy) -> AccountService {
        let store = MemoryStore::new(policy.enforce_unique_username);
        AccountService::new(
            Arc::new(store),
            PasswordService::new(&password::test_config()).unwrap(),
            JwtService::new(&JwtConfig::new("test-secret")).unwrap(),
            policy,
        )
    }

    fn service() -> AccountService {
        service_with(AccountPolicy::default())
    }

    #[tokio::test]
    async fn test_signup_returns_user_without_hash() {
        let user = service().signup("alice", "alice@x.com", "pw").await.unwrap();

        assert!(user.id >= 1);
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@x.com");
    }

    #[tokio::test]
    async fn test_signup_with_registered_email_is_duplicate() {
        let accounts = service();
        accounts.signup("alice", "alice@x.com", "pw").await.unwrap();

        let err = accounts
            .signup("bob", "alice@x.com", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::DuplicateAccount));
    }

    #[tokio::test]
    async fn test_signup_with_taken_username_is_duplicate_by_default() {
        let accounts = service();
        accounts.signup("alice", "alice@x.com", "pw").await.unwrap();

        let err = accounts
            .signup("alice", "other@x.com", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::DuplicateAccount));
    }

    #[tokio::test]
    async fn test_signup_with_taken_username_succeeds_when_allowed() {
        let accounts = service_with(AccountPolicy {
            enforce_unique_username: false,
        });
        let first = accounts.signup("alice", "alice@x.com", "pw").await.unwrap();
        let second = accounts
            .signup("alice", "other@x.com", "pw2")
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        // Login resolves to the oldest account with that username
        assert!(accounts.login("alice", "pw").await.is_ok());
        assert!(matches!(
            accounts.login("alice", "pw2").await,
            Err(AccountError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_signup_validates_input() {
        let accounts = service();

        for (username, email, password) in [
            ("", "alice@x.com", "pw"),
            ("alice", "not-an-email", "pw"),
            ("alice", "alice@x.com", ""),
        ] {
            let err = accounts.signup(username, email, password).await.unwrap_err();
            assert!(matches!(err, AccountError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_login_issues_bearer_token_for_username() {
        let accounts = service();
        accounts.signup("alice", "alice@x.com", "pw").await.unwrap();

        let token = accounts.login("alice", "pw").await.unwrap();
        assert_eq!(token.token_type, "bearer");

        let claims = accounts.jwt.verify(&token.access_token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_fail_alike() {
        let accounts = service();
        accounts.signup("alice", "alice@x.com", "pw").await.unwrap();

        let wrong_password = accounts.login("alice", "wrong").await.unwrap_err();
        let unknown_user = accounts.login("nobody", "pw").await.unwrap_err();
        let empty_user = accounts.login("", "pw").await.unwrap_err();

        assert!(matches!(wrong_password, AccountError::InvalidCredentials));
        assert!(matches!(unknown_user, AccountError::InvalidCredentials));
        assert!(matches!(empty_user, AccountError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_authenticate_resolves_token_subject() {
        let accounts = service();
        let alice = accounts.signup("alice", "alice@x.com", "pw").await.unwrap();
        let token = accounts.login("alice", "pw").await.unwrap();

        let user = accounts.authenticate(&token.access_token).await.unwrap();
        assert_eq!(user, alice);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_bad_tokens() {
        let accounts = service();

        let err = accounts.authenticate("garbage").await.unwrap_err();
        assert!(matches!(
            err,
            AccountError::InvalidToken(TokenError::Malformed)
        ));

        let orphan = accounts.jwt.issue("ghost", None).unwrap();
        let err = accounts.authenticate(&orphan).await.unwrap_err();
        assert!(matches!(err, AccountError::UnknownSubject));
    }
}
