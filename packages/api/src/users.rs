//! # User service — the layered account pipeline
//!
//! Composes the user validation chain over a [`UserStore`] and exposes the
//! public account operations. Handlers never call the store directly:
//! every write and identity-resolution path goes through the chain, so
//! plaintext credentials are always replaced by their hashes before a
//! record can reach storage.
//!
//! ## Validation steps
//!
//! [`UserStep`] names each rule; `CREATE_STEPS` and `UPDATE_STEPS` fix the
//! order per operation. Create demands a password, an email, and a name;
//! update treats password and remember-token regeneration as optional and
//! re-hashes only when the corresponding plaintext field is set. The
//! lookup paths reuse the same steps: `by_email` normalizes the address
//! first, `by_remember` length-checks and digests the presented token and
//! searches by the digest — raw tokens are never stored or searched.
//!
//! ## Authentication
//!
//! [`UserService::authenticate`] reports unknown emails and wrong
//! passwords as the same [`Error::InvalidCredentials`], so callers cannot
//! probe which addresses have accounts. Storage and hashing failures keep
//! their own error kinds.
//!
//! ## Known limitation
//!
//! The email availability step is a read-then-write pre-check: two
//! concurrent signups for the same address can both pass it. The UNIQUE
//! constraint on `users.email` is what actually guarantees uniqueness at
//! write time; when it fires, the failure surfaces as a storage error
//! rather than [`Error::EmailTaken`].

use regex::Regex;
use store::{StoreError, User, UserStore};

use crate::auth::{self, token, KeyedHasher};
use crate::error::Error;
use crate::validate::Validator;

/// Minimum password length, in characters.
const MIN_PASSWORD_LEN: usize = 8;

/// Emails must look like `local@domain.tld` once normalized.
const EMAIL_PATTERN: &str = r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,16}$";

/// A single rule in the user validation chain.
#[derive(Clone, Copy, Debug)]
enum UserStep {
    PasswordRequired,
    PasswordMinLength,
    PasswordHash,
    PasswordHashRequired,
    RememberDefault,
    RememberMinBytes,
    RememberHash,
    RememberHashRequired,
    EmailRequired,
    EmailNormalize,
    EmailFormat,
    EmailAvailable,
    NameRequired,
}

use UserStep::*;

/// Steps for creating a user, in order.
const CREATE_STEPS: &[UserStep] = &[
    PasswordRequired,
    PasswordMinLength,
    PasswordHash,
    PasswordHashRequired,
    RememberDefault,
    RememberMinBytes,
    RememberHash,
    RememberHashRequired,
    EmailRequired,
    EmailNormalize,
    EmailFormat,
    EmailAvailable,
    NameRequired,
];

/// Steps for updating a user. Credentials are only re-hashed when the
/// plaintext field is set; the "required" checks of create are dropped.
const UPDATE_STEPS: &[UserStep] = &[
    PasswordMinLength,
    PasswordHash,
    PasswordHashRequired,
    RememberMinBytes,
    RememberHash,
    RememberHashRequired,
    EmailNormalize,
    EmailFormat,
    EmailAvailable,
];

/// Steps for resolving a session from a client-presented token.
const BY_REMEMBER_STEPS: &[UserStep] = &[RememberMinBytes, RememberHash];

struct UserValidator<S> {
    store: S,
    hmac: KeyedHasher,
    pepper: String,
    email_regex: Regex,
}

impl<S: UserStore> UserValidator<S> {
    fn new(store: S, pepper: &str, hmac_key: &str) -> Self {
        Self {
            store,
            hmac: KeyedHasher::new(hmac_key),
            pepper: pepper.to_string(),
            email_regex: Regex::new(EMAIL_PATTERN).expect("email pattern compiles"),
        }
    }
}

impl<S: UserStore> Validator for UserValidator<S> {
    type Candidate = User;
    type Step = UserStep;

    async fn apply(&self, step: UserStep, user: &mut User) -> Result<(), Error> {
        match step {
            PasswordRequired => {
                if user.password.is_empty() {
                    return Err(Error::PasswordRequired);
                }
                Ok(())
            }
            PasswordMinLength => {
                if user.password.is_empty() {
                    return Ok(());
                }
                if user.password.chars().count() < MIN_PASSWORD_LEN {
                    return Err(Error::PasswordTooShort);
                }
                Ok(())
            }
            PasswordHash => {
                if user.password.is_empty() {
                    return Ok(());
                }
                user.password_hash = auth::hash_password(&user.password, &self.pepper)?;
                user.password.clear();
                Ok(())
            }
            PasswordHashRequired => {
                if user.password_hash.is_empty() {
                    return Err(Error::PasswordHashRequired);
                }
                Ok(())
            }
            RememberDefault => {
                if user.remember.is_empty() {
                    user.remember = token::remember_token()?;
                }
                Ok(())
            }
            RememberMinBytes => {
                if user.remember.is_empty() {
                    return Ok(());
                }
                if token::n_bytes(&user.remember)? < token::REMEMBER_TOKEN_BYTES {
                    return Err(Error::RememberTooShort);
                }
                Ok(())
            }
            RememberHash => {
                if user.remember.is_empty() {
                    return Ok(());
                }
                user.remember_hash = self.hmac.hash(&user.remember);
                user.remember.clear();
                Ok(())
            }
            RememberHashRequired => {
                if user.remember_hash.is_empty() {
                    return Err(Error::RememberHashRequired);
                }
                Ok(())
            }
            EmailRequired => {
                if user.email.trim().is_empty() {
                    return Err(Error::EmailRequired);
                }
                Ok(())
            }
            EmailNormalize => {
                user.email = user.email.trim().to_lowercase();
                Ok(())
            }
            EmailFormat => {
                if user.email.is_empty() {
                    return Ok(());
                }
                if !self.email_regex.is_match(&user.email) {
                    return Err(Error::EmailInvalid);
                }
                Ok(())
            }
            EmailAvailable => match self.store.by_email(&user.email).await {
                Ok(existing) if existing.id != user.id => Err(Error::EmailTaken),
                Ok(_) => Ok(()),
                Err(StoreError::NotFound) => Ok(()),
                Err(err) => Err(err.into()),
            },
            NameRequired => {
                if user.name.is_empty() {
                    return Err(Error::NameRequired);
                }
                Ok(())
            }
        }
    }
}

/// Public account operations: the validation chain over a [`UserStore`].
pub struct UserService<S> {
    validator: UserValidator<S>,
}

impl<S: UserStore> UserService<S> {
    /// Build a service over `store`. `pepper` and `hmac_key` are the
    /// process-wide secrets from [`Settings`](crate::settings::Settings).
    pub fn new(store: S, pepper: &str, hmac_key: &str) -> Self {
        Self {
            validator: UserValidator::new(store, pepper, hmac_key),
        }
    }

    /// Validate and persist a new user. On success the candidate carries
    /// its storage-assigned id and hashed credentials; the plaintext
    /// `password` and `remember` fields are cleared.
    pub async fn create(&self, user: &mut User) -> Result<(), Error> {
        self.validator.run(user, CREATE_STEPS).await?;
        self.validator.store.create(user).await?;
        tracing::debug!(user = user.id, "created user");
        Ok(())
    }

    /// Validate and persist changes to an existing user. An empty
    /// `password` keeps the stored hash; an empty `remember` keeps the
    /// stored session digest.
    pub async fn update(&self, user: &mut User) -> Result<(), Error> {
        self.validator.run(user, UPDATE_STEPS).await?;
        self.validator.store.update(user).await?;
        tracing::debug!(user = user.id, "updated user");
        Ok(())
    }

    pub async fn by_id(&self, id: i64) -> Result<User, Error> {
        if id <= 0 {
            return Err(Error::InvalidId);
        }
        Ok(self.validator.store.by_id(id).await?)
    }

    /// Look up a user by email. The address is normalized first, so any
    /// casing or stray whitespace from a form resolves to the same account.
    pub async fn by_email(&self, email: &str) -> Result<User, Error> {
        let mut user = User {
            email: email.to_string(),
            ..Default::default()
        };
        self.validator.run(&mut user, &[EmailNormalize]).await?;
        Ok(self.validator.store.by_email(&user.email).await?)
    }

    /// Resolve a session token to its user. Malformed, undersized, and
    /// unmatched tokens all report [`Error::NotFound`], so callers cannot
    /// tell whether a presented token was garbage or merely unknown.
    pub async fn by_remember(&self, token: &str) -> Result<User, Error> {
        let mut user = User {
            remember: token.to_string(),
            ..Default::default()
        };
        match self.validator.run(&mut user, BY_REMEMBER_STEPS).await {
            Ok(()) => {}
            Err(Error::TokenDecode(_)) | Err(Error::RememberTooShort) => {
                return Err(Error::NotFound)
            }
            Err(err) => return Err(err),
        }
        Ok(self
            .validator
            .store
            .by_remember_hash(&user.remember_hash)
            .await?)
    }

    /// Check a password against the account registered under `email`.
    ///
    /// Unknown emails and wrong passwords produce the identical
    /// [`Error::InvalidCredentials`]; only genuine storage or hashing
    /// failures keep their own kinds.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, Error> {
        let user = match self.by_email(email).await {
            Ok(user) => user,
            Err(Error::NotFound) => {
                tracing::debug!("authentication failed: unknown email");
                return Err(Error::InvalidCredentials);
            }
            Err(err) => return Err(err),
        };

        match auth::verify_password(password, &self.validator.pepper, &user.password_hash) {
            Ok(true) => Ok(user),
            Ok(false) => {
                tracing::debug!(user = user.id, "authentication failed: password mismatch");
                Err(Error::InvalidCredentials)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::B64;
    use base64::Engine as _;
    use store::MemoryStore;

    const PEPPER: &str = "test-pepper";
    const HMAC_KEY: &str = "test-hmac-key";

    fn service() -> UserService<MemoryStore> {
        UserService::new(MemoryStore::new(), PEPPER, HMAC_KEY)
    }

    fn candidate(name: &str, email: &str, password: &str) -> User {
        User {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_hashes_credentials_and_clears_plaintext() {
        let us = service();
        let mut user = candidate("Ada", "ada@example.com", "longenough1");
        us.create(&mut user).await.unwrap();

        assert!(user.id > 0);
        assert!(user.password.is_empty());
        assert!(user.remember.is_empty());
        assert!(!user.password_hash.is_empty());
        assert!(!user.remember_hash.is_empty());
        assert!(auth::verify_password("longenough1", PEPPER, &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_create_requires_a_password() {
        let us = service();
        let mut user = candidate("Ada", "ada@example.com", "");
        let err = us.create(&mut user).await.unwrap_err();
        assert!(matches!(err, Error::PasswordRequired));
    }

    #[tokio::test]
    async fn test_create_rejects_short_passwords_without_persisting() {
        let us = service();
        let mut user = candidate("Ada", "ada@example.com", "short");
        let err = us.create(&mut user).await.unwrap_err();

        assert!(matches!(err, Error::PasswordTooShort));
        let err = us.by_email("ada@example.com").await.unwrap_err();
        assert!(matches!(err, Error::NotFound));
    }

    #[tokio::test]
    async fn test_create_normalizes_the_email() {
        let us = service();
        let mut user = candidate("Ada", " ADA@Example.com ", "longenough1");
        us.create(&mut user).await.unwrap();

        assert_eq!(user.email, "ada@example.com");
        // Normalization is idempotent: any spelling of the address resolves
        // to the same stored record.
        let found = us.by_email("  ada@EXAMPLE.com").await.unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_email_formats() {
        let us = service();
        let mut user = candidate("Ada", "not-an-email", "longenough1");
        let err = us.create(&mut user).await.unwrap_err();
        assert!(matches!(err, Error::EmailInvalid));
    }

    #[tokio::test]
    async fn test_create_requires_an_email() {
        let us = service();
        let mut user = candidate("Ada", "   ", "longenough1");
        let err = us.create(&mut user).await.unwrap_err();
        assert!(matches!(err, Error::EmailRequired));
    }

    #[tokio::test]
    async fn test_create_requires_a_name() {
        let us = service();
        let mut user = candidate("", "ada@example.com", "longenough1");
        let err = us.create(&mut user).await.unwrap_err();
        assert!(matches!(err, Error::NameRequired));
    }

    #[tokio::test]
    async fn test_emails_that_normalize_alike_collide() {
        let us = service();
        let mut ada = candidate("Ada", "ada@example.com", "longenough1");
        us.create(&mut ada).await.unwrap();

        let mut imposter = candidate("Grace", " ADA@EXAMPLE.com", "different1");
        let err = us.create(&mut imposter).await.unwrap_err();
        assert!(matches!(err, Error::EmailTaken));
    }

    #[tokio::test]
    async fn test_update_keeps_own_email_available() {
        let us = service();
        let mut user = candidate("Ada", "ada@example.com", "longenough1");
        us.create(&mut user).await.unwrap();

        user.name = "Ada Lovelace".to_string();
        us.update(&mut user).await.unwrap();

        let found = us.by_email("ada@example.com").await.unwrap();
        assert_eq!(found.name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_update_without_password_preserves_the_hash() {
        let us = service();
        let mut user = candidate("Ada", "ada@example.com", "longenough1");
        us.create(&mut user).await.unwrap();
        let original_hash = user.password_hash.clone();

        user.name = "Ada L.".to_string();
        us.update(&mut user).await.unwrap();

        assert_eq!(user.password_hash, original_hash);
        us.authenticate("ada@example.com", "longenough1")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_with_password_rehashes() {
        let us = service();
        let mut user = candidate("Ada", "ada@example.com", "longenough1");
        us.create(&mut user).await.unwrap();

        user.password = "evenlonger2".to_string();
        us.update(&mut user).await.unwrap();

        assert!(user.password.is_empty());
        us.authenticate("ada@example.com", "evenlonger2")
            .await
            .unwrap();
        let err = us
            .authenticate("ada@example.com", "longenough1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_create_with_supplied_token_resolves_sessions() {
        let us = service();
        let token = token::remember_token().unwrap();

        let mut user = candidate("Ada", "ada@example.com", "longenough1");
        user.remember = token.clone();
        us.create(&mut user).await.unwrap();

        assert!(user.remember.is_empty());
        let found = us.by_remember(&token).await.unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn test_create_rejects_undersized_supplied_tokens() {
        let us = service();
        let mut user = candidate("Ada", "ada@example.com", "longenough1");
        user.remember = B64.encode([7u8; 16]);
        let err = us.create(&mut user).await.unwrap_err();
        assert!(matches!(err, Error::RememberTooShort));
    }

    #[tokio::test]
    async fn test_session_lookup_failures_are_uniform() {
        let us = service();
        let mut user = candidate("Ada", "ada@example.com", "longenough1");
        us.create(&mut user).await.unwrap();

        // Garbage, undersized, and unknown-but-well-formed tokens are
        // indistinguishable to the caller.
        let garbage = us.by_remember("!!! not base64 !!!").await.unwrap_err();
        let undersized = us.by_remember(&B64.encode([7u8; 8])).await.unwrap_err();
        let unknown = us
            .by_remember(&token::remember_token().unwrap())
            .await
            .unwrap_err();

        assert!(matches!(garbage, Error::NotFound));
        assert!(matches!(undersized, Error::NotFound));
        assert!(matches!(unknown, Error::NotFound));
    }

    #[tokio::test]
    async fn test_authenticate_end_to_end() {
        let us = service();
        let mut user = candidate("Ada", "ADA@Example.com ", "longenough1");
        us.create(&mut user).await.unwrap();

        let found = us.by_email("ada@example.com").await.unwrap();
        assert_eq!(found.id, user.id);

        let authed = us
            .authenticate("ada@example.com", "longenough1")
            .await
            .unwrap();
        assert_eq!(authed.id, user.id);

        let wrong_password = us
            .authenticate("ada@example.com", "wrong")
            .await
            .unwrap_err();
        let unknown_email = us
            .authenticate("nobody@example.com", "longenough1")
            .await
            .unwrap_err();

        // Both failures are the same kind, so callers cannot probe for
        // registered addresses.
        assert!(matches!(wrong_password, Error::InvalidCredentials));
        assert!(matches!(unknown_email, Error::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_by_id_rejects_nonpositive_ids() {
        let us = service();
        let err = us.by_id(0).await.unwrap_err();
        assert!(matches!(err, Error::InvalidId));
    }
}
