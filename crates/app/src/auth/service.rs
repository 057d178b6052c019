//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;

use crate::auth::{
    errors::AuthServiceError,
    models::{IssuedUser, NewUser, UserUuid},
    repository::PgAuthRepository,
    token::{generate_token, hash_token},
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Create a user and issue their bearer token. The raw token is
    /// returned exactly once; only its digest is stored.
    ///
    /// # Errors
    ///
    /// Returns an error when the email is taken or insertion fails.
    pub async fn create_user(&self, email: String) -> Result<IssuedUser, AuthServiceError> {
        let token = generate_token();

        let user = self
            .repository
            .create_user(&NewUser {
                uuid: UserUuid::now_v7(),
                email,
                token_hash: hash_token(&token),
            })
            .await?;

        Ok(IssuedUser { user, token })
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, token: &str) -> Result<UserUuid, AuthServiceError> {
        self.repository
            .find_user_by_token_hash(&hash_token(token))
            .await?
            .ok_or(AuthServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the user it was issued to.
    async fn authenticate_bearer(&self, token: &str) -> Result<UserUuid, AuthServiceError>;
}
