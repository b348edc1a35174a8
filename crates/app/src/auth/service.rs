//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;

use crate::{
    auth::{
        data::NewApiToken,
        errors::AuthServiceError,
        records::{ActorUuid, ApiTokenUuid, AuthSession, IssuedApiToken},
        repository::PgAuthRepository,
        token::{generate_api_token, hash_api_token},
    },
    domain::orgs::records::OrgUuid,
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

    /// Issue a new API token scoped to the given organization and actor.
    ///
    /// The raw token is returned exactly once; only its hash is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insertion fails.
    pub async fn issue_api_token(
        &self,
        org: OrgUuid,
        actor: ActorUuid,
        name: String,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token = generate_api_token();

        let record = self
            .repository
            .create_api_token(NewApiToken {
                uuid: ApiTokenUuid::new(),
                org,
                actor,
                name,
                token_hash: hash_api_token(&token),
            })
            .await?;

        Ok(IssuedApiToken { token, record })
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<AuthSession, AuthServiceError> {
        let token = self
            .repository
            .find_api_token_by_hash(&hash_api_token(bearer_token))
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        Ok(AuthSession {
            org: token.org,
            actor: token.actor,
        })
    }
}

#[automock]
#[async_trait]
/// Bearer token resolution for the caller layer.
pub trait AuthService: Send + Sync {
    /// Resolve a raw bearer token to the organization and actor it acts as.
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<AuthSession, AuthServiceError>;
}
