//! PostgreSQL Identity Store

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::identity::Identity;
use crate::domain::repository::IdentityStore;
use crate::domain::value_object::{
    email::Email, identity_id::IdentityId, magic_token::MagicToken,
    provisioning_source::ProvisioningSource,
};
use crate::error::{AuthError, AuthResult};

const IDENTITY_COLUMNS: &str = r#"
    identity_id,
    email,
    first_name,
    last_name,
    tier,
    active_token,
    token_expires_at,
    has_access,
    is_active,
    provisioning_source,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed identity store
///
/// One instance targets exactly one environment's database; the pool it is
/// constructed with decides which (see the api binary's env wiring).
#[derive(Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl IdentityStore for PgIdentityStore {
    async fn create(&self, identity: &Identity) -> AuthResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO identities (
                identity_id,
                email,
                first_name,
                last_name,
                tier,
                active_token,
                token_expires_at,
                has_access,
                is_active,
                provisioning_source,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(identity.identity_id.as_uuid())
        .bind(identity.email.as_str())
        .bind(identity.first_name.as_deref())
        .bind(identity.last_name.as_deref())
        .bind(identity.tier.as_deref())
        .bind(identity.active_token.as_deref())
        .bind(identity.token_expires_at)
        .bind(identity.has_access)
        .bind(identity.is_active)
        .bind(identity.provisioning_source.id())
        .bind(identity.created_at)
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AuthError::EmailTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_identity()).transpose()
    }

    async fn find_by_id(&self, identity_id: &IdentityId) -> AuthResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities WHERE identity_id = $1"
        ))
        .bind(identity_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_identity()).transpose()
    }

    async fn find_by_token(&self, token: &MagicToken) -> AuthResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities WHERE active_token = $1"
        ))
        .bind(token.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_identity()).transpose()
    }

    async fn update_profile(&self, identity: &Identity) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE identities SET
                first_name = $2,
                last_name = $3,
                tier = $4,
                has_access = $5,
                is_active = $6,
                updated_at = $7
            WHERE identity_id = $1
            "#,
        )
        .bind(identity.identity_id.as_uuid())
        .bind(identity.first_name.as_deref())
        .bind(identity.last_name.as_deref())
        .bind(identity.tier.as_deref())
        .bind(identity.has_access)
        .bind(identity.is_active)
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn store_token(
        &self,
        identity_id: &IdentityId,
        token: &MagicToken,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE identities SET
                active_token = $2,
                token_expires_at = $3,
                updated_at = $4
            WHERE identity_id = $1
            "#,
        )
        .bind(identity_id.as_uuid())
        .bind(token.as_str())
        .bind(expires_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(AuthError::IdentityNotFound);
        }

        Ok(())
    }

    async fn claim_token(
        &self,
        token: &MagicToken,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<Identity>> {
        // Single conditional update, not read-then-write: under concurrent
        // redemptions at most one request sees a row here.
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            r#"
            UPDATE identities SET
                active_token = NULL,
                token_expires_at = NULL,
                updated_at = $2
            WHERE active_token = $1
              AND token_expires_at > $2
              AND has_access
              AND is_active
            RETURNING {IDENTITY_COLUMNS}
            "#
        ))
        .bind(token.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_identity()).transpose()
    }
}

// ============================================================================
// Row mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct IdentityRow {
    identity_id: Uuid,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    tier: Option<String>,
    active_token: Option<String>,
    token_expires_at: Option<DateTime<Utc>>,
    has_access: bool,
    is_active: bool,
    provisioning_source: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl IdentityRow {
    fn into_identity(self) -> AuthResult<Identity> {
        let provisioning_source = ProvisioningSource::from_id(self.provisioning_source)
            .ok_or_else(|| {
                AuthError::Internal(format!(
                    "Unknown provisioning source: {}",
                    self.provisioning_source
                ))
            })?;

        Ok(Identity {
            identity_id: IdentityId::from_uuid(self.identity_id),
            email: Email::from_db(self.email),
            first_name: self.first_name,
            last_name: self.last_name,
            tier: self.tier,
            active_token: self.active_token,
            token_expires_at: self.token_expires_at,
            has_access: self.has_access,
            is_active: self.is_active,
            provisioning_source,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
