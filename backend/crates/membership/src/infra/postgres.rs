//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use nid::Nanoid;
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::entity::{
    session::Session,
    user::{User, UserProjection},
};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{
    display_name::DisplayName, email::Email, public_id::PublicId, user_id::UserId,
    user_password::PasswordHash, user_role::Role,
};
use crate::error::{MembershipError, MembershipResult};

/// PostgreSQL-backed membership repository
#[derive(Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clean up expired sessions
    pub async fn cleanup_expired(&self) -> MembershipResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }
}

/// Map a unique-constraint violation on insert to `DuplicateUser`
///
/// The email unique index is the source of truth for uniqueness; the
/// application-level existence check is only a fast path.
fn map_unique_violation(err: sqlx::Error) -> MembershipError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return MembershipError::DuplicateUser;
        }
    }
    MembershipError::Database(err)
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgMembershipRepository {
    async fn create(&self, user: &User) -> MembershipResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                public_id,
                name,
                email,
                password_hash,
                role,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.public_id.as_str())
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.role.id())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> MembershipResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                public_id,
                name,
                email,
                password_hash,
                role,
                created_at,
                updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_public_id(&self, public_id: &PublicId) -> MembershipResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                user_id,
                public_id,
                name,
                email,
                password_hash,
                role,
                created_at,
                updated_at
            FROM users
            WHERE public_id = $1
            "#,
        )
        .bind(public_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn exists_by_email(&self, email: &str) -> MembershipResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn update_role(&self, user_id: &UserId, role: Role) -> MembershipResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                role = $2,
                updated_at = $3
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(role.id())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_projections(&self) -> MembershipResult<Vec<UserProjection>> {
        // Password hash deliberately never selected
        let rows = sqlx::query_as::<_, ProjectionRow>(
            r#"
            SELECT
                public_id,
                name,
                email,
                role
            FROM users
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.into_projection()).collect()
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgMembershipRepository {
    async fn create(&self, session: &Session) -> MembershipResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                session_id,
                user_id,
                public_id,
                name,
                email,
                role,
                expires_at_ms,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(session.session_id)
        .bind(session.user_id.as_uuid())
        .bind(session.public_id.as_str())
        .bind(&session.name)
        .bind(&session.email)
        .bind(session.role.id())
        .bind(session.expires_at_ms)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, session_id: Uuid) -> MembershipResult<Option<Session>> {
        let now_ms = Utc::now().timestamp_millis();

        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                session_id,
                user_id,
                public_id,
                name,
                email,
                role,
                expires_at_ms,
                created_at
            FROM sessions
            WHERE session_id = $1 AND expires_at_ms > $2
            "#,
        )
        .bind(session_id)
        .bind(now_ms)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_session()).transpose()
    }

    async fn delete(&self, session_id: Uuid) -> MembershipResult<()> {
        sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> MembershipResult<u64> {
        self.cleanup_expired().await
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

fn parse_public_id(raw: &str) -> MembershipResult<PublicId> {
    Nanoid::from_str(raw)
        .map(PublicId::from_nanoid)
        .map_err(|e| MembershipError::Internal(format!("Invalid public_id: {}", e)))
}

fn parse_role(id: i16) -> MembershipResult<Role> {
    Role::from_id(id).ok_or_else(|| MembershipError::Internal(format!("Invalid role id: {}", id)))
}

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    public_id: String,
    name: String,
    email: String,
    password_hash: String,
    role: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> MembershipResult<User> {
        let password_hash = PasswordHash::from_phc_string(self.password_hash)
            .map_err(|e| MembershipError::Internal(e.to_string()))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            public_id: parse_public_id(&self.public_id)?,
            name: DisplayName::from_db(self.name),
            email: Email::from_db(self.email),
            password_hash,
            role: parse_role(self.role)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProjectionRow {
    public_id: String,
    name: String,
    email: String,
    role: i16,
}

impl ProjectionRow {
    fn into_projection(self) -> MembershipResult<UserProjection> {
        Ok(UserProjection {
            public_id: parse_public_id(&self.public_id)?,
            name: self.name,
            email: self.email,
            role: parse_role(self.role)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    user_id: Uuid,
    public_id: String,
    name: String,
    email: String,
    role: i16,
    expires_at_ms: i64,
    created_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> MembershipResult<Session> {
        Ok(Session {
            session_id: self.session_id,
            user_id: UserId::from_uuid(self.user_id),
            public_id: parse_public_id(&self.public_id)?,
            name: self.name,
            email: self.email,
            role: parse_role(self.role)?,
            expires_at_ms: self.expires_at_ms,
            created_at: self.created_at,
        })
    }
}
