use axum::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: OffsetDateTime,
    pub last_login: Option<OffsetDateTime>,
}

/// Source of truth for "does this email identify an account". Lookups
/// never mutate; `touch_last_login` is the one named write besides
/// `create`, so the login flow controls its own transaction boundary.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new user with `created_at = last_login = now`.
    /// A uniqueness conflict on the email surfaces as `DuplicateEmail`.
    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        now: OffsetDateTime,
    ) -> Result<User, ApiError>;

    /// Exact, case-sensitive match on the stored email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;

    /// Idempotent for a repeated timestamp.
    async fn touch_last_login(&self, user_id: Uuid, at: OffsetDateTime) -> Result<(), ApiError>;
}

pub struct PgCredentialStore {
    db: PgPool,
}

impl PgCredentialStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn map_insert_err(e: sqlx::Error) -> ApiError {
    // Concurrent registrations race on the unique index; the loser sees
    // the constraint violation, not a generic storage fault.
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            ApiError::DuplicateEmail
        }
        _ => ApiError::Storage(e),
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        now: OffsetDateTime,
    ) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, created_at, last_login)
            VALUES ($1, $2, $3, $3)
            RETURNING id, email, password_hash, created_at, last_login
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .fetch_one(&self.db)
        .await
        .map_err(map_insert_err)?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at, last_login
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at, last_login
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn touch_last_login(&self, user_id: Uuid, at: OffsetDateTime) -> Result<(), ApiError> {
        sqlx::query(r#"UPDATE users SET last_login = $2 WHERE id = $1"#)
            .bind(user_id)
            .bind(at)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// In-memory credential store used by `AppState::fake`.
#[derive(Default)]
pub struct MemoryCredentialStore {
    users: std::sync::Mutex<Vec<User>>,
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        now: OffsetDateTime,
    ) -> Result<User, ApiError> {
        let mut users = self.users.lock().expect("user store lock poisoned");
        if users.iter().any(|u| u.email == email) {
            return Err(ApiError::DuplicateEmail);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            last_login: Some(now),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let users = self.users.lock().expect("user store lock poisoned");
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let users = self.users.lock().expect("user store lock poisoned");
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn touch_last_login(&self, user_id: Uuid, at: OffsetDateTime) -> Result<(), ApiError> {
        let mut users = self.users.lock().expect("user store lock poisoned");
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.last_login = Some(at);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    #[tokio::test]
    async fn create_is_unique_per_email() {
        let store = MemoryCredentialStore::default();
        let first = store.create("a@x.com", "hash1", now()).await.expect("first insert");
        let err = store.create("a@x.com", "hash2", now()).await.unwrap_err();
        assert!(matches!(err, ApiError::DuplicateEmail));

        // First record is untouched by the failed attempt.
        let found = store
            .find_by_email("a@x.com")
            .await
            .expect("lookup")
            .expect("user exists");
        assert_eq!(found.id, first.id);
        assert_eq!(found.password_hash, "hash1");
    }

    #[tokio::test]
    async fn email_lookup_is_case_sensitive() {
        let store = MemoryCredentialStore::default();
        store.create("A@x.com", "hash", now()).await.expect("insert");
        assert!(store.find_by_email("a@x.com").await.expect("lookup").is_none());
        assert!(store.find_by_email("A@x.com").await.expect("lookup").is_some());
    }

    #[tokio::test]
    async fn concurrent_registrations_leave_one_winner() {
        let store = std::sync::Arc::new(MemoryCredentialStore::default());
        let (a, b) = tokio::join!(
            store.create("race@x.com", "hash-a", now()),
            store.create("race@x.com", "hash-b", now()),
        );
        let ok = [a.is_ok(), b.is_ok()].iter().filter(|v| **v).count();
        assert_eq!(ok, 1);
        for res in [a, b] {
            if let Err(e) = res {
                assert!(matches!(e, ApiError::DuplicateEmail));
            }
        }
    }

    #[tokio::test]
    async fn touch_last_login_is_idempotent() {
        let store = MemoryCredentialStore::default();
        let user = store.create("a@x.com", "hash", now()).await.expect("insert");
        let at = now();
        store.touch_last_login(user.id, at).await.expect("first touch");
        store.touch_last_login(user.id, at).await.expect("second touch");
        let found = store
            .find_by_id(user.id)
            .await
            .expect("lookup")
            .expect("user exists");
        assert_eq!(found.last_login, Some(at));
    }
}
