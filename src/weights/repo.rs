use axum::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

/// One immutable weight/satisfaction observation. Never updated or
/// deleted once written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeightEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub weight: i32,
    pub satisfaction: i32,
    pub created_at: OffsetDateTime,
}

/// Append-only store of entries. Trusts the `user_id` it is given; the
/// caller resolves the session first.
#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn append(
        &self,
        user_id: Uuid,
        weight: i32,
        satisfaction: i32,
        now: OffsetDateTime,
    ) -> Result<WeightEntry, ApiError>;

    /// All entries for the user, newest first. Timestamp ties keep a
    /// deterministic order so pagination and display never flicker.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<WeightEntry>, ApiError>;
}

pub struct PgEntryStore {
    db: PgPool,
}

impl PgEntryStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntryStore for PgEntryStore {
    async fn append(
        &self,
        user_id: Uuid,
        weight: i32,
        satisfaction: i32,
        now: OffsetDateTime,
    ) -> Result<WeightEntry, ApiError> {
        let entry = sqlx::query_as::<_, WeightEntry>(
            r#"
            INSERT INTO weight_entries (user_id, weight, satisfaction, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, weight, satisfaction, created_at
            "#,
        )
        .bind(user_id)
        .bind(weight)
        .bind(satisfaction)
        .bind(now)
        .fetch_one(&self.db)
        .await?;
        Ok(entry)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<WeightEntry>, ApiError> {
        let rows = sqlx::query_as::<_, WeightEntry>(
            r#"
            SELECT id, user_id, weight, satisfaction, created_at
            FROM weight_entries
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}

/// In-memory entry store used by `AppState::fake`.
#[derive(Default)]
pub struct MemoryEntryStore {
    entries: std::sync::Mutex<Vec<WeightEntry>>,
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn append(
        &self,
        user_id: Uuid,
        weight: i32,
        satisfaction: i32,
        now: OffsetDateTime,
    ) -> Result<WeightEntry, ApiError> {
        let entry = WeightEntry {
            id: Uuid::new_v4(),
            user_id,
            weight,
            satisfaction,
            created_at: now,
        };
        self.entries
            .lock()
            .expect("entry store lock poisoned")
            .push(entry.clone());
        Ok(entry)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<WeightEntry>, ApiError> {
        let entries = self.entries.lock().expect("entry store lock poisoned");
        // Walk insertion order backwards, then a stable sort on the
        // timestamp keeps the most recent insertion first among ties.
        let mut rows: Vec<WeightEntry> = entries
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}
