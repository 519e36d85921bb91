use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    /// The session's single current unit; replaced whenever a chat turn
    /// extracts a new one.
    pub current_unit_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct SessionService {
    pool: PgPool,
}

impl SessionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, account_id: Uuid, name: &str) -> Result<Session, sqlx::Error> {
        let rec = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (id, account_id, name)
            VALUES ($1, $2, $3)
            RETURNING id, account_id, name, current_unit_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(account_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(rec)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Session>, sqlx::Error> {
        let rec = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, account_id, name, current_unit_id, created_at, updated_at
            FROM sessions WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rec)
    }

    pub async fn list_for_account(&self, account_id: Uuid) -> Result<Vec<Session>, sqlx::Error> {
        let recs = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, account_id, name, current_unit_id, created_at, updated_at
            FROM sessions WHERE account_id = $1 ORDER BY updated_at DESC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(recs)
    }

    pub async fn rename(&self, id: Uuid, name: &str) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE sessions SET name = $1, updated_at = NOW() WHERE id = $2")
                .bind(name)
                .bind(id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Point the session at its new current unit.
    pub async fn set_current_unit(
        &self,
        id: Uuid,
        unit_id: Option<Uuid>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET current_unit_id = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(unit_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deleting a session cascades to its messages and units.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
