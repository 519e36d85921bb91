use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Message {
    pub id: Uuid,
    pub session_id: Uuid,
    /// "user" or "assistant".
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

pub struct MessageService {
    pool: PgPool,
}

impl MessageService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn append(
        &self,
        session_id: Uuid,
        role: &str,
        content: &str,
    ) -> Result<Message, sqlx::Error> {
        let rec = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (id, session_id, role, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, session_id, role, content, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(session_id)
        .bind(role)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(rec)
    }

    pub async fn list(&self, session_id: Uuid) -> Result<Vec<Message>, sqlx::Error> {
        let recs = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, session_id, role, content, created_at
            FROM messages WHERE session_id = $1 ORDER BY created_at
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(recs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::account_service::AccountService;
    use crate::db::session_service::SessionService;

    async fn setup_session(pool: &PgPool) -> Uuid {
        let email = format!("msg-{}@example.com", &Uuid::new_v4().to_string()[..8]);
        let account = AccountService::new(pool.clone())
            .create_account(&email, "pw")
            .await
            .unwrap();
        SessionService::new(pool.clone())
            .create(account.id, "chat")
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    #[ignore = "requires a local PostgreSQL (see db::test_pool)"]
    async fn test_append_and_list_in_order() {
        let pool = super::super::test_pool().await;
        let session_id = setup_session(&pool).await;
        let svc = MessageService::new(pool);

        svc.append(session_id, "user", "make a button").await.unwrap();
        svc.append(session_id, "assistant", "```luau\n...\n```")
            .await
            .unwrap();

        let messages = svc.list(session_id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[1].role, "assistant");
    }
}
