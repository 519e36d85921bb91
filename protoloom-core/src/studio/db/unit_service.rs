use crate::extract::ExtractedUnit;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A generated unit as persisted. `source_text` is never empty: units are
/// only created from successful extractions. Hand-edits patch the text
/// fields in place; id and created_at never change. Units are removed
/// only by their session's cascade.
#[derive(Debug, Clone, FromRow)]
pub struct Unit {
    pub id: Uuid,
    pub session_id: Uuid,
    pub name: String,
    pub source_text: String,
    pub style_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct UnitService {
    pool: PgPool,
}

impl UnitService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        session_id: Uuid,
        extracted: &ExtractedUnit,
    ) -> Result<Unit, sqlx::Error> {
        let rec = sqlx::query_as::<_, Unit>(
            r#"
            INSERT INTO units (id, session_id, name, source_text, style_text)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, session_id, name, source_text, style_text, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(session_id)
        .bind(&extracted.name)
        .bind(&extracted.source_text)
        .bind(&extracted.style_text)
        .fetch_one(&self.pool)
        .await?;

        Ok(rec)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Unit>, sqlx::Error> {
        let rec = sqlx::query_as::<_, Unit>(
            r#"
            SELECT id, session_id, name, source_text, style_text, created_at, updated_at
            FROM units WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rec)
    }

    /// Patch source and/or style text in place (code-view hand edits).
    pub async fn update_texts(
        &self,
        id: Uuid,
        source_text: Option<&str>,
        style_text: Option<&str>,
    ) -> Result<Option<Unit>, sqlx::Error> {
        let rec = sqlx::query_as::<_, Unit>(
            r#"
            UPDATE units
            SET source_text = COALESCE($1, source_text),
                style_text = COALESCE($2, style_text),
                updated_at = NOW()
            WHERE id = $3
            RETURNING id, session_id, name, source_text, style_text, created_at, updated_at
            "#,
        )
        .bind(source_text)
        .bind(style_text)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::account_service::AccountService;
    use crate::db::session_service::SessionService;

    fn extracted() -> ExtractedUnit {
        ExtractedUnit {
            name: "GeneratedComponent".to_string(),
            source_text: "function GeneratedComponent() return h(\"div\", {}, {}) end"
                .to_string(),
            style_text: String::new(),
        }
    }

    async fn setup_session(pool: &PgPool) -> (Uuid, SessionService) {
        let email = format!("unit-{}@example.com", &Uuid::new_v4().to_string()[..8]);
        let account = AccountService::new(pool.clone())
            .create_account(&email, "pw")
            .await
            .unwrap();
        let sessions = SessionService::new(pool.clone());
        let session = sessions.create(account.id, "units").await.unwrap();
        (session.id, sessions)
    }

    #[tokio::test]
    #[ignore = "requires a local PostgreSQL (see db::test_pool)"]
    async fn test_create_and_set_current() {
        let pool = super::super::test_pool().await;
        let (session_id, sessions) = setup_session(&pool).await;
        let svc = UnitService::new(pool);

        let unit = svc.create(session_id, &extracted()).await.unwrap();
        assert!(!unit.source_text.is_empty());

        assert!(sessions
            .set_current_unit(session_id, Some(unit.id))
            .await
            .unwrap());
        let session = sessions.get(session_id).await.unwrap().unwrap();
        assert_eq!(session.current_unit_id, Some(unit.id));
    }

    #[tokio::test]
    #[ignore = "requires a local PostgreSQL (see db::test_pool)"]
    async fn test_update_texts_keeps_id_and_created_at() {
        let pool = super::super::test_pool().await;
        let (session_id, _) = setup_session(&pool).await;
        let svc = UnitService::new(pool);

        let unit = svc.create(session_id, &extracted()).await.unwrap();
        let patched = svc
            .update_texts(unit.id, None, Some(".btn { color: red; }"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(patched.id, unit.id);
        assert_eq!(patched.created_at, unit.created_at);
        assert_eq!(patched.source_text, unit.source_text);
        assert_eq!(patched.style_text, ".btn { color: red; }");
    }

    #[tokio::test]
    #[ignore = "requires a local PostgreSQL (see db::test_pool)"]
    async fn test_session_delete_cascades_to_units() {
        let pool = super::super::test_pool().await;
        let (session_id, sessions) = setup_session(&pool).await;
        let svc = UnitService::new(pool);

        let unit = svc.create(session_id, &extracted()).await.unwrap();
        sessions.delete(session_id).await.unwrap();

        assert!(svc.get(unit.id).await.unwrap().is_none());
    }
}
