use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

pub struct AccountService {
    pool: PgPool,
}

pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl AccountService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Account, sqlx::Error> {
        let rec = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (id, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hash_password(password))
        .fetch_one(&self.pool)
        .await?;

        Ok(rec)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, sqlx::Error> {
        let rec = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM accounts WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rec)
    }

    /// Returns the account when email and password match, else None.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Account>, sqlx::Error> {
        let account = self.find_by_email(email).await?;

        Ok(account.filter(|a| a.password_hash == hash_password(password)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_email() -> String {
        format!("user-{}@example.com", &Uuid::new_v4().to_string()[..8])
    }

    #[test]
    fn test_hash_password_deterministic() {
        let h1 = hash_password("hunter2");
        let h2 = hash_password("hunter2");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64); // 256 bits = 64 hex chars
    }

    #[test]
    fn test_hash_password_different_inputs() {
        assert_ne!(hash_password("hunter2"), hash_password("hunter3"));
    }

    #[tokio::test]
    #[ignore = "requires a local PostgreSQL (see db::test_pool)"]
    async fn test_create_and_verify_account() {
        let pool = super::super::test_pool().await;
        let svc = AccountService::new(pool);
        let email = unique_email();

        let account = svc.create_account(&email, "hunter2").await.unwrap();
        assert_eq!(account.email, email);

        let verified = svc.verify_credentials(&email, "hunter2").await.unwrap();
        assert!(verified.is_some());

        let rejected = svc.verify_credentials(&email, "wrong").await.unwrap();
        assert!(rejected.is_none());
    }

    #[tokio::test]
    #[ignore = "requires a local PostgreSQL (see db::test_pool)"]
    async fn test_duplicate_email_fails() {
        let pool = super::super::test_pool().await;
        let svc = AccountService::new(pool);
        let email = unique_email();

        svc.create_account(&email, "first").await.unwrap();
        assert!(svc.create_account(&email, "second").await.is_err());
    }

    #[tokio::test]
    #[ignore = "requires a local PostgreSQL (see db::test_pool)"]
    async fn test_verify_unknown_email() {
        let pool = super::super::test_pool().await;
        let svc = AccountService::new(pool);

        let result = svc
            .verify_credentials("nobody@example.com", "pass")
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
