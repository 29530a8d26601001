use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use super::model::Contact;

/// Storage seam for contacts. `list` is newest first by `created_at`; equal
/// timestamps come back most recently inserted first.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn list(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Contact>>;
    async fn count(&self) -> anyhow::Result<i64>;
    async fn insert(&self, contact: Contact) -> anyhow::Result<Contact>;
    /// Returns `false` when no contact had this id.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgContactStore {
    db: PgPool,
}

impl PgContactStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        Ok(Self { db })
    }

    pub fn from_pool(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn list(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Contact>> {
        let rows = sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, name, phone, email, created_at, updated_at
            FROM contacts
            ORDER BY created_at DESC, seq DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .context("select contacts")?;
        Ok(rows)
    }

    async fn count(&self) -> anyhow::Result<i64> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM contacts")
            .fetch_one(&self.db)
            .await
            .context("count contacts")?;
        Ok(total)
    }

    async fn insert(&self, contact: Contact) -> anyhow::Result<Contact> {
        let stored = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (id, name, phone, email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, phone, email, created_at, updated_at
            "#,
        )
        .bind(contact.id)
        .bind(&contact.name)
        .bind(&contact.phone)
        .bind(&contact.email)
        .bind(contact.created_at)
        .bind(contact.updated_at)
        .fetch_one(&self.db)
        .await
        .context("insert contact")?;
        Ok(stored)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete contact")?;
        Ok(result.rows_affected() > 0)
    }
}
