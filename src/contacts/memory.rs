use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{model::Contact, repo::ContactStore};

/// Process-local store, kept in insertion order.
#[derive(Default)]
pub struct MemoryContactStore {
    rows: RwLock<Vec<Contact>>,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn list(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Contact>> {
        let rows = self.rows.read().await;
        // newest insert first, then a stable sort keeps that order among equal timestamps
        let mut sorted: Vec<&Contact> = rows.iter().rev().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let offset = usize::try_from(offset)?;
        let limit = usize::try_from(limit)?;
        Ok(sorted
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self) -> anyhow::Result<i64> {
        Ok(i64::try_from(self.rows.read().await.len())?)
    }

    async fn insert(&self, contact: Contact) -> anyhow::Result<Contact> {
        let mut rows = self.rows.write().await;
        anyhow::ensure!(
            rows.iter().all(|c| c.id != contact.id),
            "duplicate contact id {}",
            contact.id
        );
        rows.push(contact.clone());
        Ok(contact)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|c| c.id != id);
        Ok(rows.len() != before)
    }
}
