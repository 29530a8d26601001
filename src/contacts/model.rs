use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// A stored contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Validated, trimmed input for a new contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl Contact {
    /// Assigns a fresh id and identical created/updated timestamps.
    pub fn create(new: NewContact, now: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            phone: new.phone,
            email: new.email,
            created_at: now,
            updated_at: now,
        }
    }
}
