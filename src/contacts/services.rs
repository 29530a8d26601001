use time::OffsetDateTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{
    dto::{ContactPage, CreateContactRequest, ListQuery, DEFAULT_LIMIT, DEFAULT_PAGE},
    model::{Contact, NewContact},
    repo::ContactStore,
};
use crate::{error::ApiError, validation::validate_contact};

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn from_query(q: &ListQuery) -> Result<Self, ApiError> {
        let page = parse_positive("page", q.page.as_deref(), DEFAULT_PAGE)?;
        let limit = parse_positive("limit", q.limit.as_deref(), DEFAULT_LIMIT)?;
        let req = Self { page, limit };
        req.offset()?;
        Ok(req)
    }

    pub fn offset(&self) -> Result<i64, ApiError> {
        (self.page - 1)
            .checked_mul(self.limit)
            .ok_or_else(|| ApiError::Validation("page is out of range".into()))
    }
}

fn parse_positive(name: &str, raw: Option<&str>, default: i64) -> Result<i64, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(default);
    };
    match raw.parse::<i64>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(ApiError::Validation(format!(
            "{name} must be a positive integer"
        ))),
    }
}

/// `ceil(total / limit)`; zero contacts means zero pages.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 {
        0
    } else {
        (total - 1) / limit + 1
    }
}

pub async fn list_contacts(
    store: &dyn ContactStore,
    req: PageRequest,
) -> Result<ContactPage, ApiError> {
    let offset = req.offset()?;
    let contacts = store
        .list(req.limit, offset)
        .await
        .map_err(ApiError::storage("GET contacts"))?;
    // separate read; may disagree with the page above under concurrent writes
    let total = store
        .count()
        .await
        .map_err(ApiError::storage("GET contacts"))?;

    debug!(page = req.page, limit = req.limit, total, "listed contacts");
    Ok(ContactPage {
        contacts,
        total_pages: total_pages(total, req.limit),
        current_page: req.page,
    })
}

/// Trims and checks the create payload. With `strict` the phone/email
/// format rules apply as well.
pub fn validate_new_contact(
    body: CreateContactRequest,
    strict: bool,
) -> Result<NewContact, ApiError> {
    let trimmed = |v: Option<String>| v.map(|s| s.trim().to_string()).unwrap_or_default();
    let new = NewContact {
        name: trimmed(body.name),
        phone: trimmed(body.phone),
        email: trimmed(body.email),
    };

    if new.name.is_empty() || new.phone.is_empty() || new.email.is_empty() {
        return Err(ApiError::Validation(
            "Name, phone and email all fields are required".into(),
        ));
    }

    if strict {
        let errors = validate_contact(&new.name, &new.phone, &new.email);
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors.summary()));
        }
    }

    Ok(new)
}

pub async fn create_contact(
    store: &dyn ContactStore,
    body: CreateContactRequest,
    strict: bool,
) -> Result<Contact, ApiError> {
    let new = validate_new_contact(body, strict).inspect_err(|e| {
        warn!(error = %e, "rejected contact");
    })?;

    let contact = Contact::create(new, OffsetDateTime::now_utc());
    let stored = store
        .insert(contact)
        .await
        .map_err(ApiError::storage("ADD contact"))?;

    info!(contact_id = %stored.id, "contact created");
    Ok(stored)
}

pub async fn delete_contact(store: &dyn ContactStore, raw_id: &str) -> Result<(), ApiError> {
    let id = Uuid::parse_str(raw_id)
        .map_err(|e| anyhow::anyhow!(e).context(format!("malformed contact id {raw_id:?}")))
        .map_err(ApiError::storage("DELETE contact"))?;

    let found = store
        .delete(id)
        .await
        .map_err(ApiError::storage("DELETE contact"))?;
    if !found {
        warn!(contact_id = %id, "delete target missing");
        return Err(ApiError::NotFound("Contact not found"));
    }

    info!(contact_id = %id, "contact deleted");
    Ok(())
}
