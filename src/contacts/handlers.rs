use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{debug, instrument};

use super::{
    dto::{ContactPage, CreateContactRequest, ListQuery},
    model::Contact,
    services::{self, PageRequest},
};
use crate::{
    error::{ApiError, MessageResponse},
    state::AppState,
};

pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .route("/contacts/:id", delete(delete_contact))
}

#[instrument(skip(state, query))]
pub async fn list_contacts(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ContactPage>, ApiError> {
    let Query(q) = query.map_err(|e| ApiError::Validation(e.body_text()))?;
    debug!(?q, "list query");
    let req = PageRequest::from_query(&q)?;
    let page = services::list_contacts(state.store.as_ref(), req).await?;
    Ok(Json(page))
}

#[instrument(skip(state, payload))]
pub async fn create_contact(
    State(state): State<AppState>,
    payload: Result<Json<CreateContactRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let contact =
        services::create_contact(state.store.as_ref(), body, state.config.strict_validation)
            .await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

#[instrument(skip(state))]
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    services::delete_contact(state.store.as_ref(), &id).await?;
    Ok(Json(MessageResponse::new("Contact Deleted")))
}
