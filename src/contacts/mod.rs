pub mod dto;
pub mod handlers;
pub mod memory;
pub mod model;
pub mod repo;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use memory::MemoryContactStore;
pub use model::{Contact, NewContact};
pub use repo::{ContactStore, PgContactStore};

pub fn router() -> Router<AppState> {
    handlers::contact_routes()
}
