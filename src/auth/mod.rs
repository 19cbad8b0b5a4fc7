use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use error::AuthError;
pub use memory::MemoryUserDirectory;
pub use repo::{DirectoryError, PgUserDirectory, UserDirectory};
pub use repo_types::User;
pub use services::CredentialService;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
