pub mod auth;
pub mod error;
pub mod handlers;
pub mod repository;
pub mod router;
pub mod server;

pub use error::{ApiError, Result};
pub use handlers::AppState;
pub use repository::{FinanceRepository, JsonFileRepository};
pub use router::create_router;
pub use server::run_server;
