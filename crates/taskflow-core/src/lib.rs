pub mod clients;
pub mod config;
pub mod error;
pub mod forms;
pub mod gateway;
pub mod session;
pub mod store;
pub mod types;

pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use gateway::ApiClient;
pub use session::{Session, SessionManager, SessionState, SharedSession};
pub use store::{FileSessionStore, SessionStore};
