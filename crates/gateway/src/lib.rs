pub mod api;
pub mod auth;
pub mod middleware;
pub mod ports;
pub mod router;
pub mod state;

pub use auth::Aaa;
pub use router::build_router;
pub use state::AppState;
