//! HTTP surface of the helpdesk service.
//!
//! - `GET /` serves the chat page
//! - `POST /ask` answers `{"question": ...}` with `{"answer": ...}`
//! - `GET /health` for liveness probes

pub mod routes;
pub mod server;
pub mod state;

pub use routes::create_router;
pub use server::serve;
pub use state::AppState;
