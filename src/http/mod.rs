//! HTTP API for driving rehearsals from a rendering layer
//!
//! This module provides a REST API over `RehearsalRunner`:
//! - POST /rehearsals - Create a rehearsal (Setup)
//! - GET /rehearsals/:id - Current snapshot
//! - POST /rehearsals/:id/{start,pause,resume,finish,reset} - Transitions
//! - DELETE /rehearsals/:id - Discard a rehearsal
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{CreateRehearsalRequest, ErrorResponse, RehearsalResponse};
pub use routes::create_router;
pub use state::AppState;
