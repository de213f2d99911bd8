//! HTTP surface for the lottery backend.
//!
//! Routes:
//! - GET  /api/health
//! - GET  /api/events, POST /api/events
//! - GET  /api/events/:id
//! - POST /api/events/:id/apply
//! - GET  /api/events/:id/applications?name=
//! - POST /api/events/:id/lottery
//! - GET  /api/events/:id/results

pub mod events;
pub mod health;
pub mod routes;

pub use health::health_check;
pub use routes::build_router;
