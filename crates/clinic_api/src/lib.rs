//! HTTP surface for the clinic booking backend.
//!
//! # Responsibility
//! - Expose practitioners, the slot catalog, and bookings as JSON resources.
//! - Gate every resource route behind one bearer-token middleware stage.
//! - Wrap every response in the `{statusCode, message, result, time}` envelope.
//!
//! # Invariants
//! - Storage work runs on the blocking pool through [`store::Store`].
//! - Handlers never touch SQLite directly; they go through core services.

pub mod config;
mod endpoints;
pub mod envelope;
pub mod error;
pub mod gate;
mod middleware;
pub mod router;
pub mod server;
pub mod state;
pub mod store;

pub use config::ApiConfig;
pub use envelope::ApiResponse;
pub use error::ApiError;
pub use gate::{AuthError, Claims, GateError, Hs256Gate, IdentityGate, Role};
pub use router::build_router;
pub use server::{serve, ServerError};
pub use state::AppState;
pub use store::{Store, StoreError};
