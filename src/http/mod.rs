//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, query → WakeAction)
//!     → relay (signal / wait)
//!     → response.rs ([1] / [] or 500)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{WakeAction, WakeParams, X_REQUEST_ID};
pub use response::WakeResponse;
pub use server::{AppState, HttpServer};
