//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID + trace layers)
//!     → path.rs (split /exists/{namespace}/{pvc}, reject malformed)
//!     → handlers.rs (invoke storage client, count, log)
//!     → JSON CheckResult / 400 / health / metrics text
//! ```

pub mod handlers;
pub mod path;
pub mod request;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
