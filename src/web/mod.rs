//! Web interface for Docket.
//!
//! The `server` module owns the axum router and handlers; `render` builds
//! the page view model that every response carries. The page itself is a
//! single embedded HTML file that replaces its whole view with each
//! server response.

pub mod render;
pub mod server;

pub use render::{TaskPage, TaskStats};
pub use server::{AppState, router, start_server};
