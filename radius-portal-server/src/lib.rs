//! HTTP login endpoint for a captive portal that authenticates users against a RADIUS server.
//!
//! The splash page posts credentials to `/api/login`; users the RADIUS server accepts and
//! whose `Filter-Id` matches the configured policy get back the URL that releases them onto
//! the network.

pub mod config;
pub use config::{Cli, ServerError};

pub mod routes;
pub use routes::{app, AppState};
