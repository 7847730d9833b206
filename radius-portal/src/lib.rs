//! An asynchronous [RFC2865] RADIUS client for gating captive portal access.
//!
//! A [`Client`] performs one Access-Request/Access-Accept exchange per login attempt over
//! its own UDP socket, and an [`AuthorizationPolicy`] then decides whether an accepted user
//! is actually allowed on the network, based on the `Filter-Id` attribute the server returned.
//!
//! [RFC2865]: https://www.rfc-editor.org/rfc/rfc2865.html

#![warn(missing_docs)]

pub mod client;
pub use client::{AuthResponse, AuthStatus, Client, ClientError};
pub use client::{ClientConfig, ClientConfigBuilder, ConfigError};

pub mod policy;
pub use policy::{AuthorizationDecision, AuthorizationPolicy, PolicyConfig};

// reexport protocol crate for its attribute types
pub use radius_portal_protocol as protocol;
pub use radius_portal_protocol::{AttributeMap, AttributeType, AttributeValue};
