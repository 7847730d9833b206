//! Authorization of accepted users, based on the `Filter-Id` the RADIUS server assigned them.

use radius_portal_protocol::{AttributeMap, AttributeType};
use tracing::debug;


/// `Filter-Id` value required for access when none is configured.
pub const DEFAULT_EXPECTED_FILTER_ID: &str = "StaffPolicy";

/// Message shown to authorized users when none is configured.
pub const DEFAULT_GRANT_MESSAGE: &str = "Access granted. Welcome to the network.";

/// Message shown to users who authenticated but aren't authorized, when none is configured.
pub const DEFAULT_DENY_MESSAGE: &str = "Access denied. Your account is not authorized for this network.";

/// What an [`AuthorizationPolicy`] checks for, and what it tells users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyConfig {
    /// The `Filter-Id` value a user must have been assigned.
    pub expected_filter_id: String,

    /// Message for users who are allowed on the network.
    pub grant_message: String,

    /// Message for users who authenticated but aren't allowed on the network.
    pub deny_message: String,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            expected_filter_id: DEFAULT_EXPECTED_FILTER_ID.to_owned(),
            grant_message: DEFAULT_GRANT_MESSAGE.to_owned(),
            deny_message: DEFAULT_DENY_MESSAGE.to_owned(),
        }
    }
}

/// The outcome of authorizing an accepted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationDecision {
    /// Whether the user may access the network.
    pub allowed: bool,

    /// The `Filter-Id` the server returned, if there was one and it was text.
    pub matched_value: Option<String>,

    /// The grant message if allowed, otherwise the deny message.
    pub message: String,
}

impl AuthorizationDecision {
    /// Why access was denied, if it was.
    pub fn deny_reason(&self) -> Option<&str> {
        (!self.allowed).then_some(self.message.as_str())
    }
}

/// Decides whether an authenticated user is allowed on the network by comparing their
/// `Filter-Id` to a single expected value.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationPolicy {
    config: PolicyConfig,
}

impl AuthorizationPolicy {
    /// Creates a policy from its configuration.
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    /// The configuration this policy was created with.
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Authorizes a user based on the attributes of their Access-Accept.
    ///
    /// A missing or non-text `Filter-Id` is a denial rather than an error: the user
    /// authenticated, but has no access to grant. The comparison is exact.
    pub fn authorize(&self, attributes: &AttributeMap) -> AuthorizationDecision {
        let matched_value = attributes
            .get_type(AttributeType::FilterId)
            .and_then(|value| value.as_text())
            .map(str::to_owned);

        let allowed = matched_value.as_deref() == Some(self.config.expected_filter_id.as_str());
        debug!(
            filter_id = matched_value.as_deref(),
            expected = %self.config.expected_filter_id,
            allowed,
            "authorization decided"
        );

        let message = if allowed {
            self.config.grant_message.clone()
        } else {
            self.config.deny_message.clone()
        };

        AuthorizationDecision {
            allowed,
            matched_value,
            message,
        }
    }
}
