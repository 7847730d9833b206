use radius_portal_protocol::{AttributeMap, AttributeType, AttributeValue, ResponseCode, ResponseOwned};

/// The status returned by a server for an Access-Request.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AuthStatus {
    /// The server sent an Access-Accept.
    Accept,

    /// The server sent an Access-Reject.
    Reject,
}

impl From<ResponseCode> for AuthStatus {
    fn from(value: ResponseCode) -> Self {
        match value {
            ResponseCode::Accept => Self::Accept,
            ResponseCode::Reject => Self::Reject,
        }
    }
}

/// A server response to an authentication attempt.
#[must_use = "At the very least, the authentication status must be checked, as a rejection is not reported as an error."]
#[derive(PartialEq, Eq, Debug)]
pub struct AuthResponse {
    /// Whether the server accepted or rejected the credentials.
    pub status: AuthStatus,

    /// The Reply-Message sent by the server, intended to be displayed to the user.
    pub server_message: Option<String>,

    /// Attributes returned with an Access-Accept; always empty for a rejection.
    pub attributes: AttributeMap,
}

impl From<ResponseOwned> for AuthResponse {
    fn from(response: ResponseOwned) -> Self {
        let status = AuthStatus::from(response.code);
        let server_message = response
            .attributes
            .get_type(AttributeType::ReplyMessage)
            .and_then(AttributeValue::as_text)
            .map(str::to_owned);

        let attributes = match status {
            AuthStatus::Accept => response.attributes,
            AuthStatus::Reject => AttributeMap::new(),
        };

        Self {
            status,
            server_message,
            attributes,
        }
    }
}
