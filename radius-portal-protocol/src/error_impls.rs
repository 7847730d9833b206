use std::error::Error;
use std::fmt;

use super::{DeserializeError, NotEnoughSpace, SerializeError};

impl fmt::Display for NotEnoughSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Not enough space in buffer")
    }
}

impl Error for NotEnoughSpace {}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::NotEnoughSpace => "Not enough space in buffer",
            Self::EmptySecret => "Shared secret must not be empty",
            Self::InvalidUserName => "User name must be between 1 and 253 bytes long",
            Self::PasswordTooLong => "Padded password would exceed 253 bytes",
        };

        write!(f, "{}", message)
    }
}

impl Error for SerializeError {}

impl fmt::Display for DeserializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedPacket => write!(f, "Packet or attribute length inconsistent with buffer"),
            Self::IdentifierMismatch { expected, received } => write!(
                f,
                "Packet identifier {received} does not match outstanding request {expected}"
            ),
            Self::AuthenticatorMismatch => write!(f, "Response authenticator mismatch"),
            Self::UnexpectedCode(code) => write!(f, "Unexpected packet code {code}"),
            Self::MissingAttribute(attribute_type) => {
                write!(f, "Missing required attribute {}", attribute_type.name())
            }
        }
    }
}

impl Error for DeserializeError {}
