//! Access-Accept & Access-Reject packets, sent by a server in reply to an Access-Request.

use getset::CopyGetters;
use num_enum::TryFromPrimitive;

use super::obfuscation::response_authenticator;
use super::{write_header_prefix, RawHeader};
use super::{AttributeType, Attributes, Authenticator, Code};
use super::{DeserializeError, SerializeError, HEADER_SIZE_BYTES, MAX_PACKET_SIZE};

#[cfg(feature = "std")]
mod owned;

#[cfg(feature = "std")]
pub use owned::ResponseOwned;


/// The outcome reported by a reply to an Access-Request.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum ResponseCode {
    /// The user was authenticated.
    Accept = 2,

    /// The user was not authenticated.
    Reject = 3,
}

/// A reply to an Access-Request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Response<'packet> {
    /// Whether the request was accepted or rejected.
    code: ResponseCode,

    /// Identifier of the request this reply answers.
    identifier: u8,

    /// Attributes returned by the server.
    attributes: Attributes<'packet>,
}

impl<'packet> Response<'packet> {
    /// Assembles a reply.
    pub fn new(code: ResponseCode, identifier: u8, attributes: Attributes<'packet>) -> Self {
        Self {
            code,
            identifier,
            attributes,
        }
    }

    /// Returns the size of the packet as represented on the wire.
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE_BYTES + self.attributes.as_bytes().len()
    }

    /// The text of the last Reply-Message attribute, if there is one and it's valid UTF-8.
    pub fn reply_message(&self) -> Option<&'packet str> {
        self.attributes
            .last_of(AttributeType::ReplyMessage)
            .and_then(|attribute| attribute.as_text())
    }

    /// Serializes a reply into a buffer, signing it with the authenticator of the request it answers.
    pub fn serialize(
        &self,
        secret: &[u8],
        request_authenticator: &Authenticator,
        buffer: &mut [u8],
    ) -> Result<usize, SerializeError> {
        if secret.is_empty() {
            return Err(SerializeError::EmptySecret);
        }

        let wire_size = self.wire_size();
        if wire_size > MAX_PACKET_SIZE || buffer.len() < wire_size {
            return Err(SerializeError::NotEnoughSpace);
        }

        write_header_prefix(buffer, self.code.into(), self.identifier, wire_size);
        buffer[HEADER_SIZE_BYTES..wire_size].copy_from_slice(self.attributes.as_bytes());

        let authenticator = response_authenticator(
            &buffer[..4],
            request_authenticator,
            self.attributes.as_bytes(),
            secret,
        );
        buffer[4..HEADER_SIZE_BYTES].copy_from_slice(authenticator.as_bytes());

        Ok(wire_size)
    }

    /// Parses & verifies a reply to the outstanding request with the given identifier & authenticator.
    ///
    /// Checks happen in order: header framing, identifier, response authenticator, code and
    /// finally attribute framing. A reply bearing a different identifier is reported as
    /// [`DeserializeError::IdentifierMismatch`] without its authenticator being checked,
    /// since it may well belong to another exchange.
    pub fn deserialize(
        secret: &[u8],
        request_identifier: u8,
        request_authenticator: &Authenticator,
        buffer: &'packet [u8],
    ) -> Result<Self, DeserializeError> {
        let header = RawHeader::split(buffer)?;

        if header.identifier != request_identifier {
            return Err(DeserializeError::IdentifierMismatch {
                expected: request_identifier,
                received: header.identifier,
            });
        }

        let expected_authenticator = response_authenticator(
            header.prefix,
            request_authenticator,
            header.attributes,
            secret,
        );
        if header.authenticator != expected_authenticator {
            return Err(DeserializeError::AuthenticatorMismatch);
        }

        let code = ResponseCode::try_from(header.code)?;
        let attributes = Attributes::try_from(header.attributes)?;

        Ok(Self {
            code,
            identifier: header.identifier,
            attributes,
        })
    }
}

impl From<ResponseCode> for Code {
    fn from(value: ResponseCode) -> Self {
        match value {
            ResponseCode::Accept => Self::AccessAccept,
            ResponseCode::Reject => Self::AccessReject,
        }
    }
}
