//! RADIUS access packet <-> binary format conversions, as specified in [RFC2865].
//!
//! This crate only covers the subset of the protocol needed for a PAP-style
//! authentication exchange: encoding Access-Request packets (with User-Password
//! obfuscation) and decoding/verifying Access-Accept and Access-Reject replies.
//! The server half of that exchange is also available, which is mostly useful for
//! testing clients against an in-process server.
//!
//! Everything except the owned attribute/response types works without `std` or an allocator.
//!
//! [RFC2865]: https://www.rfc-editor.org/rfc/rfc2865.html

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

use core::fmt;

use byteorder::{ByteOrder, NetworkEndian};
use num_enum::{TryFromPrimitive, TryFromPrimitiveError};

pub mod access;
pub use access::AccessRequest;

pub mod response;
pub use response::{Response, ResponseCode};

#[cfg(feature = "std")]
pub use response::ResponseOwned;

mod attributes;
pub use attributes::{Attribute, AttributeIter, AttributeType, Attributes, ValueKind};

#[cfg(feature = "std")]
pub use attributes::{AttributeMap, AttributeValue};

mod obfuscation;

// Error trait is only available on std (on stable; stabilized in nightly 1.81) so this has to be std-gated
#[cfg(feature = "std")]
mod error_impls;

/// Size of a RADIUS packet header, in bytes.
pub const HEADER_SIZE_BYTES: usize = 20;

/// Largest packet size permitted by [RFC2865 section 3](https://www.rfc-editor.org/rfc/rfc2865.html#section-3).
pub const MAX_PACKET_SIZE: usize = 4096;

/// An error type indicating that there is not enough space to complete an operation.
#[derive(Debug, PartialEq, Eq)]
pub struct NotEnoughSpace(());

/// An error that occurred while serializing a packet.
#[non_exhaustive]
#[derive(Debug, PartialEq, Eq)]
pub enum SerializeError {
    /// The provided buffer was too small to hold the packet.
    NotEnoughSpace,

    /// No shared secret was provided, so the password can't be obfuscated nor the packet authenticated.
    EmptySecret,

    /// User-Name was empty or longer than an attribute can hold.
    InvalidUserName,

    /// User-Password (after padding) would be longer than an attribute can hold.
    PasswordTooLong,
}

impl From<NotEnoughSpace> for SerializeError {
    fn from(_value: NotEnoughSpace) -> Self {
        Self::NotEnoughSpace
    }
}

/// An error that occurred during deserialization of a packet.
#[non_exhaustive]
#[derive(Debug, PartialEq, Eq)]
pub enum DeserializeError {
    /// The header or an attribute claimed a length inconsistent with the buffer.
    MalformedPacket,

    /// The packet answers a different request than the one outstanding.
    IdentifierMismatch {
        /// Identifier of the outstanding request.
        expected: u8,

        /// Identifier found in the packet.
        received: u8,
    },

    /// The response authenticator didn't match the one computed with the shared secret.
    AuthenticatorMismatch,

    /// The packet code wasn't one that's valid at this point of an exchange.
    UnexpectedCode(u8),

    /// A required attribute was absent.
    MissingAttribute(AttributeType),
}

#[doc(hidden)]
impl From<TryFromPrimitiveError<ResponseCode>> for DeserializeError {
    fn from(value: TryFromPrimitiveError<ResponseCode>) -> Self {
        Self::UnexpectedCode(value.number)
    }
}

/// The code of a RADIUS packet, indicating its type.
#[repr(u8)]
#[non_exhaustive]
#[derive(Debug, PartialEq, Eq, Clone, Copy, TryFromPrimitive)]
pub enum Code {
    /// Access-Request, sent by a client to start authentication.
    AccessRequest = 1,

    /// Access-Accept, sent by a server when authentication succeeded.
    AccessAccept = 2,

    /// Access-Reject, sent by a server when authentication failed.
    AccessReject = 3,

    /// Access-Challenge, sent by a server to request more information.
    AccessChallenge = 11,
}

/// The 16-byte authenticator carried in every packet header.
///
/// In an Access-Request it is a random nonce; in a reply it is an MD5 digest binding
/// the reply to the request and the shared secret.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Authenticator([u8; Authenticator::SIZE]);

impl Authenticator {
    /// Size of an authenticator on the wire, in bytes.
    pub const SIZE: usize = 16;

    /// Returns the raw bytes of this authenticator.
    pub fn as_bytes(&self) -> &[u8; Self::SIZE] {
        &self.0
    }
}

impl From<[u8; Authenticator::SIZE]> for Authenticator {
    fn from(value: [u8; Authenticator::SIZE]) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }

        Ok(())
    }
}

/// Something that can be serialized into a binary format without any key material.
pub trait Serialize {
    /// Returns the current size of the object as represented on the wire.
    fn wire_size(&self) -> usize;

    /// Serializes data into a buffer, returning the resulting length on success or `NotEnoughSpace` on error.
    fn serialize_into_buffer(&self, buffer: &mut [u8]) -> Result<usize, NotEnoughSpace>;
}

/// Header fields common to every packet, as read from a buffer.
struct RawHeader<'raw> {
    code: u8,
    identifier: u8,
    authenticator: Authenticator,

    /// The header itself, up to but not including the authenticator.
    prefix: &'raw [u8],

    /// Attribute section, bounded by the length claimed in the header.
    attributes: &'raw [u8],
}

impl<'raw> RawHeader<'raw> {
    /// Splits a packet into its header fields & attribute section.
    ///
    /// Octets past the claimed length are padding and are ignored, per RFC2865 section 3.
    fn split(buffer: &'raw [u8]) -> Result<Self, DeserializeError> {
        if buffer.len() < HEADER_SIZE_BYTES {
            return Err(DeserializeError::MalformedPacket);
        }

        let claimed_length = usize::from(NetworkEndian::read_u16(&buffer[2..4]));
        if !(HEADER_SIZE_BYTES..=MAX_PACKET_SIZE).contains(&claimed_length)
            || claimed_length > buffer.len()
        {
            return Err(DeserializeError::MalformedPacket);
        }

        let mut authenticator = [0; Authenticator::SIZE];
        authenticator.copy_from_slice(&buffer[4..HEADER_SIZE_BYTES]);

        Ok(Self {
            code: buffer[0],
            identifier: buffer[1],
            authenticator: Authenticator(authenticator),
            prefix: &buffer[..4],
            attributes: &buffer[HEADER_SIZE_BYTES..claimed_length],
        })
    }
}

/// Fills in the code, identifier & length fields of a header.
fn write_header_prefix(buffer: &mut [u8], code: Code, identifier: u8, length: usize) {
    buffer[0] = code as u8;
    buffer[1] = identifier;

    // callers bound length by MAX_PACKET_SIZE, so this can't truncate
    NetworkEndian::write_u16(&mut buffer[2..4], length as u16);
}

#[cfg(test)]
mod tests;
