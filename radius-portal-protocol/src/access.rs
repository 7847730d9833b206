//! Access-Request packets, which begin an authentication exchange.

use core::fmt;
use core::net::Ipv4Addr;
use core::ops::Range;

use getset::CopyGetters;

use super::obfuscation::{hide_password, padded_password_length, reveal_password};
use super::{write_header_prefix, RawHeader};
use super::{Attribute, AttributeType, Attributes, Authenticator, Code, Serialize};
use super::{DeserializeError, SerializeError, HEADER_SIZE_BYTES};


/// An Access-Request packet, carrying a user's credentials to a RADIUS server.
///
/// The request always contains User-Name, User-Password, NAS-IP-Address and NAS-Port,
/// in that order.
#[derive(Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct AccessRequest<'packet> {
    /// Identifier used by the server to tag its reply.
    identifier: u8,

    /// Random nonce that replies are bound to, which also keys password obfuscation.
    authenticator: Authenticator,

    /// Name of the user being authenticated.
    user_name: &'packet [u8],

    /// The user's password, in plaintext.
    password: &'packet [u8],

    /// Address identifying the NAS that sent the request.
    nas_ip_address: Ipv4Addr,

    /// NAS port the user is connected through.
    nas_port: u32,
}

impl<'packet> AccessRequest<'packet> {
    /// Longest password that can be sent, since its padded form must fit in a single attribute.
    pub const MAX_PASSWORD_LENGTH: usize = 240;

    /// Size of the fixed-width NAS-IP-Address & NAS-Port attributes together.
    const NAS_ATTRIBUTES_SIZE: usize = 2 * (Attribute::HEADER_SIZE + 4);

    /// Assembles an Access-Request, ensuring every field fits in its attribute.
    pub fn new(
        identifier: u8,
        authenticator: Authenticator,
        user_name: &'packet [u8],
        password: &'packet [u8],
        nas_ip_address: Ipv4Addr,
        nas_port: u32,
    ) -> Result<Self, SerializeError> {
        if user_name.is_empty() || user_name.len() > Attribute::MAX_VALUE_LENGTH {
            Err(SerializeError::InvalidUserName)
        } else if password.len() > Self::MAX_PASSWORD_LENGTH {
            Err(SerializeError::PasswordTooLong)
        } else {
            Ok(Self {
                identifier,
                authenticator,
                user_name,
                password,
                nas_ip_address,
                nas_port,
            })
        }
    }

    /// Returns the size of the packet as represented on the wire.
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE_BYTES
            + Attribute::HEADER_SIZE
            + self.user_name.len()
            + Attribute::HEADER_SIZE
            + padded_password_length(self.password.len())
            + Self::NAS_ATTRIBUTES_SIZE
    }

    /// Serializes the packet into a buffer, obfuscating the password with the shared secret
    /// as specified in [RFC2865 section 5.2].
    ///
    /// [RFC2865 section 5.2]: https://www.rfc-editor.org/rfc/rfc2865.html#section-5.2
    pub fn serialize(&self, secret: &[u8], buffer: &mut [u8]) -> Result<usize, SerializeError> {
        if secret.is_empty() {
            return Err(SerializeError::EmptySecret);
        }

        let wire_size = self.wire_size();
        if buffer.len() < wire_size {
            return Err(SerializeError::NotEnoughSpace);
        }

        write_header_prefix(buffer, Code::AccessRequest, self.identifier, wire_size);
        buffer[4..HEADER_SIZE_BYTES].copy_from_slice(self.authenticator.as_bytes());

        let mut offset = HEADER_SIZE_BYTES;

        let user_name = Attribute::new(AttributeType::UserName, self.user_name)
            .ok_or(SerializeError::InvalidUserName)?;
        offset += user_name.serialize_into_buffer(&mut buffer[offset..])?;

        // the password is padded & obfuscated directly in the output buffer
        let padded_length = padded_password_length(self.password.len());
        buffer[offset] = AttributeType::UserPassword as u8;
        buffer[offset + 1] = (Attribute::HEADER_SIZE + padded_length) as u8;

        let value_start = offset + Attribute::HEADER_SIZE;
        let value = &mut buffer[value_start..value_start + padded_length];
        value.fill(0);
        value[..self.password.len()].copy_from_slice(self.password);
        hide_password(value, secret, &self.authenticator);
        offset = value_start + padded_length;

        let address = self.nas_ip_address.octets();
        let nas_ip_address = Attribute::new(AttributeType::NasIpAddress, &address)
            .ok_or(SerializeError::NotEnoughSpace)?;
        offset += nas_ip_address.serialize_into_buffer(&mut buffer[offset..])?;

        let port = self.nas_port.to_be_bytes();
        let nas_port = Attribute::new(AttributeType::NasPort, &port)
            .ok_or(SerializeError::NotEnoughSpace)?;
        offset += nas_port.serialize_into_buffer(&mut buffer[offset..])?;

        Ok(offset)
    }

    /// Parses an Access-Request as received by a server, revealing the password in place.
    ///
    /// NAS-IP-Address and NAS-Port default to `0.0.0.0` and `0` when absent.
    pub fn deserialize(secret: &[u8], buffer: &'packet mut [u8]) -> Result<Self, DeserializeError> {
        let (authenticator, password_range) = locate_password(buffer)?;

        // RFC2865 section 5.2: the obfuscated password is a nonzero multiple of 16 octets
        if password_range.is_empty() || password_range.len() % 16 != 0 {
            return Err(DeserializeError::MalformedPacket);
        }

        reveal_password(&mut buffer[password_range.clone()], secret, &authenticator);

        let buffer: &'packet [u8] = buffer;
        let header = RawHeader::split(buffer)?;
        let attributes = Attributes::try_from(header.attributes)?;

        let user_name = attributes
            .last_of(AttributeType::UserName)
            .ok_or(DeserializeError::MissingAttribute(AttributeType::UserName))?
            .value();

        // strip NUL padding
        let mut password = &buffer[password_range];
        while let [rest @ .., 0] = password {
            password = rest;
        }

        let nas_ip_address = attributes
            .last_of(AttributeType::NasIpAddress)
            .and_then(|attribute| attribute.as_address())
            .unwrap_or(Ipv4Addr::UNSPECIFIED);
        let nas_port = attributes
            .last_of(AttributeType::NasPort)
            .and_then(|attribute| attribute.as_integer())
            .unwrap_or(0);

        Ok(Self {
            identifier: header.identifier,
            authenticator,
            user_name,
            password,
            nas_ip_address,
            nas_port,
        })
    }
}

/// Finds the value of the (last) User-Password attribute of an Access-Request.
fn locate_password(buffer: &[u8]) -> Result<(Authenticator, Range<usize>), DeserializeError> {
    let header = RawHeader::split(buffer)?;
    if header.code != Code::AccessRequest as u8 {
        return Err(DeserializeError::UnexpectedCode(header.code));
    }

    let mut offset = HEADER_SIZE_BYTES;
    let mut password_range = None;

    for attribute in Attributes::try_from(header.attributes)? {
        let value_start = offset + Attribute::HEADER_SIZE;
        offset += attribute.wire_size();

        if attribute.attribute_type() == Some(AttributeType::UserPassword) {
            password_range = Some(value_start..offset);
        }
    }

    password_range
        .map(|range| (header.authenticator, range))
        .ok_or(DeserializeError::MissingAttribute(AttributeType::UserPassword))
}

// manual impl so passwords don't end up in logs
impl fmt::Debug for AccessRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessRequest")
            .field("identifier", &self.identifier)
            .field("authenticator", &self.authenticator)
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .field("nas_ip_address", &self.nas_ip_address)
            .field("nas_port", &self.nas_port)
            .finish()
    }
}
