//! RADIUS attributes, as carried after the packet header.

use core::net::Ipv4Addr;

use byteorder::{ByteOrder, NetworkEndian};
use num_enum::TryFromPrimitive;

use super::{DeserializeError, NotEnoughSpace, Serialize};

#[cfg(feature = "std")]
mod owned;
#[cfg(feature = "std")]
pub use owned::{AttributeMap, AttributeValue};

#[cfg(test)]
mod tests;

/// The attribute types this crate knows how to interpret, per [RFC2865 section 5].
///
/// Attributes of other types are still carried through as raw octets.
///
/// [RFC2865 section 5]: https://www.rfc-editor.org/rfc/rfc2865.html#section-5
#[repr(u8)]
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum AttributeType {
    /// Name of the user to be authenticated.
    UserName = 1,

    /// Obfuscated password of the user to be authenticated.
    UserPassword = 2,

    /// IPv4 address of the NAS requesting authentication.
    NasIpAddress = 4,

    /// Physical port number of the NAS authenticating the user.
    NasPort = 5,

    /// Type of service the user has requested or is granted.
    ServiceType = 6,

    /// Address to be configured for the user.
    FramedIpAddress = 8,

    /// Name of the filter list (policy) to apply to the user's session.
    FilterId = 11,

    /// Text which may be displayed to the user.
    ReplyMessage = 18,

    /// Opaque state echoed between server & client.
    State = 24,

    /// Opaque value sent by the server for use in accounting.
    Class = 25,

    /// Maximum number of seconds the session may last.
    SessionTimeout = 27,

    /// Maximum number of consecutive idle seconds allowed.
    IdleTimeout = 28,

    /// Identifier of the NAS port the user connected to.
    CalledStationId = 30,

    /// Identifier of the user's device, typically its MAC address.
    CallingStationId = 31,

    /// String identifying the NAS.
    NasIdentifier = 32,
}

/// How the value of an attribute is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// UTF-8 text.
    Text,

    /// 32-bit big-endian unsigned integer.
    Integer,

    /// IPv4 address.
    Address,

    /// Opaque binary data.
    Octets,
}

impl AttributeType {
    /// The dictionary name of this attribute type, e.g. `Filter-Id`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::UserName => "User-Name",
            Self::UserPassword => "User-Password",
            Self::NasIpAddress => "NAS-IP-Address",
            Self::NasPort => "NAS-Port",
            Self::ServiceType => "Service-Type",
            Self::FramedIpAddress => "Framed-IP-Address",
            Self::FilterId => "Filter-Id",
            Self::ReplyMessage => "Reply-Message",
            Self::State => "State",
            Self::Class => "Class",
            Self::SessionTimeout => "Session-Timeout",
            Self::IdleTimeout => "Idle-Timeout",
            Self::CalledStationId => "Called-Station-Id",
            Self::CallingStationId => "Calling-Station-Id",
            Self::NasIdentifier => "NAS-Identifier",
        }
    }

    /// How the value of an attribute of this type should be interpreted.
    pub const fn value_kind(self) -> ValueKind {
        match self {
            Self::UserName
            | Self::FilterId
            | Self::ReplyMessage
            | Self::CalledStationId
            | Self::CallingStationId
            | Self::NasIdentifier => ValueKind::Text,

            Self::NasPort | Self::ServiceType | Self::SessionTimeout | Self::IdleTimeout => {
                ValueKind::Integer
            }

            Self::NasIpAddress | Self::FramedIpAddress => ValueKind::Address,

            Self::UserPassword | Self::State | Self::Class => ValueKind::Octets,
        }
    }
}

/// A single type-length-value attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'data> {
    type_code: u8,
    value: &'data [u8],
}

impl<'data> Attribute<'data> {
    /// Size of the type & length fields that precede an attribute's value.
    pub const HEADER_SIZE: usize = 2;

    /// Maximum length of an attribute value, limited by its one-byte length field.
    pub const MAX_VALUE_LENGTH: usize = 253;

    /// Creates an attribute of a known type, if the value fits in an attribute.
    pub fn new(attribute_type: AttributeType, value: &'data [u8]) -> Option<Self> {
        Self::with_type_code(attribute_type as u8, value)
    }

    /// Creates an attribute with an arbitrary type code, if the value fits in an attribute.
    pub fn with_type_code(type_code: u8, value: &'data [u8]) -> Option<Self> {
        if value.len() <= Self::MAX_VALUE_LENGTH {
            Some(Self { type_code, value })
        } else {
            None
        }
    }

    /// The raw type code of this attribute.
    pub fn type_code(&self) -> u8 {
        self.type_code
    }

    /// The type of this attribute, if it's one this crate knows about.
    pub fn attribute_type(&self) -> Option<AttributeType> {
        AttributeType::try_from(self.type_code).ok()
    }

    /// The raw value of this attribute.
    pub fn value(&self) -> &'data [u8] {
        self.value
    }

    /// Interprets the value as UTF-8 text.
    pub fn as_text(&self) -> Option<&'data str> {
        core::str::from_utf8(self.value).ok()
    }

    /// Interprets the value as a 32-bit integer.
    pub fn as_integer(&self) -> Option<u32> {
        (self.value.len() == 4).then(|| NetworkEndian::read_u32(self.value))
    }

    /// Interprets the value as an IPv4 address.
    pub fn as_address(&self) -> Option<Ipv4Addr> {
        <[u8; 4]>::try_from(self.value).ok().map(Ipv4Addr::from)
    }
}

impl Serialize for Attribute<'_> {
    fn wire_size(&self) -> usize {
        Self::HEADER_SIZE + self.value.len()
    }

    fn serialize_into_buffer(&self, buffer: &mut [u8]) -> Result<usize, NotEnoughSpace> {
        let wire_size = self.wire_size();

        if buffer.len() >= wire_size {
            buffer[0] = self.type_code;

            // value length is checked on construction, so this fits in a byte
            buffer[1] = wire_size as u8;
            buffer[Self::HEADER_SIZE..wire_size].copy_from_slice(self.value);

            Ok(wire_size)
        } else {
            Err(NotEnoughSpace(()))
        }
    }
}

/// The attribute section of a packet, whose TLV framing is known to be consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attributes<'data>(&'data [u8]);

impl<'data> Attributes<'data> {
    /// Serializes a list of attributes into a buffer, returning a view of the written section.
    pub fn serialize_into(
        attributes: &[Attribute<'_>],
        buffer: &'data mut [u8],
    ) -> Result<Self, NotEnoughSpace> {
        let mut written = 0;
        for attribute in attributes {
            written += attribute.serialize_into_buffer(&mut buffer[written..])?;
        }

        let buffer: &'data [u8] = buffer;
        Ok(Self(&buffer[..written]))
    }

    /// The attributes as they appear on the wire.
    pub fn as_bytes(&self) -> &'data [u8] {
        self.0
    }

    /// Whether there are no attributes at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the attributes in wire order.
    pub fn iter(&self) -> AttributeIter<'data> {
        AttributeIter { remaining: self.0 }
    }

    /// Returns the last attribute of the given type.
    ///
    /// Multi-valued attributes aren't supported, so later instances take precedence over earlier ones.
    pub fn last_of(&self, attribute_type: AttributeType) -> Option<Attribute<'data>> {
        self.iter()
            .filter(|attribute| attribute.type_code == attribute_type as u8)
            .last()
    }
}

impl<'data> TryFrom<&'data [u8]> for Attributes<'data> {
    type Error = DeserializeError;

    fn try_from(buffer: &'data [u8]) -> Result<Self, Self::Error> {
        let mut remaining = buffer;

        while !remaining.is_empty() {
            if remaining.len() < Attribute::HEADER_SIZE {
                return Err(DeserializeError::MalformedPacket);
            }

            let length = usize::from(remaining[1]);
            if length < Attribute::HEADER_SIZE || length > remaining.len() {
                return Err(DeserializeError::MalformedPacket);
            }

            remaining = &remaining[length..];
        }

        Ok(Self(buffer))
    }
}

impl<'data> IntoIterator for Attributes<'data> {
    type Item = Attribute<'data>;
    type IntoIter = AttributeIter<'data>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'data> IntoIterator for &Attributes<'data> {
    type Item = Attribute<'data>;
    type IntoIter = AttributeIter<'data>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the attributes in an [`Attributes`] section.
#[derive(Debug, Clone)]
pub struct AttributeIter<'data> {
    remaining: &'data [u8],
}

impl<'data> Iterator for AttributeIter<'data> {
    type Item = Attribute<'data>;

    fn next(&mut self) -> Option<Self::Item> {
        // framing was validated when the section was constructed, but don't panic if that's violated somehow
        let length = usize::from(*self.remaining.get(1)?);
        if length < Attribute::HEADER_SIZE || length > self.remaining.len() {
            self.remaining = &[];
            return None;
        }

        let attribute = Attribute {
            type_code: self.remaining[0],
            value: &self.remaining[Attribute::HEADER_SIZE..length],
        };
        self.remaining = &self.remaining[length..];

        Some(attribute)
    }
}
