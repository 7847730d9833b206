use std::borrow::Cow;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::net::Ipv4Addr;
use std::string::String;
use std::vec::Vec;

use super::{Attribute, AttributeType, Attributes, ValueKind};

/// The decoded value of an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// A text value.
    Text(String),

    /// An integer value.
    Integer(u32),

    /// An IPv4 address.
    Address(Ipv4Addr),

    /// Raw data, used for opaque & unknown attributes as well as values that didn't
    /// decode as the kind their type calls for.
    Octets(Vec<u8>),
}

impl AttributeValue {
    /// Decodes the value of an attribute according to its type.
    pub fn from_attribute(attribute: &Attribute<'_>) -> Self {
        let kind = attribute
            .attribute_type()
            .map_or(ValueKind::Octets, AttributeType::value_kind);

        let decoded = match kind {
            ValueKind::Text => attribute.as_text().map(|text| Self::Text(text.to_owned())),
            ValueKind::Integer => attribute.as_integer().map(Self::Integer),
            ValueKind::Address => attribute.as_address().map(Self::Address),
            ValueKind::Octets => None,
        };

        decoded.unwrap_or_else(|| Self::Octets(attribute.value().to_vec()))
    }

    /// Returns the value as text, if it is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(integer) => write!(f, "{integer}"),
            Self::Address(address) => write!(f, "{address}"),
            Self::Octets(octets) => {
                f.write_str("0x")?;
                for byte in octets {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

/// Returns the dictionary name of an attribute type code, falling back to `Attr-<code>` for unknown types.
pub(crate) fn attribute_name(type_code: u8) -> Cow<'static, str> {
    match AttributeType::try_from(type_code) {
        Ok(attribute_type) => Cow::Borrowed(attribute_type.name()),
        Err(_) => Cow::Owned(format!("Attr-{type_code}")),
    }
}

/// Decoded attributes, keyed by name.
///
/// When an attribute appears more than once in a packet, the last instance wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeMap(BTreeMap<String, AttributeValue>);

impl AttributeMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an attribute value by its dictionary name.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    /// Looks up an attribute value by its type.
    pub fn get_type(&self, attribute_type: AttributeType) -> Option<&AttributeValue> {
        self.get(attribute_type.name())
    }

    /// Inserts a value, replacing (and returning) any previous value with the same name.
    pub fn insert(&mut self, name: String, value: AttributeValue) -> Option<AttributeValue> {
        self.0.insert(name, value)
    }

    /// Number of distinct attributes in the map.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over name/value pairs, ordered by name.
    pub fn iter(&self) -> btree_map::Iter<'_, String, AttributeValue> {
        self.0.iter()
    }
}

impl From<Attributes<'_>> for AttributeMap {
    fn from(attributes: Attributes<'_>) -> Self {
        attributes
            .iter()
            .map(|attribute| {
                (
                    attribute_name(attribute.type_code()).into_owned(),
                    AttributeValue::from_attribute(&attribute),
                )
            })
            .collect()
    }
}

impl FromIterator<(String, AttributeValue)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (String, AttributeValue)>>(iter: I) -> Self {
        let mut map = BTreeMap::new();

        // later duplicates overwrite earlier ones
        for (name, value) in iter {
            map.insert(name, value);
        }

        Self(map)
    }
}

impl<'map> IntoIterator for &'map AttributeMap {
    type Item = (&'map String, &'map AttributeValue);
    type IntoIter = btree_map::Iter<'map, String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
