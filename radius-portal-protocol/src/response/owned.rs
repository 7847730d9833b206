use super::{Response, ResponseCode};
use crate::AttributeMap;

/// An owned version of a [`Response`], with its attributes decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseOwned {
    /// Whether the request was accepted or rejected.
    pub code: ResponseCode,

    /// Identifier of the request this reply answers.
    pub identifier: u8,

    /// Decoded attributes, where later instances of an attribute replace earlier ones.
    pub attributes: AttributeMap,
}

impl From<Response<'_>> for ResponseOwned {
    fn from(value: Response<'_>) -> Self {
        Self {
            code: value.code,
            identifier: value.identifier,
            attributes: value.attributes.into(),
        }
    }
}
