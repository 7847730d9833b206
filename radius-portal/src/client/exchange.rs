//! Resolution of a single request/response exchange, independent of any socket or timer.

use std::io;
use std::time::Duration;

use radius_portal_protocol::{Authenticator, DeserializeError, Response, ResponseOwned};
use tracing::{debug, warn};

use super::{AuthResponse, ClientError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Sent,
    Resolved,
}

/// Tracks one outstanding Access-Request and turns the signals seen while waiting for it
/// (datagrams, the timer firing, socket errors) into exactly one outcome.
///
/// Every `on_*` method returns `Some` for the signal that resolves the exchange and
/// `None` for everything else, including anything observed after resolution.
pub(super) struct Exchange<'secret> {
    secret: &'secret [u8],
    identifier: u8,
    authenticator: Authenticator,
    state: State,
}

impl<'secret> Exchange<'secret> {
    pub(super) fn new(secret: &'secret [u8], identifier: u8, authenticator: Authenticator) -> Self {
        Self {
            secret,
            identifier,
            authenticator,
            state: State::Idle,
        }
    }

    /// Records that the request has been sent, after which replies are accepted.
    pub(super) fn mark_sent(&mut self) {
        if self.state == State::Idle {
            self.state = State::Sent;
        }
    }

    #[cfg(test)]
    fn is_resolved(&self) -> bool {
        self.state == State::Resolved
    }

    /// Handles a datagram received from the server.
    pub(super) fn on_datagram(
        &mut self,
        datagram: &[u8],
    ) -> Option<Result<AuthResponse, ClientError>> {
        if self.state != State::Sent {
            debug!(length = datagram.len(), "ignoring datagram outside of a pending exchange");
            return None;
        }

        let outcome = match Response::deserialize(
            self.secret,
            self.identifier,
            &self.authenticator,
            datagram,
        ) {
            Ok(response) => Ok(AuthResponse::from(ResponseOwned::from(response))),

            // some other exchange's reply, so keep waiting for ours
            Err(DeserializeError::IdentifierMismatch { expected, received }) => {
                debug!(expected, received, "discarding reply with mismatched identifier");
                return None;
            }

            Err(error) => {
                warn!(%error, "reply could not be verified or decoded");
                Err(ClientError::InvalidPacketReceived(error))
            }
        };

        self.resolve(outcome)
    }

    /// Handles expiry of the reply timer.
    pub(super) fn on_timeout(
        &mut self,
        timeout: Duration,
    ) -> Option<Result<AuthResponse, ClientError>> {
        if self.state == State::Sent {
            warn!(?timeout, "no reply from RADIUS server");
        }

        self.resolve(Err(ClientError::TimedOut(timeout)))
    }

    /// Handles an error reported by the socket while waiting for a reply.
    pub(super) fn on_transport_error(
        &mut self,
        error: io::Error,
    ) -> Option<Result<AuthResponse, ClientError>> {
        self.resolve(Err(ClientError::IOError(error)))
    }

    fn resolve(
        &mut self,
        outcome: Result<AuthResponse, ClientError>,
    ) -> Option<Result<AuthResponse, ClientError>> {
        match self.state {
            State::Sent => {
                self.state = State::Resolved;
                Some(outcome)
            }
            State::Idle | State::Resolved => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use radius_portal_protocol::{
        Attribute, AttributeType, AttributeValue, Attributes, ResponseCode,
    };

    use super::*;
    use crate::client::AuthStatus;

    const SECRET: &[u8] = b"shared secret";
    const IDENTIFIER: u8 = 42;

    fn request_authenticator() -> Authenticator {
        Authenticator::from([0x5a; 16])
    }

    fn reply(code: ResponseCode, identifier: u8, attributes: &[Attribute<'_>]) -> Vec<u8> {
        let mut attribute_buffer = [0u8; 512];
        let attributes = Attributes::serialize_into(attributes, &mut attribute_buffer)
            .expect("attributes should fit");

        let mut buffer = vec![0; 1024];
        let length = Response::new(code, identifier, attributes)
            .serialize(SECRET, &request_authenticator(), &mut buffer)
            .expect("reply should serialize");
        buffer.truncate(length);

        buffer
    }

    fn sent_exchange() -> Exchange<'static> {
        let mut exchange = Exchange::new(SECRET, IDENTIFIER, request_authenticator());
        exchange.mark_sent();
        exchange
    }

    fn filter_id(value: &[u8]) -> Attribute<'_> {
        Attribute::new(AttributeType::FilterId, value).expect("value should fit")
    }

    #[test]
    fn accept_resolves_with_attributes() {
        let mut exchange = sent_exchange();
        let datagram = reply(ResponseCode::Accept, IDENTIFIER, &[filter_id(b"StaffPolicy")]);

        let response = exchange
            .on_datagram(&datagram)
            .expect("reply should resolve the exchange")
            .expect("reply should be accepted");

        assert_eq!(response.status, AuthStatus::Accept);
        assert_eq!(
            response.attributes.get_type(AttributeType::FilterId),
            Some(&AttributeValue::Text("StaffPolicy".to_owned()))
        );
        assert!(exchange.is_resolved());
    }

    #[test]
    fn reject_drops_attributes_but_keeps_message() {
        let mut exchange = sent_exchange();
        let message =
            Attribute::new(AttributeType::ReplyMessage, b"Bad password").expect("value should fit");
        let datagram = reply(
            ResponseCode::Reject,
            IDENTIFIER,
            &[filter_id(b"StaffPolicy"), message],
        );

        let response = exchange
            .on_datagram(&datagram)
            .expect("reply should resolve the exchange")
            .expect("a rejection isn't an error");

        assert_eq!(response.status, AuthStatus::Reject);
        assert_eq!(response.server_message.as_deref(), Some("Bad password"));
        assert!(response.attributes.is_empty());
    }

    #[test]
    fn last_reply_message_wins() {
        let mut exchange = sent_exchange();
        let first =
            Attribute::new(AttributeType::ReplyMessage, b"Welcome").expect("value should fit");
        let second =
            Attribute::new(AttributeType::ReplyMessage, b"Welcome back").expect("value should fit");
        let datagram = reply(ResponseCode::Accept, IDENTIFIER, &[first, second]);

        let response = exchange
            .on_datagram(&datagram)
            .expect("reply should resolve the exchange")
            .expect("reply should be accepted");

        assert_eq!(response.server_message.as_deref(), Some("Welcome back"));
        assert_eq!(
            response.attributes.get_type(AttributeType::ReplyMessage),
            Some(&AttributeValue::Text("Welcome back".to_owned()))
        );
    }

    #[test]
    fn mismatched_identifier_keeps_waiting() {
        let mut exchange = sent_exchange();

        let stray = reply(ResponseCode::Accept, IDENTIFIER + 1, &[]);
        assert!(exchange.on_datagram(&stray).is_none());
        assert!(!exchange.is_resolved());

        let ours = reply(ResponseCode::Reject, IDENTIFIER, &[]);
        let response = exchange
            .on_datagram(&ours)
            .expect("matching reply should resolve the exchange")
            .expect("a rejection isn't an error");
        assert_eq!(response.status, AuthStatus::Reject);
    }

    #[test]
    fn corrupted_reply_is_a_decode_error() {
        let mut exchange = sent_exchange();
        let mut datagram = reply(ResponseCode::Accept, IDENTIFIER, &[filter_id(b"StaffPolicy")]);
        let last = datagram.len() - 1;
        datagram[last] ^= 0xff;

        let outcome = exchange
            .on_datagram(&datagram)
            .expect("a bad reply should resolve the exchange");

        assert!(matches!(
            outcome,
            Err(ClientError::InvalidPacketReceived(
                DeserializeError::AuthenticatorMismatch
            ))
        ));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let mut exchange = sent_exchange();

        let outcome = exchange
            .on_datagram(b"definitely not RADIUS")
            .expect("garbage should resolve the exchange");

        assert!(matches!(
            outcome,
            Err(ClientError::InvalidPacketReceived(
                DeserializeError::MalformedPacket
            ))
        ));
    }

    #[test]
    fn timeout_after_reply_is_ignored() {
        let mut exchange = sent_exchange();
        let datagram = reply(ResponseCode::Accept, IDENTIFIER, &[]);

        assert!(exchange.on_datagram(&datagram).is_some());
        assert!(exchange.on_timeout(Duration::from_secs(10)).is_none());
        assert!(exchange
            .on_transport_error(io::ErrorKind::ConnectionRefused.into())
            .is_none());
    }

    #[test]
    fn reply_after_timeout_is_ignored() {
        let mut exchange = sent_exchange();

        let outcome = exchange
            .on_timeout(Duration::from_millis(250))
            .expect("timer should resolve the exchange");
        assert!(matches!(outcome, Err(ClientError::TimedOut(timeout)) if timeout == Duration::from_millis(250)));

        let late = reply(ResponseCode::Accept, IDENTIFIER, &[]);
        assert!(exchange.on_datagram(&late).is_none());
    }

    #[test]
    fn duplicate_reply_is_ignored() {
        let mut exchange = sent_exchange();
        let datagram = reply(ResponseCode::Accept, IDENTIFIER, &[]);

        assert!(exchange.on_datagram(&datagram).is_some());
        assert!(exchange.on_datagram(&datagram).is_none());
    }

    #[test]
    fn nothing_resolves_before_sending() {
        let mut exchange = Exchange::new(SECRET, IDENTIFIER, request_authenticator());
        let datagram = reply(ResponseCode::Accept, IDENTIFIER, &[]);

        assert!(exchange.on_datagram(&datagram).is_none());
        assert!(exchange.on_timeout(Duration::from_secs(1)).is_none());
        assert!(!exchange.is_resolved());
    }

    #[test]
    fn transport_error_resolves() {
        let mut exchange = sent_exchange();

        let outcome = exchange
            .on_transport_error(io::ErrorKind::ConnectionRefused.into())
            .expect("socket error should resolve the exchange");

        assert!(matches!(
            outcome,
            Err(ClientError::IOError(error)) if error.kind() == io::ErrorKind::ConnectionRefused
        ));
    }
}
