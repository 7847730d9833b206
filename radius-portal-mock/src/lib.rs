//! An in-process RADIUS server for exercising clients against.
//!
//! Only meant for tests: setup failures panic rather than returning errors.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};

use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

use radius_portal_protocol::{AccessRequest, Attribute, AttributeType, Attributes, Authenticator};
use radius_portal_protocol::{Response, ResponseCode, MAX_PACKET_SIZE};

/// The shared secret the mock server signs and decodes packets with.
pub const SECRET: &[u8] = b"mock server secret";

/// A request as seen by the mock server, with its password revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedRequest {
    pub user: String,
    pub password: String,
    pub nas_ip_address: Ipv4Addr,
    pub nas_port: u32,
}

/// How the mock server answers a request.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Access-Accept with the given attributes.
    Accept(Vec<(AttributeType, Vec<u8>)>),

    /// Access-Reject, optionally with a Reply-Message.
    Reject(Option<String>),

    /// No reply at all.
    Ignore,

    /// Access-Accept whose authenticator doesn't verify.
    CorruptAuthenticator(Vec<(AttributeType, Vec<u8>)>),

    /// A datagram that isn't a RADIUS packet at all.
    Garbage,

    /// A validly signed Access-Accept for a different identifier, followed by the real reply.
    StrayThenAccept(Vec<(AttributeType, Vec<u8>)>),
}

/// A `Filter-Id` attribute for [`Behavior::Accept`].
pub fn filter_id(value: &str) -> (AttributeType, Vec<u8>) {
    (AttributeType::FilterId, value.as_bytes().to_vec())
}

/// A `Reply-Message` attribute.
pub fn reply_message(value: &str) -> (AttributeType, Vec<u8>) {
    (AttributeType::ReplyMessage, value.as_bytes().to_vec())
}

/// A running mock server; the listening task stops when this is dropped.
pub struct MockServer {
    address: SocketAddr,
    requests: Arc<Mutex<Vec<ReceivedRequest>>>,
    task: JoinHandle<()>,
}

impl MockServer {
    /// Starts a server on an ephemeral localhost port, answering each request as `behavior` decides.
    pub async fn start<F>(behavior: F) -> Self
    where
        F: Fn(&ReceivedRequest) -> Behavior + Send + 'static,
    {
        let socket = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("mock server should bind");
        let address = socket.local_addr().expect("bound socket should have an address");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        let task = tokio::spawn(async move {
            let mut buffer = vec![0; MAX_PACKET_SIZE];

            while let Ok((length, peer)) = socket.recv_from(&mut buffer).await {
                let Ok(request) = AccessRequest::deserialize(SECRET, &mut buffer[..length]) else {
                    continue;
                };

                let received = ReceivedRequest {
                    user: String::from_utf8_lossy(request.user_name()).into_owned(),
                    password: String::from_utf8_lossy(request.password()).into_owned(),
                    nas_ip_address: request.nas_ip_address(),
                    nas_port: request.nas_port(),
                };
                let identifier = request.identifier();
                let authenticator = request.authenticator();

                recorded
                    .lock()
                    .expect("request log shouldn't be poisoned")
                    .push(received.clone());

                for datagram in respond(behavior(&received), identifier, &authenticator) {
                    let _ = socket.send_to(&datagram, peer).await;
                }
            }
        });

        Self {
            address,
            requests,
            task,
        }
    }

    /// The localhost port the server listens on.
    pub fn port(&self) -> u16 {
        self.address.port()
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<ReceivedRequest> {
        self.requests
            .lock()
            .expect("request log shouldn't be poisoned")
            .clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn respond(behavior: Behavior, identifier: u8, authenticator: &Authenticator) -> Vec<Vec<u8>> {
    match behavior {
        Behavior::Accept(attributes) => {
            vec![reply(ResponseCode::Accept, identifier, authenticator, &attributes)]
        }
        Behavior::Reject(message) => {
            let attributes: Vec<_> = message.as_deref().map(reply_message).into_iter().collect();
            vec![reply(ResponseCode::Reject, identifier, authenticator, &attributes)]
        }
        Behavior::Ignore => Vec::new(),
        Behavior::CorruptAuthenticator(attributes) => {
            let mut packet = reply(ResponseCode::Accept, identifier, authenticator, &attributes);
            packet[4] ^= 0xff;
            vec![packet]
        }
        Behavior::Garbage => vec![b"\x02\x00 this is not a RADIUS packet".to_vec()],
        Behavior::StrayThenAccept(attributes) => vec![
            reply(
                ResponseCode::Reject,
                identifier.wrapping_add(1),
                authenticator,
                &[],
            ),
            reply(ResponseCode::Accept, identifier, authenticator, &attributes),
        ],
    }
}

fn reply(
    code: ResponseCode,
    identifier: u8,
    authenticator: &Authenticator,
    attributes: &[(AttributeType, Vec<u8>)],
) -> Vec<u8> {
    let list: Vec<Attribute<'_>> = attributes
        .iter()
        .map(|(attribute_type, value)| {
            Attribute::new(*attribute_type, value).expect("attribute value should fit")
        })
        .collect();

    let mut attribute_buffer = vec![0; MAX_PACKET_SIZE];
    let attributes = Attributes::serialize_into(&list, &mut attribute_buffer)
        .expect("attributes should fit in a packet");

    let mut buffer = vec![0; MAX_PACKET_SIZE];
    let length = Response::new(code, identifier, attributes)
        .serialize(SECRET, authenticator, &mut buffer)
        .expect("reply should serialize");
    buffer.truncate(length);

    buffer
}
