//! An implementation of an RFC2865 RADIUS authentication client.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tokio::net::{lookup_host, UdpSocket};
use tracing::{debug, Instrument};
use uuid::Uuid;

use radius_portal_protocol::{self as protocol, AccessRequest, Authenticator, MAX_PACKET_SIZE};

mod config;
pub use config::{ClientConfig, ClientConfigBuilder, ConfigError};
pub use config::{DEFAULT_PORT, DEFAULT_TIMEOUT};

mod exchange;
use exchange::Exchange;

mod response;
pub use response::{AuthResponse, AuthStatus};

/// A RADIUS client.
///
/// Cloning a client is cheap, and clones share the same configuration. Each call to
/// [`authenticate()`](Client::authenticate) is independent of any others in flight.
#[derive(Clone, Debug)]
pub struct Client {
    config: Arc<ClientConfig>,
}

/// An error during a RADIUS exchange.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ClientError {
    /// An error occurred when resolving the server, or sending/receiving a packet.
    #[error(transparent)]
    IOError(#[from] io::Error),

    /// The server didn't send a valid reply in time.
    #[error("RADIUS server did not respond within {0:?}")]
    TimedOut(Duration),

    /// Error when serializing a packet to the wire, e.g. overlong credentials.
    #[error(transparent)]
    SerializeError(#[from] protocol::SerializeError),

    /// Invalid packet received from a server.
    #[error("invalid packet received from server: {0}")]
    InvalidPacketReceived(#[from] protocol::DeserializeError),
}

impl Client {
    /// Initializes a new RADIUS client with the given configuration.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// The configuration this client was created with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Authenticates a user against the RADIUS server with a plaintext username & password.
    ///
    /// Exactly one Access-Request is sent, from a fresh UDP socket that is closed again
    /// when this returns. Replies bearing a different identifier are discarded.
    ///
    /// NOTE: Even if this function returns `Ok`, the authentication may not have succeeded; make sure to check
    /// the [`status`](AuthResponse::status) field of the returned response.
    pub async fn authenticate(
        &self,
        user: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let attempt_id = Uuid::new_v4();
        let span = tracing::info_span!("radius_attempt", %attempt_id, user);

        self.attempt(user, password).instrument(span).await
    }

    async fn attempt(&self, user: &str, password: &str) -> Result<AuthResponse, ClientError> {
        // block scope keeps the (non-Send) thread rng from living across an await point
        let (identifier, authenticator) = {
            let mut rng = rand::thread_rng();
            let authenticator: [u8; Authenticator::SIZE] = rng.gen();
            (rng.gen::<u8>(), Authenticator::from(authenticator))
        };

        let request = AccessRequest::new(
            identifier,
            authenticator,
            user.as_bytes(),
            password.as_bytes(),
            self.config.nas_ip_address,
            self.config.nas_port,
        )?;

        // encoding problems are reported before any socket is opened
        let mut packet_buffer = vec![0; request.wire_size()];
        request.serialize(&self.config.secret, &mut packet_buffer)?;

        let socket = self.connect().await?;
        socket.send(&packet_buffer).await?;

        let mut exchange = Exchange::new(&self.config.secret, identifier, authenticator);
        exchange.mark_sent();
        debug!(identifier, server = ?socket.peer_addr().ok(), "sent Access-Request");

        let deadline = tokio::time::sleep(self.config.timeout);
        tokio::pin!(deadline);

        let mut receive_buffer = vec![0; MAX_PACKET_SIZE];

        loop {
            let resolution = tokio::select! {
                () = &mut deadline => exchange.on_timeout(self.config.timeout),
                received = socket.recv(&mut receive_buffer) => match received {
                    Ok(length) => exchange.on_datagram(&receive_buffer[..length]),
                    Err(error) => exchange.on_transport_error(error),
                },
            };

            if let Some(outcome) = resolution {
                return outcome;
            }
        }
    }

    /// Opens an ephemeral UDP socket connected to the configured server.
    ///
    /// Connecting means the kernel drops datagrams from any other source.
    async fn connect(&self) -> io::Result<UdpSocket> {
        let server = lookup_host((self.config.host.as_str(), self.config.port))
            .await?
            .next()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no addresses found for {}", self.config.host),
                )
            })?;

        let local: SocketAddr = if server.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(local).await?;
        socket.connect(server).await?;

        Ok(socket)
    }
}
