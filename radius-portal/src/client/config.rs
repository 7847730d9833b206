//! Settings shared by every authentication attempt: server address, secret, timeout and NAS identity.

use std::fmt;
use std::net::Ipv4Addr;
use std::time::Duration;

use thiserror::Error;

/// Default UDP port of a RADIUS authentication server.
pub const DEFAULT_PORT: u16 = 1812;

/// Default time to wait for a reply before giving up on an attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings shared by every authentication attempt a [`Client`](super::Client) makes.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub(super) host: String,
    pub(super) port: u16,
    pub(super) secret: Vec<u8>,
    pub(super) timeout: Duration,
    pub(super) nas_ip_address: Ipv4Addr,
    pub(super) nas_port: u32,
}

impl ClientConfig {
    /// Host name or address of the RADIUS server.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// UDP port of the RADIUS server.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// How long an attempt waits for a reply.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// NAS-IP-Address sent with each request.
    pub fn nas_ip_address(&self) -> Ipv4Addr {
        self.nas_ip_address
    }

    /// NAS-Port sent with each request.
    pub fn nas_port(&self) -> u32 {
        self.nas_port
    }
}

// secret stays out of logs
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secret", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("nas_ip_address", &self.nas_ip_address)
            .field("nas_port", &self.nas_port)
            .finish()
    }
}

/// An invalid setting in a [`ClientConfigBuilder`].
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No RADIUS server host was given.
    #[error("RADIUS server host must not be empty")]
    EmptyHost,

    /// No shared secret was given.
    #[error("RADIUS shared secret must not be empty")]
    EmptySecret,

    /// The timeout was zero, so no reply could ever be received.
    #[error("RADIUS timeout must be greater than zero")]
    ZeroTimeout,
}

/// Builder for [`ClientConfig`] objects.
pub struct ClientConfigBuilder {
    host: String,
    port: u16,
    secret: Vec<u8>,
    timeout: Duration,
    nas_ip_address: Ipv4Addr,
    nas_port: u32,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            secret: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            nas_ip_address: Ipv4Addr::LOCALHOST,
            nas_port: 0,
        }
    }
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values for the various fields.
    ///
    /// The host & shared secret have no sensible defaults and must be set before building.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the RADIUS server host, as a name or an address.
    pub fn host(mut self, host: String) -> Self {
        self.host = host;
        self
    }

    /// Sets the RADIUS server port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the secret shared with the RADIUS server.
    pub fn secret(mut self, secret: &[u8]) -> Self {
        self.secret = secret.to_owned();
        self
    }

    /// Sets how long each attempt waits for a reply.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the NAS-IP-Address sent with each request.
    pub fn nas_ip_address(mut self, nas_ip_address: Ipv4Addr) -> Self {
        self.nas_ip_address = nas_ip_address;
        self
    }

    /// Sets the NAS-Port sent with each request.
    pub fn nas_port(mut self, nas_port: u32) -> Self {
        self.nas_port = nas_port;
        self
    }

    /// Consumes this builder and turns it into a [`ClientConfig`], if all settings are valid.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        if self.host.is_empty() {
            Err(ConfigError::EmptyHost)
        } else if self.secret.is_empty() {
            Err(ConfigError::EmptySecret)
        } else if self.timeout.is_zero() {
            Err(ConfigError::ZeroTimeout)
        } else {
            Ok(ClientConfig {
                host: self.host,
                port: self.port,
                secret: self.secret,
                timeout: self.timeout,
                nas_ip_address: self.nas_ip_address,
                nas_port: self.nas_port,
            })
        }
    }
}
