//! Command-line & environment configuration.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use radius_portal::client::{DEFAULT_PORT, DEFAULT_TIMEOUT};
use radius_portal::policy::{DEFAULT_DENY_MESSAGE, DEFAULT_EXPECTED_FILTER_ID, DEFAULT_GRANT_MESSAGE};
use radius_portal::{ClientConfig, ClientConfigBuilder, ConfigError, PolicyConfig};

/// Captive portal login server backed by RADIUS authentication
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// RADIUS server host name or address
    #[arg(long, env = "RADIUS_HOST", default_value = "127.0.0.1")]
    pub radius_host: String,

    /// RADIUS server authentication port
    #[arg(long, env = "RADIUS_PORT", default_value_t = DEFAULT_PORT)]
    pub radius_port: u16,

    /// Secret shared with the RADIUS server
    #[arg(long, env = "RADIUS_SECRET", hide_env_values = true)]
    pub radius_secret: String,

    /// Filter-Id a user must be assigned to be let onto the network
    #[arg(long, env = "EXPECTED_FILTER_ID", default_value = DEFAULT_EXPECTED_FILTER_ID)]
    pub expected_filter_id: String,

    /// Message for users who authenticate but aren't authorized
    #[arg(long, env = "DENY_MESSAGE", default_value = DEFAULT_DENY_MESSAGE)]
    pub deny_message: String,

    /// Message for users who are let onto the network
    #[arg(long, env = "GRANT_MESSAGE", default_value = DEFAULT_GRANT_MESSAGE)]
    pub grant_message: String,

    /// Seconds to wait for the RADIUS server to reply
    #[arg(long, env = "RADIUS_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub radius_timeout_secs: u64,

    /// NAS-IP-Address sent with each request
    #[arg(long, env = "NAS_IP_ADDRESS", default_value_t = Ipv4Addr::LOCALHOST)]
    pub nas_ip_address: Ipv4Addr,

    /// NAS-Port sent with each request
    #[arg(long, env = "NAS_PORT", default_value_t = 0)]
    pub nas_port: u32,

    /// Address the HTTP server listens on
    #[arg(long, env = "LISTEN_ADDRESS", default_value = "0.0.0.0:8080")]
    pub listen_address: SocketAddr,
}

/// An error that stops the server from starting or running.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ServerError {
    /// The RADIUS client settings were invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The listener couldn't be bound or failed while serving.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Cli {
    /// Settings for the RADIUS client.
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        ClientConfigBuilder::new()
            .host(self.radius_host.clone())
            .port(self.radius_port)
            .secret(self.radius_secret.as_bytes())
            .timeout(Duration::from_secs(self.radius_timeout_secs))
            .nas_ip_address(self.nas_ip_address)
            .nas_port(self.nas_port)
            .build()
    }

    /// Settings for the authorization policy.
    pub fn policy_config(&self) -> PolicyConfig {
        PolicyConfig {
            expected_filter_id: self.expected_filter_id.clone(),
            grant_message: self.grant_message.clone(),
            deny_message: self.deny_message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["radius-portal-server", "--radius-secret", "testing123"])
            .expect("arguments should parse");

        let client = cli.client_config().expect("client config should be valid");
        assert_eq!(client.host(), "127.0.0.1");
        assert_eq!(client.port(), 1812);
        assert_eq!(client.timeout(), Duration::from_secs(10));
        assert_eq!(client.nas_ip_address(), Ipv4Addr::LOCALHOST);
        assert_eq!(client.nas_port(), 0);

        assert_eq!(cli.policy_config(), PolicyConfig::default());
        assert_eq!(cli.listen_address, "0.0.0.0:8080".parse::<SocketAddr>().expect("valid address"));
    }

    #[test]
    fn overrides() {
        let cli = Cli::try_parse_from([
            "radius-portal-server",
            "--radius-host",
            "radius.example.net",
            "--radius-port",
            "11812",
            "--radius-secret",
            "testing123",
            "--expected-filter-id",
            "Lab-Users",
            "--radius-timeout-secs",
            "3",
            "--nas-ip-address",
            "10.0.0.2",
            "--nas-port",
            "12",
        ])
        .expect("arguments should parse");

        let client = cli.client_config().expect("client config should be valid");
        assert_eq!(client.host(), "radius.example.net");
        assert_eq!(client.port(), 11812);
        assert_eq!(client.timeout(), Duration::from_secs(3));
        assert_eq!(client.nas_ip_address(), Ipv4Addr::new(10, 0, 0, 2));
        assert_eq!(client.nas_port(), 12);
        assert_eq!(cli.policy_config().expected_filter_id, "Lab-Users");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cli = Cli::try_parse_from([
            "radius-portal-server",
            "--radius-secret",
            "testing123",
            "--radius-timeout-secs",
            "0",
        ])
        .expect("arguments should parse");

        assert_eq!(cli.client_config(), Err(ConfigError::ZeroTimeout));
    }
}
