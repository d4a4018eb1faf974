use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::ConfigError;
use crate::source::parse_or;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            host: parse_or(lookup, "SERVER_HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: parse_or(lookup, "SERVER_PORT", 3000)?,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
