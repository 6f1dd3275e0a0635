//! Compose port specification parser
//!
//! Turns the short port syntax of a compose file into structured
//! [`PortMapping`]s that the manifest renderer can consume without ever
//! looking at the compose string again:
//!
//! | Compose                  | Mappings                                   |
//! |--------------------------|--------------------------------------------|
//! | `"80"`                   | container 80                               |
//! | `"8080:80"`              | host 8080 → container 80                   |
//! | `"8000-8001:80-81"`      | host 8000 → 80, host 8001 → 81             |
//! | `"127.0.0.1:8080:80"`    | host 8080 → 80, bound to 127.0.0.1         |
//! | `"53:53/udp"`            | any of the above with an explicit protocol |

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Transport protocol of a port mapping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
}

impl Protocol {
    /// Parse a compose protocol suffix, case-insensitively
    pub fn parse(input: &str) -> Option<Self> {
        match input.to_ascii_lowercase().as_str() {
            "tcp" => Some(Self::Tcp),
            "udp" => Some(Self::Udp),
            _ => None,
        }
    }

    /// Compose spelling (`tcp`, `udp`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }

    /// Kubernetes spelling (`TCP`, `UDP`)
    pub fn kubernetes_name(&self) -> &'static str {
        match self {
            Self::Tcp => "TCP",
            Self::Udp => "UDP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One concrete container port exposure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    /// Bind address on the host, if one was declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_address: Option<String>,

    /// External port, if one was declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_port: Option<u16>,

    /// Port the process inside the container listens on
    pub container_port: u16,

    pub protocol: Protocol,
}

impl PortMapping {
    /// A bare container port over TCP
    pub fn container(port: u16) -> Self {
        Self {
            host_address: None,
            host_port: None,
            container_port: port,
            protocol: Protocol::Tcp,
        }
    }

    /// Set the host port. `0` means no host port was declared.
    pub fn with_host_port(mut self, port: u16) -> Self {
        self.host_port = (port != 0).then_some(port);
        self
    }

    pub fn with_host_address(mut self, address: impl Into<String>) -> Self {
        self.host_address = Some(address.into());
        self
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Port exposed by the Kubernetes Service: the host port when one was
    /// declared, the container port otherwise.
    pub fn service_port(&self) -> u16 {
        self.host_port.unwrap_or(self.container_port)
    }
}

/// Port specification parse error
///
/// Every variant carries the full specification string as written in the
/// compose file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortParseError {
    #[error("unsupported protocol '{protocol}' in port spec: {spec}")]
    UnsupportedProtocol { spec: String, protocol: String },

    #[error("invalid port: {spec}")]
    InvalidPort { spec: String },

    #[error("invalid port range: {spec}")]
    InvalidPortRange { spec: String },

    #[error("mismatched port ranges: {spec}")]
    MismatchedRangeLength { spec: String },

    #[error("invalid port mapping: {spec}")]
    InvalidPortMapping { spec: String },

    #[error("invalid ip:host:container mapping: {spec}")]
    InvalidIpHostContainerMapping { spec: String },

    #[error("unsupported port format: {spec}")]
    UnsupportedPortFormat { spec: String },
}

impl PortParseError {
    /// The specification string that failed to parse
    pub fn spec(&self) -> &str {
        match self {
            Self::UnsupportedProtocol { spec, .. }
            | Self::InvalidPort { spec }
            | Self::InvalidPortRange { spec }
            | Self::MismatchedRangeLength { spec }
            | Self::InvalidPortMapping { spec }
            | Self::InvalidIpHostContainerMapping { spec }
            | Self::UnsupportedPortFormat { spec } => spec,
        }
    }
}

pub type Result<T> = std::result::Result<T, PortParseError>;

/// Parse one compose port specification
///
/// A range pair expands to one mapping per offset, in ascending order.
/// Every mapping inherits the protocol suffix of the specification.
pub fn parse_port_spec(spec: &str) -> Result<Vec<PortMapping>> {
    let input = spec.trim();
    let owned = || input.to_string();

    let (expr, protocol) = match input.rsplit_once('/') {
        Some((expr, suffix)) => {
            let protocol =
                Protocol::parse(suffix).ok_or_else(|| PortParseError::UnsupportedProtocol {
                    spec: owned(),
                    protocol: suffix.to_string(),
                })?;
            (expr, protocol)
        }
        None => (input, Protocol::Tcp),
    };

    let segments: Vec<&str> = expr.split(':').collect();

    let mappings = match segments.as_slice() {
        [container] => {
            let port = parse_container_port(container)
                .ok_or_else(|| PortParseError::InvalidPort { spec: owned() })?;
            vec![PortMapping::container(port)]
        }
        [host, container] if host.contains('-') || container.contains('-') => {
            parse_range_pair(input, host, container)?
        }
        [host, container] => match (parse_host_port(host), parse_container_port(container)) {
            (Some(host), Some(container)) => {
                vec![PortMapping::container(container).with_host_port(host)]
            }
            _ => return Err(PortParseError::InvalidPortMapping { spec: owned() }),
        },
        [address, host, container] => {
            match (parse_host_port(host), parse_container_port(container)) {
                (Some(host), Some(container)) => vec![
                    PortMapping::container(container)
                        .with_host_port(host)
                        .with_host_address(*address),
                ],
                _ => return Err(PortParseError::InvalidIpHostContainerMapping { spec: owned() }),
            }
        }
        _ => return Err(PortParseError::UnsupportedPortFormat { spec: owned() }),
    };

    Ok(mappings
        .into_iter()
        .map(|mapping| mapping.with_protocol(protocol))
        .collect())
}

/// `start-end:start-end`, paired element-wise
fn parse_range_pair(spec: &str, host: &str, container: &str) -> Result<Vec<PortMapping>> {
    let invalid = || PortParseError::InvalidPortRange {
        spec: spec.to_string(),
    };

    let (host_start, host_end) = parse_range(host).ok_or_else(invalid)?;
    let (container_start, container_end) = parse_range(container).ok_or_else(invalid)?;

    let span = host_end - host_start;
    if span != container_end - container_start {
        return Err(PortParseError::MismatchedRangeLength {
            spec: spec.to_string(),
        });
    }

    Ok((0..=span)
        .map(|offset| {
            PortMapping::container(container_start + offset).with_host_port(host_start + offset)
        })
        .collect())
}

fn parse_range(input: &str) -> Option<(u16, u16)> {
    let (start, end) = input.split_once('-')?;
    let start = parse_container_port(start)?;
    let end = parse_container_port(end)?;
    (start <= end).then_some((start, end))
}

/// Host ports may be `0`, meaning "not declared"
fn parse_host_port(input: &str) -> Option<u16> {
    input.parse().ok()
}

fn parse_container_port(input: &str) -> Option<u16> {
    input.parse::<u16>().ok().filter(|port| *port != 0)
}
