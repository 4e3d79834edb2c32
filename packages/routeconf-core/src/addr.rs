//! Endpoint address resolution.
//!
//! Turns `host:port` text into a [`SocketAddr`] without ever consulting DNS:
//! routing records name concrete machines, so the host must already be a
//! literal IPv4 or IPv6 address. The port may be decimal or a well-known
//! service name looked up in a [`ServiceRegistry`].

use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AddrError;

/// Upper bound for decimal port parsing. Large enough to report out-of-range
/// ports as such, small enough to never overflow.
const DTOI_BIG: u32 = 0xFF_FFFF;

const MAX_PORT: u32 = 0xFFFF;

/// Network type used to pick a service-name table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Tcp,
    Udp,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Tcp => "tcp",
            Network::Udp => "udp",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" => Ok(Network::Tcp),
            "udp" => Ok(Network::Udp),
            other => Err(format!("unknown network {other:?}")),
        }
    }
}

/// Strict decimal parse: every character must be a digit and the value must
/// stay below [`DTOI_BIG`].
fn dtoi(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let mut n: u32 = 0;
    for b in s.bytes() {
        if !b.is_ascii_digit() {
            return None;
        }
        n = n * 10 + u32::from(b - b'0');
        if n >= DTOI_BIG {
            return None;
        }
    }
    Some(n)
}

/// Built-in service names, available even without a platform services file.
const BUILTIN_SERVICES: &[(Network, &str, u32)] = &[
    (Network::Tcp, "ftp", 21),
    (Network::Tcp, "ftps", 990),
    (Network::Tcp, "gopher", 70),
    (Network::Tcp, "http", 80),
    (Network::Tcp, "https", 443),
    (Network::Tcp, "imap2", 143),
    (Network::Tcp, "imap3", 220),
    (Network::Tcp, "imaps", 993),
    (Network::Tcp, "pop3", 110),
    (Network::Tcp, "pop3s", 995),
    (Network::Tcp, "smtp", 25),
    (Network::Tcp, "ssh", 22),
    (Network::Tcp, "telnet", 23),
    (Network::Tcp, "postgresql", 5432),
    (Network::Udp, "domain", 53),
];

/// Service-name to port table, keyed by network.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    ports: HashMap<(Network, String), u32>,
}

impl ServiceRegistry {
    /// An empty registry; every name lookup fails.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in table only.
    pub fn builtin() -> Self {
        let ports = BUILTIN_SERVICES
            .iter()
            .map(|&(net, name, port)| ((net, name.to_string()), port))
            .collect();
        Self { ports }
    }

    /// Parses `/etc/services`-style text on top of the built-in table.
    ///
    /// Lines are `name port/protocol [alias...]` with `#` comments. Unknown
    /// protocols, non-decimal ports and port 0 are skipped. The first entry
    /// seen for a name wins.
    pub fn from_services_text(text: &str) -> Self {
        let mut parsed: HashMap<(Network, String), u32> = HashMap::new();
        for line in text.lines() {
            let line = match line.find('#') {
                Some(i) => &line[..i],
                None => line,
            };
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 2 {
                continue;
            }
            let Some((port, proto)) = fields[1].split_once('/') else {
                continue;
            };
            let (Some(port), Ok(net)) = (dtoi(port), proto.parse::<Network>()) else {
                continue;
            };
            if port == 0 {
                continue;
            }
            for name in std::iter::once(fields[0]).chain(fields[2..].iter().copied()) {
                parsed
                    .entry((net, name.to_ascii_lowercase()))
                    .or_insert(port);
            }
        }

        let mut registry = Self::builtin();
        registry.ports.extend(parsed);
        registry
    }

    /// Reads a services file and layers it over the built-in table.
    pub fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_services_text(&text))
    }

    /// Case-insensitive lookup.
    pub fn lookup(&self, network: Network, service: &str) -> Option<u32> {
        self.ports
            .get(&(network, service.to_ascii_lowercase()))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

/// Splits `host:port` on the last colon, honouring `[v6]:port` brackets.
pub fn split_host_port(hostport: &str) -> Result<(&str, &str), AddrError> {
    let addr = || hostport.to_string();

    let Some(i) = hostport.rfind(':') else {
        return Err(AddrError::MissingPort { addr: addr() });
    };

    let (host, j, k) = if hostport.starts_with('[') {
        let Some(end) = hostport.find(']') else {
            return Err(AddrError::MissingBracket { addr: addr() });
        };
        if end + 1 == hostport.len() {
            // nothing after ']'
            return Err(AddrError::MissingPort { addr: addr() });
        } else if end + 1 != i {
            // ']' not followed directly by the last ':'
            if hostport.as_bytes()[end + 1] == b':' {
                return Err(AddrError::TooManyColons { addr: addr() });
            }
            return Err(AddrError::MissingPort { addr: addr() });
        }
        (&hostport[1..end], 1, end + 1)
    } else {
        let host = &hostport[..i];
        if host.contains(':') {
            return Err(AddrError::TooManyColons { addr: addr() });
        }
        (host, 0, 0)
    };

    if hostport[j..].contains('[') {
        return Err(AddrError::UnexpectedBracket { addr: addr(), ch: '[' });
    }
    if hostport[k..].contains(']') {
        return Err(AddrError::UnexpectedBracket { addr: addr(), ch: ']' });
    }

    Ok((host, &hostport[i + 1..]))
}

/// Resolves `host:port` text into socket addresses for one network type.
#[derive(Debug, Clone)]
pub struct AddrResolver {
    network: Network,
    services: ServiceRegistry,
}

/// TCP with the built-in service table only. Use
/// [`crate::config::AnalyzerConfig::build_resolver`] to include the platform
/// services file.
impl Default for AddrResolver {
    fn default() -> Self {
        Self::new(Network::Tcp, ServiceRegistry::builtin())
    }
}

impl AddrResolver {
    pub fn new(network: Network, services: ServiceRegistry) -> Self {
        Self { network, services }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn services(&self) -> &ServiceRegistry {
        &self.services
    }

    /// Resolves `host:port`. The host must be a literal IP; the port is
    /// decimal or a service name known for this resolver's network.
    pub fn resolve(&self, hostport: &str) -> Result<SocketAddr, AddrError> {
        let (host, port) = split_host_port(hostport)?;

        let ip: IpAddr = host.parse().map_err(|_| AddrError::InvalidIp {
            host: host.to_string(),
        })?;

        let number = match dtoi(port) {
            Some(n) => n,
            None => self
                .services
                .lookup(self.network, port)
                .ok_or_else(|| AddrError::UnknownPort {
                    network: self.network.to_string(),
                    service: port.to_string(),
                })?,
        };

        if number > MAX_PORT {
            return Err(AddrError::PortRange {
                port: port.to_string(),
            });
        }

        Ok(SocketAddr::new(ip, number as u16))
    }
}
