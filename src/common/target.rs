//! RoutingTarget - the unified traffic descriptor for hop decisions
//!
//! Every hop resolution depends ONLY on the RoutingTarget and the analyzer
//! context, never on live traffic.

use std::net::IpAddr;

/// Direction of the leg being simulated.
///
/// Selects which rule set a filter evaluates (a security group's outbound
/// rules vs. inbound rules, a NACL's egress vs. ingress entries).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outbound,
    Inbound,
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Outbound
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Outbound => write!(f, "outbound"),
            Direction::Inbound => write!(f, "inbound"),
        }
    }
}

/// Traffic descriptor threaded through every hop call.
///
/// Immutable per call; construct a new value (`flipped`) to simulate the
/// return path. The destination IP is optional because some bridge
/// components accept a descriptor before the concrete address is known and
/// reject it themselves.
#[derive(Debug, Clone)]
pub struct RoutingTarget {
    /// Destination IP the packet is addressed to
    pub ip: Option<IpAddr>,
    /// Destination port
    pub port: u16,
    /// Protocol name or number as given (tcp, udp, 6, -1, ...)
    pub protocol: String,
    /// Which rule set filters evaluate
    pub direction: Direction,
    /// Whether the source of this leg is a private address
    pub private_source: bool,
}

impl RoutingTarget {
    /// Create a new descriptor for a destination IP.
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip: Some(ip),
            port: 0,
            protocol: "tcp".to_string(),
            direction: Direction::Outbound,
            private_source: false,
        }
    }

    /// Create a descriptor with no destination address yet.
    pub fn unaddressed() -> Self {
        Self {
            ip: None,
            port: 0,
            protocol: "tcp".to_string(),
            direction: Direction::Outbound,
            private_source: false,
        }
    }

    /// Builder: set destination port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Builder: set protocol
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    /// Builder: set direction
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Builder: mark the source of this leg as private
    pub fn with_private_source(mut self, private: bool) -> Self {
        self.private_source = private;
        self
    }

    /// Descriptor for the reverse leg: same tuple, opposite direction.
    pub fn flipped(&self) -> Self {
        let mut flipped = self.clone();
        flipped.direction = match self.direction {
            Direction::Outbound => Direction::Inbound,
            Direction::Inbound => Direction::Outbound,
        };
        flipped
    }

    /// Destination rendered for error messages ("<unaddressed>" when absent).
    pub fn ip_display(&self) -> String {
        match self.ip {
            Some(ip) => ip.to_string(),
            None => "<unaddressed>".to_string(),
        }
    }
}

impl std::fmt::Display for RoutingTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}/{} ({})",
            self.ip_display(),
            self.port,
            self.protocol,
            self.direction
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flipped_reverses_direction_only() {
        let target = RoutingTarget::new("10.0.1.50".parse().unwrap())
            .with_port(443)
            .with_protocol("tcp");
        let back = target.flipped();
        assert_eq!(back.direction, Direction::Inbound);
        assert_eq!(back.ip, target.ip);
        assert_eq!(back.port, 443);
        assert_eq!(back.flipped().direction, Direction::Outbound);
    }

    #[test]
    fn display_includes_tuple_and_direction() {
        let target = RoutingTarget::new("8.8.8.8".parse().unwrap()).with_port(53);
        assert_eq!(target.to_string(), "8.8.8.8:53/tcp (outbound)");
    }
}
