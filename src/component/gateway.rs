//! Edge gateways: thin passthrough components with one invariant each
//!
//! Gateways validate direction and address-family/externality constraints,
//! then carry the destination forward as the generic IP leaf. They never
//! resolve a concrete downstream resource themselves.

use crate::common::net::{is_externally_routable, is_ipv6};
use crate::common::{Direction, RoutingTarget};
use crate::error::{Error, Result};
use crate::model::{CarrierGateway, InternetGateway, LocalGateway, NatGateway};

use super::ip::IpTargetHop;
use super::Component;

fn forward(target: &RoutingTarget) -> Vec<Component> {
    match target.ip {
        Some(ip) => vec![Component::IpTarget(IpTargetHop::new(ip))],
        None => vec![],
    }
}

/// Internet gateway hop.
#[derive(Debug, Clone)]
pub struct InternetGatewayHop {
    pub gateway: InternetGateway,
    pub account: String,
}

impl InternetGatewayHop {
    pub(super) fn next_hops(&self, target: &RoutingTarget) -> Result<Vec<Component>> {
        match target.direction {
            Direction::Outbound => {
                let external = target.ip.is_some_and(is_externally_routable);
                if !external {
                    return Err(Error::blocked(
                        &self.gateway.gateway_id,
                        format!(
                            "internet gateway cannot reach non-routable address {}",
                            target.ip_display()
                        ),
                    ));
                }
            }
            Direction::Inbound => {
                if target.private_source {
                    return Err(Error::blocked(
                        &self.gateway.gateway_id,
                        "internet gateway does not accept inbound traffic from a private source"
                            .to_string(),
                    ));
                }
            }
        }
        Ok(forward(target))
    }
}

/// NAT gateway hop.
#[derive(Debug, Clone)]
pub struct NatGatewayHop {
    pub gateway: NatGateway,
    pub account: String,
}

impl NatGatewayHop {
    pub(super) fn next_hops(&self, target: &RoutingTarget) -> Result<Vec<Component>> {
        if !self.gateway.state.is_empty() && self.gateway.state != "available" {
            return Err(Error::blocked(
                &self.gateway.gateway_id,
                format!("nat gateway is not available (state {})", self.gateway.state),
            ));
        }
        if target.direction == Direction::Inbound {
            return Err(Error::blocked(
                &self.gateway.gateway_id,
                "nat gateway does not accept unsolicited inbound traffic".to_string(),
            ));
        }
        let external = target.ip.is_some_and(is_externally_routable);
        if !external {
            return Err(Error::blocked(
                &self.gateway.gateway_id,
                format!(
                    "nat gateway requires an externally routable destination, got {}",
                    target.ip_display()
                ),
            ));
        }
        Ok(forward(target))
    }
}

/// Egress-only internet gateway hop: IPv6, outbound only.
#[derive(Debug, Clone)]
pub struct EgressOnlyGatewayHop {
    pub gateway_id: String,
    pub account: String,
}

impl EgressOnlyGatewayHop {
    pub(super) fn next_hops(&self, target: &RoutingTarget) -> Result<Vec<Component>> {
        if target.direction == Direction::Inbound {
            return Err(Error::blocked(
                &self.gateway_id,
                "egress-only internet gateway is outbound only".to_string(),
            ));
        }
        if !target.ip.is_some_and(is_ipv6) {
            return Err(Error::blocked(
                &self.gateway_id,
                format!(
                    "egress-only internet gateway requires an IPv6 destination, got {}",
                    target.ip_display()
                ),
            ));
        }
        Ok(forward(target))
    }
}

/// Carrier gateway hop (wavelength zones).
#[derive(Debug, Clone)]
pub struct CarrierGatewayHop {
    pub gateway: CarrierGateway,
    pub account: String,
}

impl CarrierGatewayHop {
    pub(super) fn next_hops(&self, target: &RoutingTarget) -> Result<Vec<Component>> {
        if !self.gateway.state.is_empty() && self.gateway.state != "available" {
            return Err(Error::blocked(
                &self.gateway.gateway_id,
                format!(
                    "carrier gateway is not available (state {})",
                    self.gateway.state
                ),
            ));
        }
        let carrier_routable = target.ip.is_some_and(is_externally_routable);
        if !carrier_routable {
            return Err(Error::blocked(
                &self.gateway.gateway_id,
                format!(
                    "carrier gateway cannot reach non-routable address {}",
                    target.ip_display()
                ),
            ));
        }
        Ok(forward(target))
    }
}

/// Local gateway hop (outposts).
#[derive(Debug, Clone)]
pub struct LocalGatewayHop {
    pub gateway: LocalGateway,
    pub account: String,
}

impl LocalGatewayHop {
    pub(super) fn next_hops(&self, target: &RoutingTarget) -> Result<Vec<Component>> {
        if !self.gateway.state.is_empty() && self.gateway.state != "available" {
            return Err(Error::blocked(
                &self.gateway.gateway_id,
                format!(
                    "local gateway is not available (state {})",
                    self.gateway.state
                ),
            ));
        }
        Ok(forward(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn igw() -> InternetGatewayHop {
        InternetGatewayHop {
            gateway: InternetGateway {
                gateway_id: "igw-1".into(),
                ..Default::default()
            },
            account: "111".into(),
        }
    }

    #[test]
    fn internet_gateway_rejects_private_destination_outbound() {
        let target = RoutingTarget::new("10.0.1.50".parse().unwrap());
        assert!(igw().next_hops(&target).unwrap_err().is_blocked());

        let target = RoutingTarget::new("8.8.8.8".parse().unwrap());
        let hops = igw().next_hops(&target).unwrap();
        assert_eq!(hops[0].kind(), "ip-target");
    }

    #[test]
    fn internet_gateway_rejects_inbound_from_private_source() {
        let target = RoutingTarget::new("10.0.1.50".parse().unwrap())
            .with_direction(Direction::Inbound)
            .with_private_source(true);
        assert!(igw().next_hops(&target).unwrap_err().is_blocked());
    }

    #[test]
    fn nat_gateway_rejects_unsolicited_inbound() {
        let hop = NatGatewayHop {
            gateway: NatGateway {
                gateway_id: "nat-1".into(),
                state: "available".into(),
                ..Default::default()
            },
            account: "111".into(),
        };
        let inbound =
            RoutingTarget::new("8.8.8.8".parse().unwrap()).with_direction(Direction::Inbound);
        assert!(hop.next_hops(&inbound).unwrap_err().is_blocked());

        let private_out = RoutingTarget::new("192.168.1.1".parse().unwrap());
        assert!(hop.next_hops(&private_out).unwrap_err().is_blocked());

        let public_out = RoutingTarget::new("8.8.8.8".parse().unwrap());
        assert!(hop.next_hops(&public_out).is_ok());
    }

    #[test]
    fn egress_only_gateway_is_ipv6_outbound_only() {
        let hop = EgressOnlyGatewayHop {
            gateway_id: "eigw-1".into(),
            account: "111".into(),
        };
        let v4 = RoutingTarget::new("8.8.8.8".parse().unwrap());
        assert!(hop.next_hops(&v4).unwrap_err().is_blocked());

        let v6 = RoutingTarget::new("2001:4860:4860::8888".parse().unwrap());
        assert!(hop.next_hops(&v6).is_ok());

        let v6_in = RoutingTarget::new("2001:4860:4860::8888".parse().unwrap())
            .with_direction(Direction::Inbound);
        assert!(hop.next_hops(&v6_in).unwrap_err().is_blocked());
    }
}
