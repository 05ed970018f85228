//! On-prem edges: VPN gateways/connections and Direct Connect gateways

use crate::client::{require, AnalyzerContext};
use crate::common::net::cidr_contains;
use crate::common::RoutingTarget;
use crate::error::{Error, Result};
use crate::model::{DirectConnectGateway, VpnConnection, VpnGateway};

use super::ip::IpTargetHop;
use super::Component;

/// VPN gateway hop: fans out to its available connections.
#[derive(Debug, Clone)]
pub struct VpnGatewayHop {
    pub gateway: VpnGateway,
    pub account: String,
}

impl VpnGatewayHop {
    pub(super) async fn next_hops(
        &self,
        _target: &RoutingTarget,
        ctx: Option<&AnalyzerContext>,
    ) -> Result<Vec<Component>> {
        if !self.gateway.state.is_empty() && self.gateway.state != "available" {
            return Err(Error::blocked(
                &self.gateway.gateway_id,
                format!("vpn gateway is not available (state {})", self.gateway.state),
            ));
        }
        let ctx = require(ctx, "vpn gateway resolution")?;
        let connections = ctx
            .client
            .get_vpn_connections(&self.gateway.gateway_id)
            .await?;
        let hops: Vec<Component> = connections
            .into_iter()
            .filter(|connection| {
                connection.state.is_empty() || connection.state == "available"
            })
            .map(|connection| {
                Component::VpnConnection(VpnConnectionHop {
                    connection,
                    account: self.account.clone(),
                })
            })
            .collect();
        if hops.is_empty() {
            return Err(Error::blocked(
                &self.gateway.gateway_id,
                "vpn gateway has no available connections".to_string(),
            ));
        }
        Ok(hops)
    }
}

/// One VPN connection: static-route prefix allow-list, then the leaf.
#[derive(Debug, Clone)]
pub struct VpnConnectionHop {
    pub connection: VpnConnection,
    pub account: String,
}

impl VpnConnectionHop {
    pub(super) fn next_hops(&self, target: &RoutingTarget) -> Result<Vec<Component>> {
        if !self.connection.state.is_empty() && self.connection.state != "available" {
            return Err(Error::blocked(
                &self.connection.connection_id,
                format!(
                    "vpn connection is not available (state {})",
                    self.connection.state
                ),
            ));
        }
        let Some(ip) = target.ip else {
            return Err(Error::blocked(
                &self.connection.connection_id,
                "vpn connection requires a destination address".to_string(),
            ));
        };
        let allowed = self.connection.static_routes.is_empty()
            || self
                .connection
                .static_routes
                .iter()
                .any(|cidr| cidr_contains(cidr, ip));
        if !allowed {
            return Err(Error::blocked(
                &self.connection.connection_id,
                format!("{ip} is outside the static routes of the vpn connection"),
            ));
        }
        Ok(vec![Component::IpTarget(IpTargetHop::new(ip))])
    }
}

/// Direct Connect gateway hop: state + per-attachment allowed prefixes.
#[derive(Debug, Clone)]
pub struct DirectConnectGatewayHop {
    pub gateway: DirectConnectGateway,
    pub account: String,
}

impl DirectConnectGatewayHop {
    pub(super) async fn next_hops(
        &self,
        target: &RoutingTarget,
        ctx: Option<&AnalyzerContext>,
    ) -> Result<Vec<Component>> {
        if !self.gateway.state.is_empty() && self.gateway.state != "available" {
            return Err(Error::blocked(
                &self.gateway.gateway_id,
                format!(
                    "direct connect gateway is not available (state {})",
                    self.gateway.state
                ),
            ));
        }
        let Some(ip) = target.ip else {
            return Err(Error::blocked(
                &self.gateway.gateway_id,
                "direct connect gateway requires a destination address".to_string(),
            ));
        };
        let ctx = require(ctx, "direct connect resolution")?;
        let attachments = ctx
            .client
            .get_dx_gateway_attachments(&self.gateway.gateway_id)
            .await?;
        let usable = attachments.iter().any(|attachment| {
            let available =
                attachment.state.is_empty() || attachment.state == "available";
            let prefix_ok = attachment.allowed_prefixes.is_empty()
                || attachment
                    .allowed_prefixes
                    .iter()
                    .any(|cidr| cidr_contains(cidr, ip));
            available && prefix_ok
        });
        if !usable {
            return Err(Error::blocked(
                &self.gateway.gateway_id,
                format!("no direct connect attachment allows {ip}"),
            ));
        }
        Ok(vec![Component::IpTarget(IpTargetHop::new(ip))])
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::testing::MockCloud;
    use crate::model::DxGatewayAttachment;

    #[test]
    fn vpn_connection_enforces_static_routes() {
        let hop = VpnConnectionHop {
            connection: VpnConnection {
                connection_id: "vpn-1".into(),
                state: "available".into(),
                static_routes: vec!["192.168.0.0/16".into()],
                ..Default::default()
            },
            account: "111".into(),
        };
        let inside = RoutingTarget::new("192.168.1.10".parse().unwrap());
        assert!(hop.next_hops(&inside).is_ok());

        let outside = RoutingTarget::new("172.16.0.10".parse().unwrap());
        assert!(hop.next_hops(&outside).unwrap_err().is_blocked());
    }

    #[tokio::test]
    async fn vpn_gateway_fans_out_to_available_connections() {
        let mut cloud = MockCloud::default();
        cloud.vpn_connections.insert(
            "vgw-1".into(),
            vec![
                VpnConnection {
                    connection_id: "vpn-up".into(),
                    state: "available".into(),
                    ..Default::default()
                },
                VpnConnection {
                    connection_id: "vpn-down".into(),
                    state: "deleting".into(),
                    ..Default::default()
                },
            ],
        );
        let ctx = AnalyzerContext::new("111", Arc::new(cloud));
        let hop = VpnGatewayHop {
            gateway: VpnGateway {
                gateway_id: "vgw-1".into(),
                state: "available".into(),
                ..Default::default()
            },
            account: "111".into(),
        };
        let target = RoutingTarget::new("192.168.1.10".parse().unwrap());
        let hops = hop.next_hops(&target, Some(&ctx)).await.unwrap();
        assert_eq!(hops.len(), 1);
        assert_eq!(hops[0].id(), "vpn-up");
    }

    #[tokio::test]
    async fn direct_connect_prefix_allow_list() {
        let mut cloud = MockCloud::default();
        cloud.dx_attachments.insert(
            "dxgw-1".into(),
            vec![DxGatewayAttachment {
                attachment_id: "dxatt-1".into(),
                gateway_id: "dxgw-1".into(),
                state: "available".into(),
                allowed_prefixes: vec!["10.20.0.0/16".into()],
            }],
        );
        let ctx = AnalyzerContext::new("111", Arc::new(cloud));
        let hop = DirectConnectGatewayHop {
            gateway: DirectConnectGateway {
                gateway_id: "dxgw-1".into(),
                state: "available".into(),
                ..Default::default()
            },
            account: "111".into(),
        };

        let inside = RoutingTarget::new("10.20.1.1".parse().unwrap());
        assert!(hop.next_hops(&inside, Some(&ctx)).await.is_ok());

        let outside = RoutingTarget::new("10.30.1.1".parse().unwrap());
        assert!(hop
            .next_hops(&outside, Some(&ctx))
            .await
            .unwrap_err()
            .is_blocked());
    }
}
