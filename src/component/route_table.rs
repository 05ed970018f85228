//! Route-table resolution: longest-prefix-match dispatch to typed targets

use tracing::debug;

use crate::client::{require, AnalyzerContext};
use crate::common::net::containing_prefix_len;
use crate::common::RoutingTarget;
use crate::error::{Error, Result};
use crate::model::{Route, RouteTable};

use super::gateway::{
    CarrierGatewayHop, EgressOnlyGatewayHop, InternetGatewayHop, LocalGatewayHop, NatGatewayHop,
};
use super::ip::IpTargetHop;
use super::peering::VpcPeeringHop;
use super::source::EniHop;
use super::transit_gateway::TransitGatewayHop;
use super::vpn::VpnGatewayHop;
use super::{account_or, Component};

/// Route-table hop: pick the most specific matching route, then construct
/// the component its target type names.
#[derive(Debug, Clone)]
pub struct RouteTableHop {
    pub table: RouteTable,
    pub account: String,
}

impl RouteTableHop {
    pub fn new(table: RouteTable, account: impl Into<String>) -> Self {
        Self {
            table,
            account: account.into(),
        }
    }

    pub(super) async fn next_hops(
        &self,
        target: &RoutingTarget,
        ctx: Option<&AnalyzerContext>,
    ) -> Result<Vec<Component>> {
        let ctx = require(ctx, "route table resolution")?;
        let Some(ip) = target.ip else {
            return Err(Error::blocked(
                &self.table.route_table_id,
                "no route to <unaddressed>".to_string(),
            ));
        };

        // Longest prefix wins; ties keep the first route in source order.
        let mut best: Option<(u8, &Route)> = None;
        for route in &self.table.routes {
            let effective = self.effective_prefix_len(route, ip, ctx).await?;
            if let Some(len) = effective {
                if best.map_or(true, |(best_len, _)| len > best_len) {
                    best = Some((len, route));
                }
            }
        }

        let Some((prefix_len, route)) = best else {
            return Err(Error::blocked(
                &self.table.route_table_id,
                format!("no route to {ip}"),
            ));
        };
        debug!(
            table = %self.table.route_table_id,
            target_type = %route.target_type,
            target_id = %route.target_id,
            prefix_len,
            "route selected"
        );

        self.dispatch(route, ip, ctx).await
    }

    /// Specificity of `route` for `ip`: the stated prefix for literal CIDR
    /// routes, or the longest matching entry of a resolved prefix list.
    async fn effective_prefix_len(
        &self,
        route: &Route,
        ip: std::net::IpAddr,
        ctx: &AnalyzerContext,
    ) -> Result<Option<u8>> {
        if let Some(cidr) = &route.destination_cidr {
            return Ok(containing_prefix_len(cidr, ip));
        }
        if let Some(cidr) = &route.destination_ipv6_cidr {
            return Ok(containing_prefix_len(cidr, ip));
        }
        if let Some(list_id) = &route.prefix_list_id {
            let list = ctx.client.get_prefix_list(list_id).await?;
            let longest = list
                .entries
                .iter()
                .filter_map(|entry| containing_prefix_len(entry, ip))
                .max();
            return Ok(longest);
        }
        Ok(None)
    }

    /// Constructor table, keyed by the route's target type tag.
    async fn dispatch(
        &self,
        route: &Route,
        ip: std::net::IpAddr,
        ctx: &AnalyzerContext,
    ) -> Result<Vec<Component>> {
        let id = route.target_id.as_str();
        let hop = match route.target_type.as_str() {
            "local" => {
                let vpc = ctx.client.get_vpc(&self.table.vpc_id).await?;
                if !vpc.contains(ip) {
                    return Err(Error::blocked(
                        &self.table.route_table_id,
                        format!("local route: {ip} is outside the VPC ranges of {}", vpc.vpc_id),
                    ));
                }
                match ctx.resolve_destination(ip).await? {
                    Some(component) => component,
                    None => Component::IpTarget(IpTargetHop::new(ip)),
                }
            }
            "internet-gateway" => {
                let gateway = ctx.client.get_internet_gateway(id).await?;
                let account = account_or(&gateway.account, ctx);
                Component::InternetGateway(InternetGatewayHop { gateway, account })
            }
            "nat-gateway" => {
                let gateway = ctx.client.get_nat_gateway(id).await?;
                let account = account_or(&gateway.account, ctx);
                Component::NatGateway(NatGatewayHop { gateway, account })
            }
            "egress-only-internet-gateway" => Component::EgressOnlyGateway(EgressOnlyGatewayHop {
                gateway_id: id.to_string(),
                account: ctx.account_id.clone(),
            }),
            "transit-gateway" => {
                let tgw = ctx.client.get_transit_gateway(id).await?;
                let account = account_or(&tgw.account, ctx);
                // The TGW reads routes as seen from this VPC's attachment;
                // absent one, all route tables stay visible.
                let ingress = match ctx
                    .client
                    .get_tgw_vpc_attachment(&self.table.vpc_id, &tgw.tgw_id)
                    .await
                {
                    Ok(attachment) => Some(attachment),
                    Err(crate::error::LookupError::NotFound { .. }) => None,
                    Err(err) => return Err(err.into()),
                };
                Component::TransitGateway(TransitGatewayHop {
                    tgw,
                    ingress_attachment: ingress,
                    account,
                })
            }
            "vpc-endpoint" => {
                let endpoint = ctx.client.get_vpc_endpoint(id).await?;
                let account = account_or(&endpoint.account, ctx);
                Component::VpcEndpoint(super::endpoint::VpcEndpointHop { endpoint, account })
            }
            "vpc-peering" => {
                let peering = ctx.client.get_vpc_peering(id).await?;
                let account = account_or(&peering.account, ctx);
                Component::VpcPeering(VpcPeeringHop { peering, account })
            }
            "vpn-gateway" => {
                let gateway = ctx.client.get_vpn_gateway(id).await?;
                let account = account_or(&gateway.account, ctx);
                Component::VpnGateway(VpnGatewayHop { gateway, account })
            }
            "network-interface" => {
                let eni = ctx.client.get_eni(id).await?;
                let account = account_or(&eni.account, ctx);
                Component::NetworkInterface(EniHop { eni, account })
            }
            "local-gateway" => {
                let gateway = ctx.client.get_local_gateway(id).await?;
                let account = account_or(&gateway.account, ctx);
                Component::LocalGateway(LocalGatewayHop { gateway, account })
            }
            "carrier-gateway" => {
                let gateway = ctx.client.get_carrier_gateway(id).await?;
                let account = account_or(&gateway.account, ctx);
                Component::CarrierGateway(CarrierGatewayHop { gateway, account })
            }
            other => {
                return Err(Error::blocked(
                    &self.table.route_table_id,
                    format!("unsupported route target type {other:?} for {id}"),
                ))
            }
        };
        Ok(vec![hop])
    }
}
