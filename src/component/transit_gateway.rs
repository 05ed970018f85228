//! Transit-gateway resolution: attachment-scoped route tables, then
//! longest-prefix-match over their active routes

use tracing::debug;

use crate::client::{require, AnalyzerContext};
use crate::common::net::{cidr_contains, containing_prefix_len};
use crate::common::RoutingTarget;
use crate::error::{Error, Result};
use crate::model::{TgwAttachment, TgwRoute, TransitGateway, Vpc};

use super::route_table::RouteTableHop;
use super::{account_or, Component};

/// Attachment states that can carry traffic. Pending/modifying entries are
/// skipped.
fn attachment_state_available(state: &str) -> bool {
    state.is_empty() || state == "available"
}

/// Transit-gateway hop. `ingress_attachment` scopes route-table visibility;
/// without one (forward simulation with no attachment context) every route
/// table is considered.
#[derive(Debug, Clone)]
pub struct TransitGatewayHop {
    pub tgw: TransitGateway,
    pub ingress_attachment: Option<TgwAttachment>,
    pub account: String,
}

impl TransitGatewayHop {
    pub fn new(tgw: TransitGateway, account: impl Into<String>) -> Self {
        Self {
            tgw,
            ingress_attachment: None,
            account: account.into(),
        }
    }

    pub fn with_ingress_attachment(mut self, attachment: TgwAttachment) -> Self {
        self.ingress_attachment = Some(attachment);
        self
    }

    pub(super) async fn next_hops(
        &self,
        target: &RoutingTarget,
        ctx: Option<&AnalyzerContext>,
    ) -> Result<Vec<Component>> {
        let ctx = require(ctx, "transit gateway resolution")?;
        let Some(ip) = target.ip else {
            return Err(self.no_route_error("<unaddressed>"));
        };

        // Route tables live with the TGW owner.
        let tgw_ctx = ctx.for_account(&self.account).await?;
        let tables = tgw_ctx.client.get_tgw_route_tables(&self.tgw.tgw_id).await?;

        let ingress_id = self
            .ingress_attachment
            .as_ref()
            .map(|attachment| attachment.attachment_id.as_str());

        // Phase (a): visibility. Phase (b): longest prefix over active CIDR
        // routes of the visible tables; ties keep the first route seen.
        let mut best: Option<(u8, &TgwRoute)> = None;
        for table in &tables {
            if let Some(id) = ingress_id {
                if !table.visible_to(id) {
                    continue;
                }
            }
            for route in &table.routes {
                if !route.state.is_empty() && route.state != "active" {
                    continue;
                }
                if let Some(len) = containing_prefix_len(&route.destination_cidr, ip) {
                    if best.map_or(true, |(best_len, _)| len > best_len) {
                        best = Some((len, route));
                    }
                }
            }
        }

        let winner = best
            .and_then(|(_, route)| {
                route
                    .attachments
                    .iter()
                    .find(|attachment| attachment_state_available(&attachment.state))
            })
            .ok_or_else(|| self.no_route_error(&ip.to_string()))?;
        debug!(
            tgw = %self.tgw.tgw_id,
            attachment = %winner.attachment_id,
            %ip,
            "transit gateway route selected"
        );

        let attachment = tgw_ctx
            .client
            .get_tgw_attachment(&winner.attachment_id)
            .await?;
        self.dispatch(attachment, ctx).await
    }

    fn no_route_error(&self, ip: &str) -> Error {
        let attachment = self
            .ingress_attachment
            .as_ref()
            .map(|attachment| attachment.attachment_id.as_str())
            .unwrap_or("<none>");
        Error::blocked(
            &self.tgw.tgw_id,
            format!("no transit gateway route to {ip} for attachment {attachment}"),
        )
    }

    /// Fetch the concrete target from the attachment owner's client and
    /// construct the continuation component.
    async fn dispatch(
        &self,
        attachment: TgwAttachment,
        ctx: &AnalyzerContext,
    ) -> Result<Vec<Component>> {
        let owner_ctx = ctx.for_account(&attachment.resource_account).await?;
        let hop = match attachment.resource_type.as_str() {
            "vpc" => {
                let vpc = owner_ctx.client.get_vpc(&attachment.resource_id).await?;
                let account = account_or(&vpc.account, &owner_ctx);
                Component::TgwVpcAttachment(TgwVpcAttachmentHop {
                    attachment,
                    vpc,
                    account,
                })
            }
            "peering" => {
                let peer = owner_ctx
                    .client
                    .get_transit_gateway(&attachment.resource_id)
                    .await?;
                let account = account_or(&peer.account, &owner_ctx);
                // Peer-side ingress attachment is unknown here; the peer
                // resolves with full visibility.
                Component::TransitGateway(TransitGatewayHop::new(peer, account))
            }
            "vpn" => {
                let gateway = owner_ctx
                    .client
                    .get_vpn_gateway(&attachment.resource_id)
                    .await?;
                let account = account_or(&gateway.account, &owner_ctx);
                Component::VpnGateway(super::vpn::VpnGatewayHop { gateway, account })
            }
            "direct-connect-gateway" => {
                let gateway = owner_ctx
                    .client
                    .get_direct_connect_gateway(&attachment.resource_id)
                    .await?;
                let account = account_or(&gateway.account, &owner_ctx);
                Component::DirectConnectGateway(super::vpn::DirectConnectGatewayHop {
                    gateway,
                    account,
                })
            }
            other => {
                return Err(Error::blocked(
                    &self.tgw.tgw_id,
                    format!(
                        "unsupported transit gateway attachment type {other:?} on {}",
                        attachment.attachment_id
                    ),
                ))
            }
        };
        Ok(vec![hop])
    }
}

/// Target-side entry through a VPC attachment: match the destination
/// against member subnets to pick the subnet's route table, falling back to
/// the VPC main route table.
#[derive(Debug, Clone)]
pub struct TgwVpcAttachmentHop {
    pub attachment: TgwAttachment,
    pub vpc: Vpc,
    pub account: String,
}

impl TgwVpcAttachmentHop {
    pub(super) async fn next_hops(
        &self,
        target: &RoutingTarget,
        ctx: Option<&AnalyzerContext>,
    ) -> Result<Vec<Component>> {
        let ctx = require(ctx, "transit gateway vpc attachment resolution")?;
        let ctx = ctx.for_account(&self.account).await?;

        let mut table_id = None;
        if let Some(ip) = target.ip {
            for subnet_id in &self.attachment.subnet_ids {
                let subnet = ctx.client.get_subnet(subnet_id).await?;
                let in_subnet = cidr_contains(&subnet.cidr_block, ip)
                    || subnet
                        .ipv6_cidr_block
                        .as_deref()
                        .is_some_and(|cidr| cidr_contains(cidr, ip));
                if in_subnet {
                    table_id = subnet.route_table_id.clone();
                    break;
                }
            }
        }

        let table_id = table_id.unwrap_or_else(|| self.vpc.main_route_table_id.clone());
        let table = ctx.client.get_route_table(&table_id).await?;
        let account = account_or(&table.account, &ctx);
        Ok(vec![Component::RouteTable(RouteTableHop::new(
            table, account,
        ))])
    }
}
