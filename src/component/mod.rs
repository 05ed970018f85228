//! Component graph - the uniform hop-resolution contract
//!
//! Every network primitive is one variant of the closed [`Component`] enum,
//! dispatched through a single match in [`Component::next_hops`]:
//!
//! - `Ok(vec![])` - a satisfied filter or a true terminal; this branch of
//!   the traversal is complete.
//! - `Ok(hops)` - traversal continues in parallel down each returned node
//!   (multi-subnet fan-out, target-group members).
//! - `Err(Error::Blocked { .. })` - a deterministic stop attributed to this
//!   component.
//! - `Err(Error::Lookup(_))` - the branch is inconclusive, not blocked.
//!
//! Components are constructed fresh per hop from client snapshots and are
//! never reused across traversals. Two components are the same node iff
//! their ids match; the traversal driver keys its visited set on `id()`.

mod api_gateway;
mod balance;
mod endpoint;
mod filter;
mod gateway;
mod ip;
mod peering;
mod route_table;
mod source;
mod subnet;
mod transit_gateway;
mod vpn;

pub use api_gateway::{ApiGatewayHop, VpcLinkHop};
pub use balance::{LoadBalancerHop, TargetGroupHop};
pub use endpoint::VpcEndpointHop;
pub use filter::{FirewallFilter, NaclFilter, SecurityGroupFilter};
pub use gateway::{
    CarrierGatewayHop, EgressOnlyGatewayHop, InternetGatewayHop, LocalGatewayHop, NatGatewayHop,
};
pub use ip::IpTargetHop;
pub use peering::VpcPeeringHop;
pub use route_table::RouteTableHop;
pub use source::{Ec2Hop, EksPodHop, ElastiCacheHop, EniHop, LambdaHop, RdsHop};
pub use subnet::SubnetHop;
pub use transit_gateway::{TgwVpcAttachmentHop, TransitGatewayHop};
pub use vpn::{DirectConnectGatewayHop, VpnConnectionHop, VpnGatewayHop};

use crate::client::AnalyzerContext;
use crate::common::RoutingTarget;
use crate::error::Result;

/// One node of the component graph.
#[derive(Debug, Clone)]
pub enum Component {
    SecurityGroup(SecurityGroupFilter),
    NetworkAcl(NaclFilter),
    NetworkFirewall(FirewallFilter),
    Subnet(SubnetHop),
    RouteTable(RouteTableHop),
    TransitGateway(TransitGatewayHop),
    TgwVpcAttachment(TgwVpcAttachmentHop),
    InternetGateway(InternetGatewayHop),
    NatGateway(NatGatewayHop),
    EgressOnlyGateway(EgressOnlyGatewayHop),
    CarrierGateway(CarrierGatewayHop),
    LocalGateway(LocalGatewayHop),
    VpnGateway(VpnGatewayHop),
    VpnConnection(VpnConnectionHop),
    DirectConnectGateway(DirectConnectGatewayHop),
    VpcPeering(VpcPeeringHop),
    NetworkInterface(EniHop),
    VpcEndpoint(VpcEndpointHop),
    ApiGateway(ApiGatewayHop),
    VpcLink(VpcLinkHop),
    LoadBalancer(LoadBalancerHop),
    TargetGroup(TargetGroupHop),
    Ec2Instance(Ec2Hop),
    RdsInstance(RdsHop),
    Lambda(LambdaHop),
    EksPod(EksPodHop),
    ElastiCache(ElastiCacheHop),
    IpTarget(IpTargetHop),
}

impl Component {
    /// Resolve the next hop(s) for `target`.
    pub async fn next_hops(
        &self,
        target: &RoutingTarget,
        ctx: Option<&AnalyzerContext>,
    ) -> Result<Vec<Component>> {
        match self {
            Component::SecurityGroup(hop) => hop.next_hops(target, ctx).await,
            Component::NetworkAcl(hop) => hop.next_hops(target),
            Component::NetworkFirewall(hop) => hop.next_hops(target),
            Component::Subnet(hop) => hop.next_hops(target, ctx).await,
            Component::RouteTable(hop) => hop.next_hops(target, ctx).await,
            Component::TransitGateway(hop) => hop.next_hops(target, ctx).await,
            Component::TgwVpcAttachment(hop) => hop.next_hops(target, ctx).await,
            Component::InternetGateway(hop) => hop.next_hops(target),
            Component::NatGateway(hop) => hop.next_hops(target),
            Component::EgressOnlyGateway(hop) => hop.next_hops(target),
            Component::CarrierGateway(hop) => hop.next_hops(target),
            Component::LocalGateway(hop) => hop.next_hops(target),
            Component::VpnGateway(hop) => hop.next_hops(target, ctx).await,
            Component::VpnConnection(hop) => hop.next_hops(target),
            Component::DirectConnectGateway(hop) => hop.next_hops(target, ctx).await,
            Component::VpcPeering(hop) => hop.next_hops(target, ctx).await,
            Component::NetworkInterface(hop) => hop.next_hops(target, ctx).await,
            Component::VpcEndpoint(hop) => hop.next_hops(target, ctx).await,
            Component::ApiGateway(hop) => hop.next_hops(target, ctx).await,
            Component::VpcLink(hop) => hop.next_hops(target, ctx).await,
            Component::LoadBalancer(hop) => hop.next_hops(target, ctx).await,
            Component::TargetGroup(hop) => hop.next_hops(target, ctx).await,
            Component::Ec2Instance(hop) => hop.next_hops(target, ctx).await,
            Component::RdsInstance(hop) => hop.next_hops(target, ctx).await,
            Component::Lambda(hop) => hop.next_hops(target, ctx).await,
            Component::EksPod(hop) => hop.next_hops(target, ctx).await,
            Component::ElastiCache(hop) => hop.next_hops(target, ctx).await,
            Component::IpTarget(hop) => hop.next_hops(),
        }
    }

    /// Globally unique, account-scoped id. Cycle detection keys on this.
    pub fn id(&self) -> &str {
        match self {
            Component::SecurityGroup(hop) => &hop.group.group_id,
            Component::NetworkAcl(hop) => &hop.acl.acl_id,
            Component::NetworkFirewall(hop) => &hop.firewall.firewall_id,
            Component::Subnet(hop) => &hop.subnet.subnet_id,
            Component::RouteTable(hop) => &hop.table.route_table_id,
            Component::TransitGateway(hop) => &hop.tgw.tgw_id,
            Component::TgwVpcAttachment(hop) => &hop.attachment.attachment_id,
            Component::InternetGateway(hop) => &hop.gateway.gateway_id,
            Component::NatGateway(hop) => &hop.gateway.gateway_id,
            Component::EgressOnlyGateway(hop) => &hop.gateway_id,
            Component::CarrierGateway(hop) => &hop.gateway.gateway_id,
            Component::LocalGateway(hop) => &hop.gateway.gateway_id,
            Component::VpnGateway(hop) => &hop.gateway.gateway_id,
            Component::VpnConnection(hop) => &hop.connection.connection_id,
            Component::DirectConnectGateway(hop) => &hop.gateway.gateway_id,
            Component::VpcPeering(hop) => &hop.peering.peering_id,
            Component::NetworkInterface(hop) => &hop.eni.eni_id,
            Component::VpcEndpoint(hop) => &hop.endpoint.endpoint_id,
            Component::ApiGateway(hop) => &hop.api.api_id,
            Component::VpcLink(hop) => &hop.link.link_id,
            Component::LoadBalancer(hop) => &hop.balancer.id,
            Component::TargetGroup(hop) => &hop.group.arn,
            Component::Ec2Instance(hop) => &hop.instance.instance_id,
            Component::RdsInstance(hop) => &hop.instance.instance_id,
            Component::Lambda(hop) => &hop.function.function_name,
            Component::EksPod(hop) => &hop.pod.pod_name,
            Component::ElastiCache(hop) => &hop.cluster.cluster_id,
            Component::IpTarget(hop) => &hop.id,
        }
    }

    /// Account that owns this node.
    pub fn account(&self) -> &str {
        match self {
            Component::SecurityGroup(hop) => &hop.account,
            Component::NetworkAcl(hop) => &hop.account,
            Component::NetworkFirewall(hop) => &hop.account,
            Component::Subnet(hop) => &hop.account,
            Component::RouteTable(hop) => &hop.account,
            Component::TransitGateway(hop) => &hop.account,
            Component::TgwVpcAttachment(hop) => &hop.account,
            Component::InternetGateway(hop) => &hop.account,
            Component::NatGateway(hop) => &hop.account,
            Component::EgressOnlyGateway(hop) => &hop.account,
            Component::CarrierGateway(hop) => &hop.account,
            Component::LocalGateway(hop) => &hop.account,
            Component::VpnGateway(hop) => &hop.account,
            Component::VpnConnection(hop) => &hop.account,
            Component::DirectConnectGateway(hop) => &hop.account,
            Component::VpcPeering(hop) => &hop.account,
            Component::NetworkInterface(hop) => &hop.account,
            Component::VpcEndpoint(hop) => &hop.account,
            Component::ApiGateway(hop) => &hop.account,
            Component::VpcLink(hop) => &hop.account,
            Component::LoadBalancer(hop) => &hop.account,
            Component::TargetGroup(hop) => &hop.account,
            Component::Ec2Instance(hop) => &hop.account,
            Component::RdsInstance(hop) => &hop.account,
            Component::Lambda(hop) => &hop.account,
            Component::EksPod(hop) => &hop.account,
            Component::ElastiCache(hop) => &hop.account,
            Component::IpTarget(hop) => &hop.account,
        }
    }

    /// Kind tag, for rendering and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Component::SecurityGroup(_) => "security-group",
            Component::NetworkAcl(_) => "network-acl",
            Component::NetworkFirewall(_) => "network-firewall",
            Component::Subnet(_) => "subnet",
            Component::RouteTable(_) => "route-table",
            Component::TransitGateway(_) => "transit-gateway",
            Component::TgwVpcAttachment(_) => "transit-gateway-vpc-attachment",
            Component::InternetGateway(_) => "internet-gateway",
            Component::NatGateway(_) => "nat-gateway",
            Component::EgressOnlyGateway(_) => "egress-only-internet-gateway",
            Component::CarrierGateway(_) => "carrier-gateway",
            Component::LocalGateway(_) => "local-gateway",
            Component::VpnGateway(_) => "vpn-gateway",
            Component::VpnConnection(_) => "vpn-connection",
            Component::DirectConnectGateway(_) => "direct-connect-gateway",
            Component::VpcPeering(_) => "vpc-peering",
            Component::NetworkInterface(_) => "network-interface",
            Component::VpcEndpoint(hop) => hop.kind(),
            Component::ApiGateway(_) => "api-gateway",
            Component::VpcLink(_) => "vpc-link",
            Component::LoadBalancer(_) => "load-balancer",
            Component::TargetGroup(_) => "target-group",
            Component::Ec2Instance(_) => "ec2-instance",
            Component::RdsInstance(_) => "rds-instance",
            Component::Lambda(_) => "lambda-function",
            Component::EksPod(_) => "eks-pod",
            Component::ElastiCache(_) => "elasticache-cluster",
            Component::IpTarget(_) => "ip-target",
        }
    }

    /// How this node forwards traffic, in one human-readable line.
    pub fn describe(&self) -> String {
        match self {
            Component::SecurityGroup(hop) => format!(
                "security group {} filters by its per-direction allow rules",
                hop.group.group_id
            ),
            Component::NetworkAcl(hop) => format!(
                "network acl {} applies its numbered rules in order, first match wins",
                hop.acl.acl_id
            ),
            Component::NetworkFirewall(hop) => format!(
                "network firewall {} applies its priority-ordered rules",
                hop.firewall.firewall_id
            ),
            Component::Subnet(hop) => format!(
                "subnet {} forwards through its network acl into its route table",
                hop.subnet.subnet_id
            ),
            Component::RouteTable(hop) => format!(
                "route table {} dispatches by longest matching prefix",
                hop.table.route_table_id
            ),
            Component::TransitGateway(hop) => format!(
                "transit gateway {} routes within the tables visible to the ingress attachment",
                hop.tgw.tgw_id
            ),
            Component::LoadBalancer(hop) => format!(
                "{} load balancer {} fans out to its backing targets behind its security groups",
                hop.balancer.kind, hop.balancer.id
            ),
            Component::TargetGroup(hop) => format!(
                "target group {} forwards to its reachable targets",
                hop.group.arn
            ),
            Component::IpTarget(hop) => format!("address {} terminates the path", hop.id),
            other => format!("{} {}", other.kind(), other.id()),
        }
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

/// Owner account for a constructed component: the resource's own account
/// when the snapshot carries one, else the account of the context it was
/// fetched through.
pub(crate) fn account_or(resource_account: &str, ctx: &AnalyzerContext) -> String {
    if resource_account.is_empty() {
        ctx.account_id.clone()
    } else {
        resource_account.to_string()
    }
}
