//! Primitive data model
//!
//! Read-only snapshots of each resource's static configuration, fetched on
//! demand from the injected client. Pure data, no behavior: the evaluators
//! in `component` interpret these values, the client produces them.
//!
//! Everything derives serde so a client can be backed by recorded API
//! responses or fixtures.

mod balance;
mod compute;
mod edge;
mod endpoint;
mod filter;
mod routing;
mod transit;

pub use balance::{LoadBalancer, LoadBalancerKind, TargetGroup, TargetGroupTarget};
pub use compute::{Ec2Instance, EksPod, ElastiCacheCluster, Eni, LambdaFunction, RdsInstance};
pub use edge::{
    CarrierGateway, DirectConnectGateway, DxGatewayAttachment, InternetGateway, LocalGateway,
    NatGateway, VpnConnection, VpnGateway,
};
pub use endpoint::{ApiGateway, VpcEndpoint, VpcLink, VpcPeering};
pub use filter::{
    FirewallAction, FirewallRule, NaclRule, NetworkAcl, NetworkFirewall, RuleAction, SecurityGroup,
    SecurityGroupRule,
};
pub use routing::{PrefixList, Route, RouteTable, Subnet, Vpc};
pub use transit::{
    TgwAttachment, TgwLink, TgwRoute, TgwRouteAttachment, TgwRouteTable, TransitGateway,
};
