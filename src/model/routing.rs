//! VPC-level routing resources: VPCs, subnets, route tables, prefix lists

use serde::{Deserialize, Serialize};

/// VPC snapshot. A VPC can carry several IPv4 and IPv6 ranges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vpc {
    pub vpc_id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub cidrs: Vec<String>,
    #[serde(default)]
    pub ipv6_cidrs: Vec<String>,
    /// Route table used by subnets with no explicit association
    #[serde(default)]
    pub main_route_table_id: String,
}

impl Vpc {
    /// Whether `ip` falls inside any of the VPC's IPv4 or IPv6 ranges.
    pub fn contains(&self, ip: std::net::IpAddr) -> bool {
        self.cidrs
            .iter()
            .chain(self.ipv6_cidrs.iter())
            .any(|cidr| crate::common::net::cidr_contains(cidr, ip))
    }
}

/// Subnet snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subnet {
    pub subnet_id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub vpc_id: String,
    #[serde(default)]
    pub cidr_block: String,
    #[serde(default)]
    pub ipv6_cidr_block: Option<String>,
    /// Explicitly associated route table, if any
    #[serde(default)]
    pub route_table_id: Option<String>,
    /// NACL guarding the subnet boundary, if any
    #[serde(default)]
    pub network_acl_id: Option<String>,
}

/// One route. Exactly one of `destination_cidr`, `destination_ipv6_cidr`,
/// `prefix_list_id` is expected to be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub destination_cidr: Option<String>,
    #[serde(default)]
    pub destination_ipv6_cidr: Option<String>,
    #[serde(default)]
    pub prefix_list_id: Option<String>,
    /// Target type tag: internet-gateway, nat-gateway, transit-gateway,
    /// vpc-endpoint, vpc-peering, vpn-gateway, network-interface,
    /// local-gateway, carrier-gateway, or local
    #[serde(default)]
    pub target_type: String,
    #[serde(default)]
    pub target_id: String,
    #[serde(default)]
    pub state: String,
}

/// Route table snapshot. Routes keep their source order; ties on prefix
/// length resolve to the first route seen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteTable {
    pub route_table_id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub vpc_id: String,
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// Managed prefix list: a named set of CIDR entries maintained outside the
/// rule or route that references it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrefixList {
    pub prefix_list_id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub entries: Vec<String>,
}
