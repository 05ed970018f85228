//! VPC endpoints, peering connections, API gateways, VPC links

use serde::{Deserialize, Serialize};

/// VPC endpoint snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VpcEndpoint {
    pub endpoint_id: String,
    #[serde(default)]
    pub account: String,
    /// "Interface", "Gateway", or "GatewayLoadBalancer"
    #[serde(default)]
    pub endpoint_type: String,
    #[serde(default)]
    pub state: String,
    /// e.g. "com.amazonaws.us-east-1.execute-api"
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub vpc_id: String,
    #[serde(default)]
    pub subnet_ids: Vec<String>,
    #[serde(default)]
    pub security_group_ids: Vec<String>,
    /// Raw JSON policy document, if one is attached
    #[serde(default)]
    pub policy_document: Option<String>,
    /// Private API gateways served through this endpoint (execute-api only)
    #[serde(default)]
    pub api_ids: Vec<String>,
}

impl VpcEndpoint {
    /// Whether this endpoint fronts an API gateway execute-api service.
    pub fn is_execute_api(&self) -> bool {
        self.service_name.ends_with(".execute-api")
            || self.service_name.contains(".execute-api.")
    }
}

/// VPC peering connection snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VpcPeering {
    pub peering_id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub requester_vpc_id: String,
    #[serde(default)]
    pub accepter_vpc_id: String,
    #[serde(default)]
    pub requester_cidrs: Vec<String>,
    #[serde(default)]
    pub accepter_cidrs: Vec<String>,
}

/// API gateway snapshot (REST or HTTP API).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiGateway {
    pub api_id: String,
    #[serde(default)]
    pub account: String,
    /// "EDGE", "REGIONAL", "PRIVATE"
    #[serde(default)]
    pub endpoint_types: Vec<String>,
    /// VPC endpoints serving a PRIVATE api
    #[serde(default)]
    pub vpc_endpoint_ids: Vec<String>,
    /// VPC links wired into a REGIONAL api's integrations
    #[serde(default)]
    pub vpc_link_ids: Vec<String>,
}

/// VPC link snapshot, v1 (REST) or v2 (HTTP).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VpcLink {
    pub link_id: String,
    #[serde(default)]
    pub account: String,
    /// 1 or 2
    #[serde(default)]
    pub version: u8,
    /// v1: NLB target ARNs; v2: integration target ARNs to try first
    #[serde(default)]
    pub target_arns: Vec<String>,
    /// v2 fallback wiring
    #[serde(default)]
    pub subnet_ids: Vec<String>,
    #[serde(default)]
    pub security_group_ids: Vec<String>,
}
