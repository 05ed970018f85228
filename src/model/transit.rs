//! Transit gateway resources
//!
//! Route visibility is scoped per ingress attachment: a route table is
//! visible iff the attachment appears in an association or propagation link
//! whose state is active/enabled.

use serde::{Deserialize, Serialize};

/// Transit gateway snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitGateway {
    pub tgw_id: String,
    #[serde(default)]
    pub account: String,
}

/// Association or propagation link between an attachment and a route table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TgwLink {
    pub attachment_id: String,
    /// "associated"/"enabled"/"associating"/"disabled"...
    #[serde(default)]
    pub state: String,
}

impl TgwLink {
    /// Whether this link currently exposes the route table to the
    /// attachment.
    pub fn is_active(&self) -> bool {
        matches!(self.state.as_str(), "associated" | "enabled" | "active" | "")
    }
}

/// Candidate attachment hanging off one TGW route.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TgwRouteAttachment {
    pub attachment_id: String,
    #[serde(default)]
    pub state: String,
}

/// One transit-gateway route: CIDR only, with per-route state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TgwRoute {
    #[serde(default)]
    pub destination_cidr: String,
    /// Only "active" routes participate in resolution
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub attachments: Vec<TgwRouteAttachment>,
}

/// Transit-gateway route table with its association/propagation links.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TgwRouteTable {
    pub route_table_id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub routes: Vec<TgwRoute>,
    #[serde(default)]
    pub associations: Vec<TgwLink>,
    #[serde(default)]
    pub propagations: Vec<TgwLink>,
}

impl TgwRouteTable {
    /// Whether this table is visible to `attachment_id` through an active
    /// association or propagation.
    pub fn visible_to(&self, attachment_id: &str) -> bool {
        self.associations
            .iter()
            .chain(self.propagations.iter())
            .any(|link| link.attachment_id == attachment_id && link.is_active())
    }
}

/// Transit-gateway attachment snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TgwAttachment {
    pub attachment_id: String,
    #[serde(default)]
    pub tgw_id: String,
    /// "vpc", "peering", "vpn", "direct-connect-gateway"
    #[serde(default)]
    pub resource_type: String,
    /// Id of the attached resource (vpc id, peering id, ...)
    #[serde(default)]
    pub resource_id: String,
    /// Account owning the attached resource
    #[serde(default)]
    pub resource_account: String,
    /// Member subnets of a VPC attachment
    #[serde(default)]
    pub subnet_ids: Vec<String>,
}
