//! Edge resources: gateways touching the public, carrier, or on-prem side

use serde::{Deserialize, Serialize};

/// Internet gateway snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InternetGateway {
    pub gateway_id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub vpc_id: String,
}

/// NAT gateway snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NatGateway {
    pub gateway_id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub subnet_id: String,
}

/// Carrier gateway snapshot (wavelength zones).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarrierGateway {
    pub gateway_id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub state: String,
}

/// Local gateway snapshot (outposts).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalGateway {
    pub gateway_id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub state: String,
}

/// VPN gateway snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VpnGateway {
    pub gateway_id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub state: String,
}

/// VPN connection snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VpnConnection {
    pub connection_id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub state: String,
    /// Static routes advertised over the tunnel
    #[serde(default)]
    pub static_routes: Vec<String>,
}

/// Direct Connect gateway snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectConnectGateway {
    pub gateway_id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub state: String,
}

/// Attachment between a Direct Connect gateway and a VPN/transit gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DxGatewayAttachment {
    pub attachment_id: String,
    #[serde(default)]
    pub gateway_id: String,
    #[serde(default)]
    pub state: String,
    /// On-prem prefixes allowed through this attachment
    #[serde(default)]
    pub allowed_prefixes: Vec<String>,
}
