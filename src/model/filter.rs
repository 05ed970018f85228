//! Rule-bearing filter resources: security groups, NACLs, network firewalls

use serde::{Deserialize, Serialize};

/// Security group snapshot.
///
/// Rules carry no explicit order; the group allows traffic if ANY rule of
/// the evaluated direction matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityGroup {
    pub group_id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub inbound_rules: Vec<SecurityGroupRule>,
    #[serde(default)]
    pub outbound_rules: Vec<SecurityGroupRule>,
}

/// One security-group rule with up to four match classes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityGroupRule {
    /// Protocol name or number; "-1" matches anything
    #[serde(default)]
    pub protocol: String,
    /// Port range start; 0/0 means all ports
    #[serde(default)]
    pub from_port: i64,
    /// Port range end
    #[serde(default)]
    pub to_port: i64,
    /// Literal IPv4 CIDR ranges
    #[serde(default)]
    pub cidrs: Vec<String>,
    /// Literal IPv6 CIDR ranges
    #[serde(default)]
    pub ipv6_cidrs: Vec<String>,
    /// Referenced security groups, resolved through their attached ENIs
    #[serde(default)]
    pub security_group_ids: Vec<String>,
    /// Managed prefix lists, resolved through the client
    #[serde(default)]
    pub prefix_list_ids: Vec<String>,
}

/// Allow/deny action on an ordered rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Deny,
}

impl Default for RuleAction {
    fn default() -> Self {
        RuleAction::Deny
    }
}

/// Network ACL snapshot: per-direction, explicitly ordered rule lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkAcl {
    pub acl_id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub inbound_rules: Vec<NaclRule>,
    #[serde(default)]
    pub outbound_rules: Vec<NaclRule>,
}

/// One NACL rule. Rules evaluate in rule-number ascending order; the first
/// match wins regardless of action.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NaclRule {
    pub rule_number: i64,
    #[serde(default)]
    pub action: RuleAction,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub from_port: i64,
    #[serde(default)]
    pub to_port: i64,
    #[serde(default)]
    pub cidr_block: Option<String>,
    #[serde(default)]
    pub ipv6_cidr_block: Option<String>,
}

/// What a firewall rule does with matching traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirewallAction {
    Pass,
    Drop,
}

impl Default for FirewallAction {
    fn default() -> Self {
        FirewallAction::Pass
    }
}

/// Network firewall snapshot: priority-ordered five-tuple rules with an
/// explicit default action.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkFirewall {
    pub firewall_id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub rules: Vec<FirewallRule>,
    /// Applied when no rule matches
    #[serde(default)]
    pub default_action: FirewallAction,
}

/// One firewall rule, evaluated in priority ascending order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FirewallRule {
    pub priority: i64,
    #[serde(default)]
    pub action: FirewallAction,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub from_port: i64,
    #[serde(default)]
    pub to_port: i64,
    #[serde(default)]
    pub destination_cidrs: Vec<String>,
}
