//! Load balancers and target groups

use serde::{Deserialize, Serialize};

/// Load balancer family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadBalancerKind {
    Application,
    Network,
    Gateway,
    Classic,
}

impl Default for LoadBalancerKind {
    fn default() -> Self {
        LoadBalancerKind::Application
    }
}

impl std::fmt::Display for LoadBalancerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadBalancerKind::Application => write!(f, "application"),
            LoadBalancerKind::Network => write!(f, "network"),
            LoadBalancerKind::Gateway => write!(f, "gateway"),
            LoadBalancerKind::Classic => write!(f, "classic"),
        }
    }
}

/// Load balancer snapshot.
///
/// ALB/NLB/GWLB list backing target groups; classic load balancers list raw
/// instance ids instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadBalancer {
    /// ARN for v2 balancers, name for classic
    pub id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub kind: LoadBalancerKind,
    #[serde(default)]
    pub security_group_ids: Vec<String>,
    #[serde(default)]
    pub target_group_arns: Vec<String>,
    /// Classic only
    #[serde(default)]
    pub instance_ids: Vec<String>,
}

/// One registered target.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetGroupTarget {
    /// Instance id, IP, function name, or ALB ARN depending on the group's
    /// target type
    pub target_id: String,
    #[serde(default)]
    pub port: Option<u16>,
    /// Last observed health; None when the target has not been checked yet
    #[serde(default)]
    pub health: Option<String>,
}

impl TargetGroupTarget {
    /// Whether traffic can be routed to this target.
    ///
    /// A target with no recorded health is newly registered and treated as
    /// reachable; every explicit non-healthy value, including unrecognized
    /// ones, is not.
    pub fn is_reachable(&self) -> bool {
        match self.health.as_deref() {
            None | Some("") | Some("healthy") => true,
            Some(_) => false,
        }
    }
}

/// Target group snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetGroup {
    pub arn: String,
    #[serde(default)]
    pub account: String,
    /// "instance", "ip", "lambda", or "alb"
    #[serde(default)]
    pub target_type: String,
    #[serde(default)]
    pub targets: Vec<TargetGroupTarget>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_reachability() {
        let healthy = TargetGroupTarget {
            target_id: "i-1".into(),
            port: None,
            health: Some("healthy".into()),
        };
        let unchecked = TargetGroupTarget {
            target_id: "i-2".into(),
            port: None,
            health: None,
        };
        assert!(healthy.is_reachable());
        assert!(unchecked.is_reachable());
        for state in ["unhealthy", "draining", "unused", "unavailable", "weird"] {
            let target = TargetGroupTarget {
                target_id: "i-3".into(),
                port: None,
                health: Some(state.into()),
            };
            assert!(!target.is_reachable(), "{state} should be unreachable");
        }
    }
}
