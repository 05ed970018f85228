//! Compute resources that originate or terminate traffic

use serde::{Deserialize, Serialize};

/// Elastic network interface snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Eni {
    pub eni_id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub subnet_id: String,
    #[serde(default)]
    pub private_ip: String,
    #[serde(default)]
    pub secondary_ips: Vec<String>,
    #[serde(default)]
    pub security_group_ids: Vec<String>,
    /// Instance the interface is attached to, if any
    #[serde(default)]
    pub instance_id: Option<String>,
}

impl Eni {
    /// All private addresses carried by this interface.
    pub fn private_ips(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.private_ip.as_str())
            .chain(self.secondary_ips.iter().map(String::as_str))
            .filter(|ip| !ip.is_empty())
    }
}

/// EC2 instance snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ec2Instance {
    pub instance_id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub subnet_id: String,
    #[serde(default)]
    pub security_group_ids: Vec<String>,
    #[serde(default)]
    pub private_ips: Vec<String>,
}

/// RDS database instance snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RdsInstance {
    pub instance_id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub subnet_ids: Vec<String>,
    #[serde(default)]
    pub security_group_ids: Vec<String>,
}

/// Lambda function snapshot (VPC-attached configuration).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LambdaFunction {
    pub function_name: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub subnet_ids: Vec<String>,
    #[serde(default)]
    pub security_group_ids: Vec<String>,
}

/// EKS pod snapshot, resolved by pod IP.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EksPod {
    pub pod_name: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub pod_ip: String,
    #[serde(default)]
    pub subnet_id: String,
    #[serde(default)]
    pub security_group_ids: Vec<String>,
}

/// ElastiCache cluster snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElastiCacheCluster {
    pub cluster_id: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub subnet_ids: Vec<String>,
    #[serde(default)]
    pub security_group_ids: Vec<String>,
}
