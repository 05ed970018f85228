//! Compute source adapters
//!
//! EC2, RDS, Lambda, EKS pods, and ElastiCache all start a traversal the
//! same way: their security groups are wired nearest-to-source into a
//! chain ending in the subnet hop, so filters evaluate in the order that
//! mirrors egress toward the subnet boundary. Multi-subnet resources fan
//! out, one chain per subnet.

use futures::future::try_join_all;

use crate::client::{require, AnalyzerContext};
use crate::common::RoutingTarget;
use crate::error::Result;
use crate::model::{Ec2Instance, EksPod, ElastiCacheCluster, Eni, LambdaFunction, RdsInstance};

use super::filter::SecurityGroupFilter;
use super::ip::IpTargetHop;
use super::subnet::SubnetHop;
use super::{account_or, Component};

/// Security-group chain in front of each subnet, one fan-out branch per
/// subnet id.
async fn chain_to_subnets(
    group_ids: &[String],
    subnet_ids: &[String],
    account: &str,
    ctx: &AnalyzerContext,
) -> Result<Vec<Component>> {
    let groups = try_join_all(group_ids.iter().map(|id| ctx.client.get_security_group(id))).await?;
    let mut hops = Vec::with_capacity(subnet_ids.len());
    for subnet_id in subnet_ids {
        let subnet = ctx.client.get_subnet(subnet_id).await?;
        let subnet_account = account_or(&subnet.account, ctx);
        let tail = Component::Subnet(SubnetHop::new(subnet, subnet_account));
        hops.push(SecurityGroupFilter::chain(groups.clone(), account, tail));
    }
    Ok(hops)
}

/// EC2 instance adapter.
#[derive(Debug, Clone)]
pub struct Ec2Hop {
    pub instance: Ec2Instance,
    pub account: String,
}

impl Ec2Hop {
    pub fn new(instance: Ec2Instance, account: impl Into<String>) -> Self {
        Self {
            instance,
            account: account.into(),
        }
    }

    pub(super) async fn next_hops(
        &self,
        _target: &RoutingTarget,
        ctx: Option<&AnalyzerContext>,
    ) -> Result<Vec<Component>> {
        let ctx = require(ctx, "ec2 instance resolution")?;
        chain_to_subnets(
            &self.instance.security_group_ids,
            std::slice::from_ref(&self.instance.subnet_id),
            &self.account,
            ctx,
        )
        .await
    }
}

/// RDS instance adapter.
#[derive(Debug, Clone)]
pub struct RdsHop {
    pub instance: RdsInstance,
    pub account: String,
}

impl RdsHop {
    pub fn new(instance: RdsInstance, account: impl Into<String>) -> Self {
        Self {
            instance,
            account: account.into(),
        }
    }

    pub(super) async fn next_hops(
        &self,
        _target: &RoutingTarget,
        ctx: Option<&AnalyzerContext>,
    ) -> Result<Vec<Component>> {
        let ctx = require(ctx, "rds instance resolution")?;
        chain_to_subnets(
            &self.instance.security_group_ids,
            &self.instance.subnet_ids,
            &self.account,
            ctx,
        )
        .await
    }
}

/// Lambda function adapter. A function with no VPC wiring has no network
/// path of its own and terminates immediately.
#[derive(Debug, Clone)]
pub struct LambdaHop {
    pub function: LambdaFunction,
    pub account: String,
}

impl LambdaHop {
    pub fn new(function: LambdaFunction, account: impl Into<String>) -> Self {
        Self {
            function,
            account: account.into(),
        }
    }

    pub(super) async fn next_hops(
        &self,
        _target: &RoutingTarget,
        ctx: Option<&AnalyzerContext>,
    ) -> Result<Vec<Component>> {
        if self.function.subnet_ids.is_empty() {
            return Ok(vec![]);
        }
        let ctx = require(ctx, "lambda function resolution")?;
        chain_to_subnets(
            &self.function.security_group_ids,
            &self.function.subnet_ids,
            &self.account,
            ctx,
        )
        .await
    }
}

/// EKS pod adapter.
#[derive(Debug, Clone)]
pub struct EksPodHop {
    pub pod: EksPod,
    pub account: String,
}

impl EksPodHop {
    pub fn new(pod: EksPod, account: impl Into<String>) -> Self {
        Self {
            pod,
            account: account.into(),
        }
    }

    pub(super) async fn next_hops(
        &self,
        _target: &RoutingTarget,
        ctx: Option<&AnalyzerContext>,
    ) -> Result<Vec<Component>> {
        let ctx = require(ctx, "eks pod resolution")?;
        chain_to_subnets(
            &self.pod.security_group_ids,
            std::slice::from_ref(&self.pod.subnet_id),
            &self.account,
            ctx,
        )
        .await
    }
}

/// ElastiCache cluster adapter.
#[derive(Debug, Clone)]
pub struct ElastiCacheHop {
    pub cluster: ElastiCacheCluster,
    pub account: String,
}

impl ElastiCacheHop {
    pub fn new(cluster: ElastiCacheCluster, account: impl Into<String>) -> Self {
        Self {
            cluster,
            account: account.into(),
        }
    }

    pub(super) async fn next_hops(
        &self,
        _target: &RoutingTarget,
        ctx: Option<&AnalyzerContext>,
    ) -> Result<Vec<Component>> {
        let ctx = require(ctx, "elasticache resolution")?;
        chain_to_subnets(
            &self.cluster.security_group_ids,
            &self.cluster.subnet_ids,
            &self.account,
            ctx,
        )
        .await
    }
}

/// Network-interface hop, reached through `network-interface` routes.
///
/// An attached instance takes over resolution; a bare interface evaluates
/// its security groups in front of its address.
#[derive(Debug, Clone)]
pub struct EniHop {
    pub eni: Eni,
    pub account: String,
}

impl EniHop {
    pub(super) async fn next_hops(
        &self,
        target: &RoutingTarget,
        ctx: Option<&AnalyzerContext>,
    ) -> Result<Vec<Component>> {
        let ctx = require(ctx, "network interface resolution")?;
        if let Some(instance_id) = &self.eni.instance_id {
            let instance = ctx.client.get_ec2_instance(instance_id).await?;
            let account = account_or(&instance.account, ctx);
            return Ok(vec![Component::Ec2Instance(Ec2Hop::new(instance, account))]);
        }

        let groups = try_join_all(
            self.eni
                .security_group_ids
                .iter()
                .map(|id| ctx.client.get_security_group(id)),
        )
        .await?;
        let leaf_ip = match target.ip {
            Some(ip) => ip,
            None => match self.eni.private_ip.parse() {
                Ok(ip) => ip,
                Err(_) => return Ok(vec![]),
            },
        };
        let tail = Component::IpTarget(IpTargetHop::new(leaf_ip));
        Ok(vec![SecurityGroupFilter::chain(
            groups,
            &self.account,
            tail,
        )])
    }
}
