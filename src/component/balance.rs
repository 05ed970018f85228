//! Load balancers and target groups: health-filtered fan-out
//!
//! A balancer wires every backing target behind its full security-group
//! chain (outermost first) so the chain's verdict lands before the target
//! is reached. Target groups drop members whose health makes them
//! unreachable, preserving registration order.

use futures::future::try_join_all;
use tracing::debug;

use crate::client::{require, AnalyzerContext};
use crate::common::RoutingTarget;
use crate::error::{Error, Result};
use crate::model::{LoadBalancer, LoadBalancerKind, TargetGroup};

use super::filter::SecurityGroupFilter;
use super::ip::IpTargetHop;
use super::source::{Ec2Hop, LambdaHop};
use super::{account_or, Component};

/// Load-balancer hop: ALB, NLB, GWLB, or classic.
#[derive(Debug, Clone)]
pub struct LoadBalancerHop {
    pub balancer: LoadBalancer,
    pub account: String,
}

impl LoadBalancerHop {
    pub fn new(balancer: LoadBalancer, account: impl Into<String>) -> Self {
        Self {
            balancer,
            account: account.into(),
        }
    }

    pub(super) async fn next_hops(
        &self,
        _target: &RoutingTarget,
        ctx: Option<&AnalyzerContext>,
    ) -> Result<Vec<Component>> {
        let ctx = require(ctx, "load balancer resolution")?;

        let groups = try_join_all(
            self.balancer
                .security_group_ids
                .iter()
                .map(|id| ctx.client.get_security_group(id)),
        )
        .await?;

        let backing = match self.balancer.kind {
            LoadBalancerKind::Classic => {
                if self.balancer.instance_ids.is_empty() {
                    return Err(Error::blocked(
                        &self.balancer.id,
                        "classic load balancer has no registered instances".to_string(),
                    ));
                }
                let instances = try_join_all(
                    self.balancer
                        .instance_ids
                        .iter()
                        .map(|id| ctx.client.get_ec2_instance(id)),
                )
                .await?;
                instances
                    .into_iter()
                    .map(|instance| {
                        let account = account_or(&instance.account, ctx);
                        Component::Ec2Instance(Ec2Hop { instance, account })
                    })
                    .collect::<Vec<_>>()
            }
            _ => {
                if self.balancer.target_group_arns.is_empty() {
                    return Err(Error::blocked(
                        &self.balancer.id,
                        "load balancer has no target groups".to_string(),
                    ));
                }
                let target_groups = try_join_all(
                    self.balancer
                        .target_group_arns
                        .iter()
                        .map(|arn| ctx.client.get_target_group(arn)),
                )
                .await?;
                target_groups
                    .into_iter()
                    .map(|group| {
                        let account = account_or(&group.account, ctx);
                        Component::TargetGroup(TargetGroupHop { group, account })
                    })
                    .collect()
            }
        };
        debug!(
            balancer = %self.balancer.id,
            kind = %self.balancer.kind,
            targets = backing.len(),
            "load balancer fan-out"
        );

        Ok(backing
            .into_iter()
            .map(|component| {
                SecurityGroupFilter::chain(groups.clone(), &self.account, component)
            })
            .collect())
    }
}

/// Target-group hop: filter members by health, resolve survivors by their
/// declared target type.
#[derive(Debug, Clone)]
pub struct TargetGroupHop {
    pub group: TargetGroup,
    pub account: String,
}

impl TargetGroupHop {
    pub(super) async fn next_hops(
        &self,
        _target: &RoutingTarget,
        ctx: Option<&AnalyzerContext>,
    ) -> Result<Vec<Component>> {
        let ctx = require(ctx, "target group resolution")?;

        // Health filtering never reorders survivors.
        let reachable: Vec<_> = self
            .group
            .targets
            .iter()
            .filter(|member| member.is_reachable())
            .collect();
        if reachable.is_empty() {
            return Err(Error::blocked(
                &self.group.arn,
                "no reachable targets in target group (all unhealthy or draining)".to_string(),
            ));
        }

        let mut hops = Vec::with_capacity(reachable.len());
        for member in reachable {
            let hop = match self.group.target_type.as_str() {
                "instance" => {
                    let instance = ctx.client.get_ec2_instance(&member.target_id).await?;
                    let account = account_or(&instance.account, ctx);
                    Component::Ec2Instance(Ec2Hop { instance, account })
                }
                "ip" => match member.target_id.parse() {
                    Ok(ip) => Component::IpTarget(IpTargetHop::new(ip)),
                    Err(_) => {
                        return Err(Error::blocked(
                            &self.group.arn,
                            format!("target {} is not a valid ip address", member.target_id),
                        ))
                    }
                },
                "lambda" => {
                    let function = ctx.client.get_lambda_function(&member.target_id).await?;
                    let account = account_or(&function.account, ctx);
                    Component::Lambda(LambdaHop { function, account })
                }
                "alb" => {
                    let balancer = ctx.client.get_load_balancer(&member.target_id).await?;
                    let account = account_or(&balancer.account, ctx);
                    Component::LoadBalancer(LoadBalancerHop::new(balancer, account))
                }
                other => {
                    return Err(Error::blocked(
                        &self.group.arn,
                        format!("unsupported target type {other:?}"),
                    ))
                }
            };
            hops.push(hop);
        }
        Ok(hops)
    }
}
