//! Traversal driver - Core Execution Flow
//!
//! Expands the component graph hop by hop with an explicit worklist, never
//! the call stack: one component is popped, asked for its next hops, and
//! its hops are pushed. The visited set is owned by the caller and keyed by
//! component id, so repeated walks (forward leg, then return leg) can share
//! or isolate cycle state as they choose.
//!
//! A walk ends in one of three ways:
//! - `Ok(())` - every branch terminated without a block; traffic delivers.
//! - `Err(Error::Blocked { .. })` - a component denied the traffic.
//! - `Err(Error::Lookup(_))` - a snapshot could not be fetched; the result
//!   is inconclusive, not "blocked".

use std::collections::HashSet;

use tracing::debug;

use crate::client::AnalyzerContext;
use crate::common::RoutingTarget;
use crate::component::Component;
use crate::error::Result;

/// Walk the graph from `start` until every branch terminates.
///
/// Components whose id is already in `visited` are skipped, which bounds
/// cycles (peered VPCs routing back at each other, balancer loops).
pub async fn walk(
    start: Component,
    target: &RoutingTarget,
    ctx: Option<&AnalyzerContext>,
    visited: &mut HashSet<String>,
) -> Result<()> {
    let mut worklist = vec![start];
    while let Some(component) = worklist.pop() {
        if !visited.insert(component.id().to_string()) {
            debug!(component = %component, "already visited, skipping");
            continue;
        }
        let hops = component.next_hops(target, ctx).await?;
        debug!(
            component = %component,
            %target,
            next = hops.len(),
            "hop resolved"
        );
        worklist.extend(hops);
    }
    Ok(())
}

/// Convenience wrapper owning a fresh visited set for a single walk.
pub async fn walk_path(
    start: Component,
    target: &RoutingTarget,
    ctx: Option<&AnalyzerContext>,
) -> Result<()> {
    let mut visited = HashSet::new();
    walk(start, target, ctx, &mut visited).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::testing::MockCloud;
    use crate::component::Ec2Hop;
    use crate::error::Error;
    use crate::model::*;

    /// One VPC: an instance behind a security group, a subnet with a NACL,
    /// a route table with a default route to an internet gateway.
    fn topology() -> MockCloud {
        let mut cloud = MockCloud::default();
        cloud.security_groups.insert(
            "sg-web".into(),
            SecurityGroup {
                group_id: "sg-web".into(),
                outbound_rules: vec![SecurityGroupRule {
                    protocol: "tcp".into(),
                    from_port: 443,
                    to_port: 443,
                    cidrs: vec!["0.0.0.0/0".into()],
                    ..Default::default()
                }],
                ..Default::default()
            },
        );
        cloud.network_acls.insert(
            "acl-1".into(),
            NetworkAcl {
                acl_id: "acl-1".into(),
                outbound_rules: vec![NaclRule {
                    rule_number: 100,
                    action: RuleAction::Allow,
                    protocol: "-1".into(),
                    cidr_block: Some("0.0.0.0/0".into()),
                    ..Default::default()
                }],
                ..Default::default()
            },
        );
        cloud.subnets.insert(
            "subnet-1".into(),
            Subnet {
                subnet_id: "subnet-1".into(),
                vpc_id: "vpc-1".into(),
                cidr_block: "10.0.1.0/24".into(),
                route_table_id: Some("rtb-1".into()),
                network_acl_id: Some("acl-1".into()),
                ..Default::default()
            },
        );
        cloud.route_tables.insert(
            "rtb-1".into(),
            RouteTable {
                route_table_id: "rtb-1".into(),
                vpc_id: "vpc-1".into(),
                routes: vec![
                    Route {
                        destination_cidr: Some("10.0.0.0/16".into()),
                        target_type: "local".into(),
                        target_id: "local".into(),
                        ..Default::default()
                    },
                    Route {
                        destination_cidr: Some("0.0.0.0/0".into()),
                        target_type: "internet-gateway".into(),
                        target_id: "igw-1".into(),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            },
        );
        cloud.vpcs.insert(
            "vpc-1".into(),
            Vpc {
                vpc_id: "vpc-1".into(),
                cidrs: vec!["10.0.0.0/16".into()],
                main_route_table_id: "rtb-1".into(),
                ..Default::default()
            },
        );
        cloud.internet_gateways.insert(
            "igw-1".into(),
            InternetGateway {
                gateway_id: "igw-1".into(),
                vpc_id: "vpc-1".into(),
                ..Default::default()
            },
        );
        cloud.ec2_instances.insert(
            "i-web".into(),
            Ec2Instance {
                instance_id: "i-web".into(),
                subnet_id: "subnet-1".into(),
                security_group_ids: vec!["sg-web".into()],
                private_ips: vec!["10.0.1.10".into()],
                ..Default::default()
            },
        );
        cloud
    }

    fn start(cloud: &MockCloud) -> Component {
        Component::Ec2Instance(Ec2Hop::new(cloud.ec2_instances["i-web"].clone(), "111"))
    }

    #[tokio::test]
    async fn instance_reaches_the_internet() {
        let cloud = topology();
        let source = start(&cloud);
        let ctx = AnalyzerContext::new("111", Arc::new(cloud));
        let target = RoutingTarget::new("8.8.8.8".parse().unwrap()).with_port(443);
        walk_path(source, &target, Some(&ctx)).await.unwrap();
    }

    #[tokio::test]
    async fn blocked_walk_names_the_deciding_component() {
        let mut cloud = topology();
        // Deny 443 at the subnet boundary, in front of the allow-all.
        cloud
            .network_acls
            .get_mut("acl-1")
            .unwrap()
            .outbound_rules
            .insert(
                0,
                NaclRule {
                    rule_number: 50,
                    action: RuleAction::Deny,
                    protocol: "tcp".into(),
                    from_port: 443,
                    to_port: 443,
                    cidr_block: Some("0.0.0.0/0".into()),
                    ..Default::default()
                },
            );
        let source = start(&cloud);
        let ctx = AnalyzerContext::new("111", Arc::new(cloud));
        let target = RoutingTarget::new("8.8.8.8".parse().unwrap()).with_port(443);
        let err = walk_path(source, &target, Some(&ctx)).await.unwrap_err();
        match err {
            Error::Blocked { component, reason } => {
                assert_eq!(component, "acl-1");
                assert!(reason.contains("rule 50 denies"));
            }
            other => panic!("expected block, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_snapshot_is_inconclusive_not_blocked() {
        let mut cloud = topology();
        cloud.route_tables.clear();
        let source = start(&cloud);
        let ctx = AnalyzerContext::new("111", Arc::new(cloud));
        let target = RoutingTarget::new("8.8.8.8".parse().unwrap()).with_port(443);
        let err = walk_path(source, &target, Some(&ctx)).await.unwrap_err();
        assert!(!err.is_blocked());
    }

    #[tokio::test]
    async fn visited_set_breaks_revisits() {
        let cloud = topology();
        let source = start(&cloud);
        let ctx = AnalyzerContext::new("111", Arc::new(cloud));
        let target = RoutingTarget::new("8.8.8.8".parse().unwrap()).with_port(443);

        // Pre-mark the instance: the walk stops immediately.
        let mut visited = HashSet::new();
        visited.insert("i-web".to_string());
        walk(source, &target, Some(&ctx), &mut visited)
            .await
            .unwrap();
        assert_eq!(visited.len(), 1);
    }
}
