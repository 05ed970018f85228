//! Subnet hop: the boundary between a resource and VPC routing
//!
//! A subnet forwards through its network ACL (when one is attached) into
//! its route table, falling back to the VPC main route table when the
//! subnet has no explicit association. The NACL is wired in front so its
//! verdict lands before any routing decision.

use crate::client::{require, AnalyzerContext};
use crate::common::RoutingTarget;
use crate::error::Result;
use crate::model::Subnet;

use super::filter::NaclFilter;
use super::route_table::RouteTableHop;
use super::{account_or, Component};

#[derive(Debug, Clone)]
pub struct SubnetHop {
    pub subnet: Subnet,
    pub account: String,
}

impl SubnetHop {
    pub fn new(subnet: Subnet, account: impl Into<String>) -> Self {
        Self {
            subnet,
            account: account.into(),
        }
    }

    pub(super) async fn next_hops(
        &self,
        _target: &RoutingTarget,
        ctx: Option<&AnalyzerContext>,
    ) -> Result<Vec<Component>> {
        let ctx = require(ctx, "subnet resolution")?;

        let table_id = match &self.subnet.route_table_id {
            Some(id) => id.clone(),
            None => {
                let vpc = ctx.client.get_vpc(&self.subnet.vpc_id).await?;
                vpc.main_route_table_id
            }
        };
        let table = ctx.client.get_route_table(&table_id).await?;
        let table_account = account_or(&table.account, ctx);
        let route_table = Component::RouteTable(RouteTableHop::new(table, table_account));

        let head = match &self.subnet.network_acl_id {
            Some(acl_id) => {
                let acl = ctx.client.get_network_acl(acl_id).await?;
                let acl_account = account_or(&acl.account, ctx);
                Component::NetworkAcl(NaclFilter::new(acl, acl_account).with_next(route_table))
            }
            None => route_table,
        };
        Ok(vec![head])
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::testing::MockCloud;
    use crate::model::{NetworkAcl, RouteTable, Vpc};

    fn cloud() -> MockCloud {
        let mut cloud = MockCloud::default();
        cloud.vpcs.insert(
            "vpc-1".into(),
            Vpc {
                vpc_id: "vpc-1".into(),
                main_route_table_id: "rtb-main".into(),
                ..Default::default()
            },
        );
        for id in ["rtb-main", "rtb-explicit"] {
            cloud.route_tables.insert(
                id.into(),
                RouteTable {
                    route_table_id: id.into(),
                    vpc_id: "vpc-1".into(),
                    ..Default::default()
                },
            );
        }
        cloud.network_acls.insert(
            "acl-1".into(),
            NetworkAcl {
                acl_id: "acl-1".into(),
                ..Default::default()
            },
        );
        cloud
    }

    fn target() -> RoutingTarget {
        RoutingTarget::new("10.0.1.50".parse().unwrap())
    }

    #[tokio::test]
    async fn nacl_is_wired_in_front_of_the_route_table() {
        let ctx = AnalyzerContext::new("111", Arc::new(cloud()));
        let hop = SubnetHop::new(
            Subnet {
                subnet_id: "subnet-1".into(),
                vpc_id: "vpc-1".into(),
                route_table_id: Some("rtb-explicit".into()),
                network_acl_id: Some("acl-1".into()),
                ..Default::default()
            },
            "111",
        );
        let hops = hop.next_hops(&target(), Some(&ctx)).await.unwrap();
        assert_eq!(hops.len(), 1);
        assert_eq!(hops[0].kind(), "network-acl");
        match &hops[0] {
            Component::NetworkAcl(filter) => {
                let next = filter.next.as_deref().expect("chained route table");
                assert_eq!(next.id(), "rtb-explicit");
            }
            other => panic!("unexpected hop {other:?}"),
        }
    }

    #[tokio::test]
    async fn falls_back_to_vpc_main_route_table() {
        let ctx = AnalyzerContext::new("111", Arc::new(cloud()));
        let hop = SubnetHop::new(
            Subnet {
                subnet_id: "subnet-1".into(),
                vpc_id: "vpc-1".into(),
                ..Default::default()
            },
            "111",
        );
        let hops = hop.next_hops(&target(), Some(&ctx)).await.unwrap();
        assert_eq!(hops[0].id(), "rtb-main");
    }
}
