//! API gateways and VPC links

use crate::client::{require, AnalyzerContext};
use crate::common::RoutingTarget;
use crate::error::{Error, LookupError, Result};
use crate::model::{ApiGateway, VpcLink};

use super::balance::LoadBalancerHop;
use super::endpoint::VpcEndpointHop;
use super::filter::SecurityGroupFilter;
use super::subnet::SubnetHop;
use super::{account_or, Component};

use futures::future::try_join_all;

/// API-gateway hop: branch on the api's endpoint type.
#[derive(Debug, Clone)]
pub struct ApiGatewayHop {
    pub api: ApiGateway,
    pub account: String,
}

impl ApiGatewayHop {
    pub(super) async fn next_hops(
        &self,
        _target: &RoutingTarget,
        ctx: Option<&AnalyzerContext>,
    ) -> Result<Vec<Component>> {
        for endpoint_type in &self.api.endpoint_types {
            match endpoint_type.as_str() {
                // Edge-optimized apis terminate at the CDN edge.
                "EDGE" => return Ok(vec![]),
                "PRIVATE" => return self.resolve_private(ctx).await,
                "REGIONAL" => return self.resolve_regional(ctx).await,
                _ => continue,
            }
        }
        Err(Error::blocked(
            &self.api.api_id,
            format!(
                "unsupported api gateway endpoint types {:?}",
                self.api.endpoint_types
            ),
        ))
    }

    async fn resolve_private(&self, ctx: Option<&AnalyzerContext>) -> Result<Vec<Component>> {
        let ctx = require(ctx, "private api resolution")?;
        let mut endpoints = Vec::new();
        for endpoint_id in &self.api.vpc_endpoint_ids {
            match ctx.client.get_vpc_endpoint(endpoint_id).await {
                Ok(endpoint) => {
                    let account = account_or(&endpoint.account, ctx);
                    endpoints.push(Component::VpcEndpoint(VpcEndpointHop::new(
                        endpoint, account,
                    )));
                }
                Err(LookupError::NotFound { .. }) => continue,
                Err(err) => return Err(err.into()),
            }
        }
        if endpoints.is_empty() {
            return Err(Error::blocked(
                &self.api.api_id,
                "private api has no resolvable vpc endpoints".to_string(),
            ));
        }
        Ok(endpoints)
    }

    async fn resolve_regional(&self, ctx: Option<&AnalyzerContext>) -> Result<Vec<Component>> {
        if self.api.vpc_link_ids.is_empty() {
            // Regional api with no vpc links terminates at the regional
            // endpoint.
            return Ok(vec![]);
        }
        let ctx = require(ctx, "regional api resolution")?;
        let mut links = Vec::new();
        for link_id in &self.api.vpc_link_ids {
            let link = match ctx.client.get_vpc_link(link_id).await {
                Ok(link) => link,
                Err(LookupError::NotFound { .. }) => ctx.client.get_vpc_link_v2(link_id).await?,
                Err(err) => return Err(err.into()),
            };
            let account = account_or(&link.account, ctx);
            links.push(Component::VpcLink(VpcLinkHop { link, account }));
        }
        Ok(links)
    }
}

/// VPC-link hop, v1 (REST) or v2 (HTTP).
#[derive(Debug, Clone)]
pub struct VpcLinkHop {
    pub link: VpcLink,
    pub account: String,
}

impl VpcLinkHop {
    pub(super) async fn next_hops(
        &self,
        _target: &RoutingTarget,
        ctx: Option<&AnalyzerContext>,
    ) -> Result<Vec<Component>> {
        let ctx = require(ctx, "vpc link resolution")?;
        match self.link.version {
            1 => {
                // v1 links point straight at NLBs.
                if self.link.target_arns.is_empty() {
                    return Err(Error::blocked(
                        &self.link.link_id,
                        "vpc link has no target load balancers".to_string(),
                    ));
                }
                let balancers = try_join_all(
                    self.link
                        .target_arns
                        .iter()
                        .map(|arn| ctx.client.get_load_balancer(arn)),
                )
                .await?;
                Ok(balancers
                    .into_iter()
                    .map(|balancer| {
                        let account = account_or(&balancer.account, ctx);
                        Component::LoadBalancer(LoadBalancerHop::new(balancer, account))
                    })
                    .collect())
            }
            2 => {
                // v2: integration targets that resolve to a balancer win;
                // otherwise fall back to the link's subnet + security-group
                // wiring.
                let mut balancers = Vec::new();
                for arn in &self.link.target_arns {
                    if !arn.contains(":loadbalancer/") {
                        continue;
                    }
                    match ctx.client.get_load_balancer(arn).await {
                        Ok(balancer) => {
                            let account = account_or(&balancer.account, ctx);
                            balancers.push(Component::LoadBalancer(LoadBalancerHop::new(
                                balancer, account,
                            )));
                        }
                        Err(LookupError::NotFound { .. }) => continue,
                        Err(err) => return Err(err.into()),
                    }
                }
                if !balancers.is_empty() {
                    return Ok(balancers);
                }

                if self.link.subnet_ids.is_empty() {
                    return Err(Error::blocked(
                        &self.link.link_id,
                        "vpc link resolves to neither load balancers nor subnets".to_string(),
                    ));
                }
                let groups = try_join_all(
                    self.link
                        .security_group_ids
                        .iter()
                        .map(|id| ctx.client.get_security_group(id)),
                )
                .await?;
                let mut hops = Vec::with_capacity(self.link.subnet_ids.len());
                for subnet_id in &self.link.subnet_ids {
                    let subnet = ctx.client.get_subnet(subnet_id).await?;
                    let account = account_or(&subnet.account, ctx);
                    let tail = Component::Subnet(SubnetHop::new(subnet, account));
                    hops.push(SecurityGroupFilter::chain(
                        groups.clone(),
                        &self.account,
                        tail,
                    ));
                }
                Ok(hops)
            }
            other => Err(Error::blocked(
                &self.link.link_id,
                format!("unsupported vpc link version {other}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::testing::MockCloud;
    use crate::model::{LoadBalancer, LoadBalancerKind, VpcEndpoint};

    fn target() -> RoutingTarget {
        RoutingTarget::new("10.0.1.50".parse().unwrap()).with_port(443)
    }

    #[tokio::test]
    async fn edge_api_is_terminal() {
        let ctx = AnalyzerContext::new("111", Arc::new(MockCloud::default()));
        let hop = ApiGatewayHop {
            api: ApiGateway {
                api_id: "api-1".into(),
                endpoint_types: vec!["EDGE".into()],
                ..Default::default()
            },
            account: "111".into(),
        };
        assert!(hop.next_hops(&target(), Some(&ctx)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn private_api_needs_a_resolvable_endpoint() {
        let mut cloud = MockCloud::default();
        cloud.vpc_endpoints.insert(
            "vpce-ok".into(),
            VpcEndpoint {
                endpoint_id: "vpce-ok".into(),
                endpoint_type: "Interface".into(),
                state: "available".into(),
                ..Default::default()
            },
        );
        let ctx = AnalyzerContext::new("111", Arc::new(cloud));

        let hop = ApiGatewayHop {
            api: ApiGateway {
                api_id: "api-1".into(),
                endpoint_types: vec!["PRIVATE".into()],
                vpc_endpoint_ids: vec!["vpce-missing".into(), "vpce-ok".into()],
                ..Default::default()
            },
            account: "111".into(),
        };
        let hops = hop.next_hops(&target(), Some(&ctx)).await.unwrap();
        assert_eq!(hops.len(), 1);
        assert_eq!(hops[0].id(), "vpce-ok");

        let hop = ApiGatewayHop {
            api: ApiGateway {
                api_id: "api-2".into(),
                endpoint_types: vec!["PRIVATE".into()],
                vpc_endpoint_ids: vec!["vpce-missing".into()],
                ..Default::default()
            },
            account: "111".into(),
        };
        assert!(hop
            .next_hops(&target(), Some(&ctx))
            .await
            .unwrap_err()
            .is_blocked());
    }

    #[tokio::test]
    async fn v2_link_falls_back_to_subnets() {
        let mut cloud = MockCloud::default();
        cloud.subnets.insert(
            "subnet-1".into(),
            crate::model::Subnet {
                subnet_id: "subnet-1".into(),
                vpc_id: "vpc-1".into(),
                ..Default::default()
            },
        );
        let ctx = AnalyzerContext::new("111", Arc::new(cloud));
        let hop = VpcLinkHop {
            link: VpcLink {
                link_id: "vpclink-1".into(),
                version: 2,
                target_arns: vec!["arn:aws:lambda:us-east-1:111:function:fn".into()],
                subnet_ids: vec!["subnet-1".into()],
                ..Default::default()
            },
            account: "111".into(),
        };
        let hops = hop.next_hops(&target(), Some(&ctx)).await.unwrap();
        assert_eq!(hops[0].kind(), "subnet");
    }

    #[tokio::test]
    async fn v1_link_resolves_balancer_targets() {
        let mut cloud = MockCloud::default();
        cloud.load_balancers.insert(
            "arn:aws:elasticloadbalancing:us-east-1:111:loadbalancer/net/nlb/abc".into(),
            LoadBalancer {
                id: "arn:aws:elasticloadbalancing:us-east-1:111:loadbalancer/net/nlb/abc".into(),
                kind: LoadBalancerKind::Network,
                ..Default::default()
            },
        );
        let ctx = AnalyzerContext::new("111", Arc::new(cloud));
        let hop = VpcLinkHop {
            link: VpcLink {
                link_id: "vpclink-1".into(),
                version: 1,
                target_arns: vec![
                    "arn:aws:elasticloadbalancing:us-east-1:111:loadbalancer/net/nlb/abc".into(),
                ],
                ..Default::default()
            },
            account: "111".into(),
        };
        let hops = hop.next_hops(&target(), Some(&ctx)).await.unwrap();
        assert_eq!(hops[0].kind(), "load-balancer");
    }

    #[tokio::test]
    async fn unsupported_link_version_blocks() {
        let ctx = AnalyzerContext::new("111", Arc::new(MockCloud::default()));
        let hop = VpcLinkHop {
            link: VpcLink {
                link_id: "vpclink-1".into(),
                version: 3,
                ..Default::default()
            },
            account: "111".into(),
        };
        assert!(hop
            .next_hops(&target(), Some(&ctx))
            .await
            .unwrap_err()
            .is_blocked());
    }
}
