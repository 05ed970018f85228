//! VPC endpoints: policy evaluation + endpoint-type branching
//!
//! Gateway and gateway-load-balancer endpoints terminate in the IP leaf
//! after the policy verdict. Interface endpoints continue into their member
//! subnets behind the endpoint's security-group chain, except execute-api
//! endpoints, which first try to resolve the backing API gateway.

use std::net::IpAddr;

use serde_json::Value;
use tracing::warn;

use crate::client::{require, AnalyzerContext};
use crate::common::net::cidr_contains;
use crate::common::RoutingTarget;
use crate::error::{Error, Result};
use crate::model::VpcEndpoint;

use super::api_gateway::ApiGatewayHop;
use super::filter::SecurityGroupFilter;
use super::ip::IpTargetHop;
use super::subnet::SubnetHop;
use super::{account_or, Component};

use futures::future::try_join_all;

#[derive(Debug, Clone)]
pub struct VpcEndpointHop {
    pub endpoint: VpcEndpoint,
    pub account: String,
}

impl VpcEndpointHop {
    pub fn new(endpoint: VpcEndpoint, account: impl Into<String>) -> Self {
        Self {
            endpoint,
            account: account.into(),
        }
    }

    pub(super) fn kind(&self) -> &'static str {
        if self.endpoint.endpoint_type == "GatewayLoadBalancer" {
            "gateway-load-balancer-endpoint"
        } else {
            "vpc-endpoint"
        }
    }

    pub(super) async fn next_hops(
        &self,
        target: &RoutingTarget,
        ctx: Option<&AnalyzerContext>,
    ) -> Result<Vec<Component>> {
        if self.endpoint.state != "available" {
            return Err(Error::blocked(
                &self.endpoint.endpoint_id,
                format!("vpc endpoint is not available (state {})", self.endpoint.state),
            ));
        }
        let Some(ip) = target.ip else {
            return Err(Error::blocked(
                &self.endpoint.endpoint_id,
                "vpc endpoint requires a destination address".to_string(),
            ));
        };

        if let Some(document) = &self.endpoint.policy_document {
            self.evaluate_policy(document, ip)?;
        }

        if self.endpoint.endpoint_type != "Interface" {
            return Ok(vec![Component::IpTarget(IpTargetHop::new(ip))]);
        }

        let ctx = require(ctx, "interface endpoint resolution")?;

        // execute-api endpoints resolve straight to the API gateway when
        // one is known.
        if self.endpoint.is_execute_api() {
            let apis = self.resolve_apis(ctx).await?;
            if !apis.is_empty() {
                return Ok(apis);
            }
        }

        if self.endpoint.subnet_ids.is_empty() {
            return Err(Error::blocked(
                &self.endpoint.endpoint_id,
                "interface endpoint has no subnets".to_string(),
            ));
        }
        let groups = try_join_all(
            self.endpoint
                .security_group_ids
                .iter()
                .map(|id| ctx.client.get_security_group(id)),
        )
        .await?;
        let mut hops = Vec::with_capacity(self.endpoint.subnet_ids.len());
        for subnet_id in &self.endpoint.subnet_ids {
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

    async fn resolve_apis(&self, ctx: &AnalyzerContext) -> Result<Vec<Component>> {
        let mut apis = Vec::new();
        for api_id in &self.endpoint.api_ids {
            let api = match ctx.client.get_rest_api(api_id).await {
                Ok(api) => api,
                Err(crate::error::LookupError::NotFound { .. }) => {
                    match ctx.client.get_http_api(api_id).await {
                        Ok(api) => api,
                        Err(crate::error::LookupError::NotFound { .. }) => continue,
                        Err(err) => return Err(err.into()),
                    }
                }
                Err(err) => return Err(err.into()),
            };
            let account = account_or(&api.account, ctx);
            apis.push(Component::ApiGateway(ApiGatewayHop { api, account }));
        }
        Ok(apis)
    }

    /// Resource-policy verdict for `ip`.
    ///
    /// Matching explicit `Deny` statements always block. If any `Allow`
    /// statement exists, at least one must match; with none the document is
    /// default-allow. Malformed documents fail open: the evaluator is
    /// best-effort.
    fn evaluate_policy(&self, document: &str, ip: IpAddr) -> Result<()> {
        let parsed: Value = match serde_json::from_str(document) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    endpoint = %self.endpoint.endpoint_id,
                    %err,
                    "malformed endpoint policy, treating as allow"
                );
                return Ok(());
            }
        };

        let statements = match parsed.get("Statement") {
            Some(Value::Array(list)) => list.clone(),
            Some(single @ Value::Object(_)) => vec![single.clone()],
            _ => return Ok(()),
        };

        let mut saw_allow = false;
        let mut allow_matched = false;
        for statement in &statements {
            let effect = statement
                .get("Effect")
                .and_then(Value::as_str)
                .unwrap_or_default();
            match effect {
                "Deny" => {
                    if statement_matches_ip(statement, ip) {
                        return Err(Error::blocked(
                            &self.endpoint.endpoint_id,
                            format!("endpoint policy explicitly denies {ip}"),
                        ));
                    }
                }
                "Allow" => {
                    saw_allow = true;
                    if statement_matches_ip(statement, ip) {
                        allow_matched = true;
                    }
                }
                _ => {}
            }
        }

        if saw_allow && !allow_matched {
            return Err(Error::blocked(
                &self.endpoint.endpoint_id,
                format!("no endpoint policy statement allows {ip}"),
            ));
        }
        Ok(())
    }
}

/// Whether a statement's source-IP condition covers `ip`. A statement with
/// no such condition covers every address.
fn statement_matches_ip(statement: &Value, ip: IpAddr) -> bool {
    let Some(condition) = statement.get("Condition") else {
        return true;
    };
    let source_ips = condition
        .get("IpAddress")
        .and_then(|block| block.get("aws:SourceIp"));
    let Some(source_ips) = source_ips else {
        return true;
    };
    match source_ips {
        Value::String(cidr) => cidr_contains(cidr, ip),
        Value::Array(list) => list
            .iter()
            .filter_map(Value::as_str)
            .any(|cidr| cidr_contains(cidr, ip)),
        _ => true,
    }
}
