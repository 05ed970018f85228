//! Injected lookup boundary
//!
//! The core never talks to a cloud API directly. Everything it knows about
//! the topology arrives through [`CloudClient`], one fetch-by-id method per
//! resource kind, injected by the caller. Cross-account traversal goes
//! through [`AccountResolver`]; callers with their own resource index can
//! short-circuit `local`-route resolution with a [`DestinationResolver`].
//!
//! All methods are async and cancellation-safe: dropping the traversal
//! future abandons any in-flight lookup.

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::component::Component;
use crate::error::LookupError;
use crate::model::*;

#[cfg(test)]
pub(crate) mod testing;

/// Result type on the client boundary.
pub type ClientResult<T> = std::result::Result<T, LookupError>;

/// The lookup surface the core consumes.
///
/// Each method returns the resource snapshot or a [`LookupError`]; the core
/// treats every failure here as inconclusive, never as "blocked". Retry
/// policy, caching, and credentials are the implementor's concern.
#[async_trait]
pub trait CloudClient: Send + Sync {
    async fn get_security_group(&self, id: &str) -> ClientResult<SecurityGroup>;
    async fn get_network_acl(&self, id: &str) -> ClientResult<NetworkAcl>;
    async fn get_network_firewall(&self, id: &str) -> ClientResult<NetworkFirewall>;

    async fn get_vpc(&self, id: &str) -> ClientResult<Vpc>;
    async fn get_subnet(&self, id: &str) -> ClientResult<Subnet>;
    async fn get_route_table(&self, id: &str) -> ClientResult<RouteTable>;
    async fn get_prefix_list(&self, id: &str) -> ClientResult<PrefixList>;

    async fn get_internet_gateway(&self, id: &str) -> ClientResult<InternetGateway>;
    async fn get_nat_gateway(&self, id: &str) -> ClientResult<NatGateway>;
    async fn get_carrier_gateway(&self, id: &str) -> ClientResult<CarrierGateway>;
    async fn get_local_gateway(&self, id: &str) -> ClientResult<LocalGateway>;
    async fn get_vpn_gateway(&self, id: &str) -> ClientResult<VpnGateway>;
    async fn get_vpn_connections(&self, vpn_gateway_id: &str) -> ClientResult<Vec<VpnConnection>>;
    async fn get_direct_connect_gateway(&self, id: &str) -> ClientResult<DirectConnectGateway>;
    async fn get_dx_gateway_attachments(
        &self,
        gateway_id: &str,
    ) -> ClientResult<Vec<DxGatewayAttachment>>;

    async fn get_vpc_endpoint(&self, id: &str) -> ClientResult<VpcEndpoint>;
    async fn get_vpc_peering(&self, id: &str) -> ClientResult<VpcPeering>;

    async fn get_transit_gateway(&self, id: &str) -> ClientResult<TransitGateway>;
    async fn get_tgw_attachment(&self, id: &str) -> ClientResult<TgwAttachment>;
    /// Attachment binding `vpc_id` to `tgw_id`, for target-side entry.
    async fn get_tgw_vpc_attachment(
        &self,
        vpc_id: &str,
        tgw_id: &str,
    ) -> ClientResult<TgwAttachment>;
    async fn get_tgw_route_tables(&self, tgw_id: &str) -> ClientResult<Vec<TgwRouteTable>>;

    async fn get_ec2_instance(&self, id: &str) -> ClientResult<Ec2Instance>;
    async fn get_ec2_instance_by_ip(&self, ip: IpAddr) -> ClientResult<Ec2Instance>;
    async fn get_rds_instance(&self, id: &str) -> ClientResult<RdsInstance>;
    async fn get_rds_instance_by_ip(&self, ip: IpAddr) -> ClientResult<RdsInstance>;
    async fn get_lambda_function(&self, name: &str) -> ClientResult<LambdaFunction>;
    async fn get_lambda_function_by_ip(&self, ip: IpAddr) -> ClientResult<LambdaFunction>;
    async fn get_eks_pod_by_ip(&self, ip: IpAddr) -> ClientResult<EksPod>;
    async fn get_elasticache_cluster(&self, id: &str) -> ClientResult<ElastiCacheCluster>;

    async fn get_load_balancer(&self, arn: &str) -> ClientResult<LoadBalancer>;
    async fn get_load_balancer_by_ip(&self, ip: IpAddr) -> ClientResult<LoadBalancer>;
    async fn get_classic_load_balancer(&self, name: &str) -> ClientResult<LoadBalancer>;
    async fn get_target_group(&self, arn: &str) -> ClientResult<TargetGroup>;

    async fn get_rest_api(&self, id: &str) -> ClientResult<ApiGateway>;
    async fn get_http_api(&self, id: &str) -> ClientResult<ApiGateway>;
    async fn get_vpc_link(&self, id: &str) -> ClientResult<VpcLink>;
    async fn get_vpc_link_v2(&self, id: &str) -> ClientResult<VpcLink>;

    async fn get_eni(&self, id: &str) -> ClientResult<Eni>;
    async fn get_enis_by_security_group(&self, sg_id: &str) -> ClientResult<Vec<Eni>>;
}

/// Resolves account ids to clients, enabling cross-account hops.
#[async_trait]
pub trait AccountResolver: Send + Sync {
    /// Client scoped to `account_id`.
    async fn client_for_account(&self, account_id: &str) -> ClientResult<Arc<dyn CloudClient>>;

    /// Client obtained by assuming `role_arn` in `account_id`.
    async fn assume_role(
        &self,
        account_id: &str,
        role_arn: &str,
    ) -> ClientResult<Arc<dyn CloudClient>>;
}

/// Optional short-circuit for `local` routes: map a destination IP straight
/// to a concrete component using the caller's own resource index.
#[async_trait]
pub trait DestinationResolver: Send + Sync {
    /// `Ok(None)` means "no opinion, fall back to the generic leaf".
    async fn resolve(&self, ip: IpAddr, account_id: &str) -> ClientResult<Option<Component>>;
}

/// Everything a hop needs to look further: the current account's client plus
/// the optional cross-account and destination resolvers.
///
/// Threaded as `Option<&AnalyzerContext>` through every hop call. Filters
/// degrade gracefully without one (reference and prefix-list rules never
/// match); lookup-dependent components fail with
/// [`LookupError::NoContext`].
#[derive(Clone)]
pub struct AnalyzerContext {
    pub account_id: String,
    pub client: Arc<dyn CloudClient>,
    accounts: Option<Arc<dyn AccountResolver>>,
    destinations: Option<Arc<dyn DestinationResolver>>,
}

impl AnalyzerContext {
    pub fn new(account_id: impl Into<String>, client: Arc<dyn CloudClient>) -> Self {
        Self {
            account_id: account_id.into(),
            client,
            accounts: None,
            destinations: None,
        }
    }

    /// Builder: enable cross-account traversal
    pub fn with_account_resolver(mut self, resolver: Arc<dyn AccountResolver>) -> Self {
        self.accounts = Some(resolver);
        self
    }

    /// Builder: enable caller-owned destination resolution
    pub fn with_destination_resolver(mut self, resolver: Arc<dyn DestinationResolver>) -> Self {
        self.destinations = Some(resolver);
        self
    }

    /// Context for another account, through the account resolver. The same
    /// account returns a clone of this context.
    pub async fn for_account(&self, account_id: &str) -> ClientResult<AnalyzerContext> {
        if account_id.is_empty() || account_id == self.account_id {
            return Ok(self.clone());
        }
        let resolver = self
            .accounts
            .as_ref()
            .ok_or_else(|| LookupError::NoAccount(account_id.to_string()))?;
        let client = resolver.client_for_account(account_id).await?;
        Ok(AnalyzerContext {
            account_id: account_id.to_string(),
            client,
            accounts: self.accounts.clone(),
            destinations: self.destinations.clone(),
        })
    }

    /// Ask the destination resolver for a concrete component, if one is
    /// injected.
    pub async fn resolve_destination(&self, ip: IpAddr) -> ClientResult<Option<Component>> {
        match &self.destinations {
            Some(resolver) => resolver.resolve(ip, &self.account_id).await,
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for AnalyzerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerContext")
            .field("account_id", &self.account_id)
            .field("accounts", &self.accounts.is_some())
            .field("destinations", &self.destinations.is_some())
            .finish()
    }
}

/// Context lookup helper: components whose operation fundamentally needs the
/// client use this to turn a missing context into a lookup failure.
pub(crate) fn require<'a>(
    ctx: Option<&'a AnalyzerContext>,
    what: &'static str,
) -> std::result::Result<&'a AnalyzerContext, LookupError> {
    ctx.ok_or(LookupError::NoContext(what))
}
