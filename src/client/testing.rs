//! In-memory client fixtures for tests

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;

use super::{AccountResolver, ClientResult, CloudClient};
use crate::error::LookupError;
use crate::model::*;

fn find<T: Clone>(map: &HashMap<String, T>, kind: &'static str, id: &str) -> ClientResult<T> {
    map.get(id)
        .cloned()
        .ok_or_else(|| LookupError::not_found(kind, id))
}

/// Fixture-backed [`CloudClient`]. Fill the maps, wrap in an `Arc`, inject.
#[derive(Default)]
pub struct MockCloud {
    pub security_groups: HashMap<String, SecurityGroup>,
    pub network_acls: HashMap<String, NetworkAcl>,
    pub network_firewalls: HashMap<String, NetworkFirewall>,
    pub vpcs: HashMap<String, Vpc>,
    pub subnets: HashMap<String, Subnet>,
    pub route_tables: HashMap<String, RouteTable>,
    pub prefix_lists: HashMap<String, PrefixList>,
    pub internet_gateways: HashMap<String, InternetGateway>,
    pub nat_gateways: HashMap<String, NatGateway>,
    pub carrier_gateways: HashMap<String, CarrierGateway>,
    pub local_gateways: HashMap<String, LocalGateway>,
    pub vpn_gateways: HashMap<String, VpnGateway>,
    /// Keyed by VPN gateway id
    pub vpn_connections: HashMap<String, Vec<VpnConnection>>,
    pub dx_gateways: HashMap<String, DirectConnectGateway>,
    /// Keyed by Direct Connect gateway id
    pub dx_attachments: HashMap<String, Vec<DxGatewayAttachment>>,
    pub vpc_endpoints: HashMap<String, VpcEndpoint>,
    pub vpc_peerings: HashMap<String, VpcPeering>,
    pub transit_gateways: HashMap<String, TransitGateway>,
    pub tgw_attachments: HashMap<String, TgwAttachment>,
    /// Keyed by transit gateway id
    pub tgw_route_tables: HashMap<String, Vec<TgwRouteTable>>,
    pub ec2_instances: HashMap<String, Ec2Instance>,
    pub rds_instances: HashMap<String, RdsInstance>,
    pub lambda_functions: HashMap<String, LambdaFunction>,
    pub eks_pods: HashMap<String, EksPod>,
    pub elasticache_clusters: HashMap<String, ElastiCacheCluster>,
    pub load_balancers: HashMap<String, LoadBalancer>,
    pub classic_load_balancers: HashMap<String, LoadBalancer>,
    pub target_groups: HashMap<String, TargetGroup>,
    pub rest_apis: HashMap<String, ApiGateway>,
    pub http_apis: HashMap<String, ApiGateway>,
    pub vpc_links: HashMap<String, VpcLink>,
    pub vpc_links_v2: HashMap<String, VpcLink>,
    pub enis: HashMap<String, Eni>,
}

#[async_trait]
impl CloudClient for MockCloud {
    async fn get_security_group(&self, id: &str) -> ClientResult<SecurityGroup> {
        find(&self.security_groups, "security group", id)
    }
    async fn get_network_acl(&self, id: &str) -> ClientResult<NetworkAcl> {
        find(&self.network_acls, "network acl", id)
    }
    async fn get_network_firewall(&self, id: &str) -> ClientResult<NetworkFirewall> {
        find(&self.network_firewalls, "network firewall", id)
    }
    async fn get_vpc(&self, id: &str) -> ClientResult<Vpc> {
        find(&self.vpcs, "vpc", id)
    }
    async fn get_subnet(&self, id: &str) -> ClientResult<Subnet> {
        find(&self.subnets, "subnet", id)
    }
    async fn get_route_table(&self, id: &str) -> ClientResult<RouteTable> {
        find(&self.route_tables, "route table", id)
    }
    async fn get_prefix_list(&self, id: &str) -> ClientResult<PrefixList> {
        find(&self.prefix_lists, "prefix list", id)
    }
    async fn get_internet_gateway(&self, id: &str) -> ClientResult<InternetGateway> {
        find(&self.internet_gateways, "internet gateway", id)
    }
    async fn get_nat_gateway(&self, id: &str) -> ClientResult<NatGateway> {
        find(&self.nat_gateways, "nat gateway", id)
    }
    async fn get_carrier_gateway(&self, id: &str) -> ClientResult<CarrierGateway> {
        find(&self.carrier_gateways, "carrier gateway", id)
    }
    async fn get_local_gateway(&self, id: &str) -> ClientResult<LocalGateway> {
        find(&self.local_gateways, "local gateway", id)
    }
    async fn get_vpn_gateway(&self, id: &str) -> ClientResult<VpnGateway> {
        find(&self.vpn_gateways, "vpn gateway", id)
    }
    async fn get_vpn_connections(&self, vpn_gateway_id: &str) -> ClientResult<Vec<VpnConnection>> {
        Ok(self
            .vpn_connections
            .get(vpn_gateway_id)
            .cloned()
            .unwrap_or_default())
    }
    async fn get_direct_connect_gateway(&self, id: &str) -> ClientResult<DirectConnectGateway> {
        find(&self.dx_gateways, "direct connect gateway", id)
    }
    async fn get_dx_gateway_attachments(
        &self,
        gateway_id: &str,
    ) -> ClientResult<Vec<DxGatewayAttachment>> {
        Ok(self
            .dx_attachments
            .get(gateway_id)
            .cloned()
            .unwrap_or_default())
    }
    async fn get_vpc_endpoint(&self, id: &str) -> ClientResult<VpcEndpoint> {
        find(&self.vpc_endpoints, "vpc endpoint", id)
    }
    async fn get_vpc_peering(&self, id: &str) -> ClientResult<VpcPeering> {
        find(&self.vpc_peerings, "vpc peering", id)
    }
    async fn get_transit_gateway(&self, id: &str) -> ClientResult<TransitGateway> {
        find(&self.transit_gateways, "transit gateway", id)
    }
    async fn get_tgw_attachment(&self, id: &str) -> ClientResult<TgwAttachment> {
        find(&self.tgw_attachments, "transit gateway attachment", id)
    }
    async fn get_tgw_vpc_attachment(
        &self,
        vpc_id: &str,
        tgw_id: &str,
    ) -> ClientResult<TgwAttachment> {
        self.tgw_attachments
            .values()
            .find(|att| {
                att.tgw_id == tgw_id && att.resource_type == "vpc" && att.resource_id == vpc_id
            })
            .cloned()
            .ok_or_else(|| LookupError::not_found("transit gateway vpc attachment", vpc_id))
    }
    async fn get_tgw_route_tables(&self, tgw_id: &str) -> ClientResult<Vec<TgwRouteTable>> {
        Ok(self
            .tgw_route_tables
            .get(tgw_id)
            .cloned()
            .unwrap_or_default())
    }
    async fn get_ec2_instance(&self, id: &str) -> ClientResult<Ec2Instance> {
        find(&self.ec2_instances, "ec2 instance", id)
    }
    async fn get_ec2_instance_by_ip(&self, ip: IpAddr) -> ClientResult<Ec2Instance> {
        let needle = ip.to_string();
        self.ec2_instances
            .values()
            .find(|instance| instance.private_ips.contains(&needle))
            .cloned()
            .ok_or_else(|| LookupError::not_found("ec2 instance", needle))
    }
    async fn get_rds_instance(&self, id: &str) -> ClientResult<RdsInstance> {
        find(&self.rds_instances, "rds instance", id)
    }
    async fn get_rds_instance_by_ip(&self, ip: IpAddr) -> ClientResult<RdsInstance> {
        Err(LookupError::not_found("rds instance", ip.to_string()))
    }
    async fn get_lambda_function(&self, name: &str) -> ClientResult<LambdaFunction> {
        find(&self.lambda_functions, "lambda function", name)
    }
    async fn get_lambda_function_by_ip(&self, ip: IpAddr) -> ClientResult<LambdaFunction> {
        Err(LookupError::not_found("lambda function", ip.to_string()))
    }
    async fn get_eks_pod_by_ip(&self, ip: IpAddr) -> ClientResult<EksPod> {
        let needle = ip.to_string();
        self.eks_pods
            .values()
            .find(|pod| pod.pod_ip == needle)
            .cloned()
            .ok_or_else(|| LookupError::not_found("eks pod", needle))
    }
    async fn get_elasticache_cluster(&self, id: &str) -> ClientResult<ElastiCacheCluster> {
        find(&self.elasticache_clusters, "elasticache cluster", id)
    }
    async fn get_load_balancer(&self, arn: &str) -> ClientResult<LoadBalancer> {
        find(&self.load_balancers, "load balancer", arn)
    }
    async fn get_load_balancer_by_ip(&self, ip: IpAddr) -> ClientResult<LoadBalancer> {
        Err(LookupError::not_found("load balancer", ip.to_string()))
    }
    async fn get_classic_load_balancer(&self, name: &str) -> ClientResult<LoadBalancer> {
        find(&self.classic_load_balancers, "classic load balancer", name)
    }
    async fn get_target_group(&self, arn: &str) -> ClientResult<TargetGroup> {
        find(&self.target_groups, "target group", arn)
    }
    async fn get_rest_api(&self, id: &str) -> ClientResult<ApiGateway> {
        find(&self.rest_apis, "rest api", id)
    }
    async fn get_http_api(&self, id: &str) -> ClientResult<ApiGateway> {
        find(&self.http_apis, "http api", id)
    }
    async fn get_vpc_link(&self, id: &str) -> ClientResult<VpcLink> {
        find(&self.vpc_links, "vpc link", id)
    }
    async fn get_vpc_link_v2(&self, id: &str) -> ClientResult<VpcLink> {
        find(&self.vpc_links_v2, "vpc link v2", id)
    }
    async fn get_eni(&self, id: &str) -> ClientResult<Eni> {
        find(&self.enis, "network interface", id)
    }
    async fn get_enis_by_security_group(&self, sg_id: &str) -> ClientResult<Vec<Eni>> {
        Ok(self
            .enis
            .values()
            .filter(|eni| eni.security_group_ids.iter().any(|id| id == sg_id))
            .cloned()
            .collect())
    }
}

/// Fixture-backed [`AccountResolver`].
#[derive(Default)]
pub struct MockAccounts {
    pub clients: HashMap<String, Arc<MockCloud>>,
}

#[async_trait]
impl AccountResolver for MockAccounts {
    async fn client_for_account(&self, account_id: &str) -> ClientResult<Arc<dyn CloudClient>> {
        self.clients
            .get(account_id)
            .map(|client| client.clone() as Arc<dyn CloudClient>)
            .ok_or_else(|| LookupError::NoAccount(account_id.to_string()))
    }

    async fn assume_role(
        &self,
        account_id: &str,
        _role_arn: &str,
    ) -> ClientResult<Arc<dyn CloudClient>> {
        self.client_for_account(account_id).await
    }
}
