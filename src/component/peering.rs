//! VPC peering passthrough

use crate::client::{require, AnalyzerContext};
use crate::common::net::cidr_contains;
use crate::common::RoutingTarget;
use crate::error::{Error, Result};
use crate::model::VpcPeering;

use super::ip::IpTargetHop;
use super::Component;

/// Peering hop: state check, destination inside one of the peered VPCs,
/// then forward into the peer.
#[derive(Debug, Clone)]
pub struct VpcPeeringHop {
    pub peering: VpcPeering,
    pub account: String,
}

impl VpcPeeringHop {
    pub(super) async fn next_hops(
        &self,
        target: &RoutingTarget,
        ctx: Option<&AnalyzerContext>,
    ) -> Result<Vec<Component>> {
        if !self.peering.status.is_empty() && self.peering.status != "active" {
            return Err(Error::blocked(
                &self.peering.peering_id,
                format!("vpc peering is not active (status {})", self.peering.status),
            ));
        }
        let Some(ip) = target.ip else {
            return Err(Error::blocked(
                &self.peering.peering_id,
                "vpc peering requires a destination address".to_string(),
            ));
        };

        let known_ranges = self
            .peering
            .requester_cidrs
            .iter()
            .chain(self.peering.accepter_cidrs.iter());
        let mut has_ranges = false;
        let mut contained = false;
        for cidr in known_ranges {
            has_ranges = true;
            if cidr_contains(cidr, ip) {
                contained = true;
                break;
            }
        }
        if has_ranges && !contained {
            return Err(Error::blocked(
                &self.peering.peering_id,
                format!("{ip} is outside both peered VPC ranges"),
            ));
        }

        // Same continuation as a local route: the caller's index if
        // injected, else the generic leaf.
        let ctx = require(ctx, "vpc peering resolution")?;
        match ctx.resolve_destination(ip).await? {
            Some(component) => Ok(vec![component]),
            None => Ok(vec![Component::IpTarget(IpTargetHop::new(ip))]),
        }
    }
}
