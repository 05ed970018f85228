//! Rule-matching filter components
//!
//! Security groups, network ACLs, and network firewalls share the same
//! shape: evaluate the direction-scoped rule set against the traffic
//! descriptor, then either hand off to the pre-wired `next` component or
//! end the chain. They differ in rule semantics:
//!
//! - security groups have unordered allow rules; any match admits traffic
//! - NACLs have numbered allow/deny rules; the lowest-numbered match wins
//! - firewalls have priority-ordered pass/drop rules with a default action

use futures::future::try_join_all;
use tracing::trace;

use crate::client::AnalyzerContext;
use crate::common::net::{cidr_contains, port_in_range, protocols_match};
use crate::common::{Direction, RoutingTarget};
use crate::error::{Error, Result};
use crate::model::{
    FirewallAction, NaclRule, NetworkAcl, NetworkFirewall, RuleAction, SecurityGroup,
    SecurityGroupRule,
};

use super::Component;

/// Security-group filter, optionally chained to a successor.
#[derive(Debug, Clone)]
pub struct SecurityGroupFilter {
    pub group: SecurityGroup,
    pub account: String,
    pub next: Option<Box<Component>>,
}

impl SecurityGroupFilter {
    pub fn new(group: SecurityGroup, account: impl Into<String>) -> Self {
        Self {
            group,
            account: account.into(),
            next: None,
        }
    }

    pub fn with_next(mut self, next: Component) -> Self {
        self.next = Some(Box::new(next));
        self
    }

    /// Wire `groups` into a chain ending in `tail`, preserving evaluation
    /// order: the first group of the slice is evaluated first. Returns
    /// `tail` unchanged when there are no groups.
    pub fn chain(groups: Vec<SecurityGroup>, account: &str, tail: Component) -> Component {
        let mut next = tail;
        for group in groups.into_iter().rev() {
            next = Component::SecurityGroup(SecurityGroupFilter::new(group, account).with_next(next));
        }
        next
    }

    pub(super) async fn next_hops(
        &self,
        target: &RoutingTarget,
        ctx: Option<&AnalyzerContext>,
    ) -> Result<Vec<Component>> {
        let rules = match target.direction {
            Direction::Outbound => &self.group.outbound_rules,
            Direction::Inbound => &self.group.inbound_rules,
        };

        for rule in rules {
            if self.rule_allows(rule, target, ctx).await? {
                trace!(
                    group = %self.group.group_id,
                    %target,
                    "security group rule allows"
                );
                return Ok(self.next.iter().map(|next| (**next).clone()).collect());
            }
        }

        Err(Error::blocked(
            &self.group.group_id,
            format!(
                "no {} rule allows traffic to {}",
                target.direction,
                target.ip_display()
            ),
        ))
    }

    /// One rule against the descriptor. Reference and prefix-list classes
    /// need the client; without a context they never match.
    async fn rule_allows(
        &self,
        rule: &SecurityGroupRule,
        target: &RoutingTarget,
        ctx: Option<&AnalyzerContext>,
    ) -> Result<bool> {
        if !protocols_match(&rule.protocol, &target.protocol) {
            return Ok(false);
        }
        if !port_in_range(rule.from_port, rule.to_port, target.port) {
            return Ok(false);
        }
        let Some(ip) = target.ip else {
            return Ok(false);
        };

        if rule.cidrs.iter().any(|cidr| cidr_contains(cidr, ip))
            || rule.ipv6_cidrs.iter().any(|cidr| cidr_contains(cidr, ip))
        {
            return Ok(true);
        }

        let Some(ctx) = ctx else {
            return Ok(false);
        };

        // Referenced groups match through the private IPs of their ENIs.
        if !rule.security_group_ids.is_empty() {
            let needle = ip.to_string();
            let lookups = rule
                .security_group_ids
                .iter()
                .map(|id| ctx.client.get_enis_by_security_group(id));
            for enis in try_join_all(lookups).await? {
                let hit = enis
                    .iter()
                    .flat_map(|eni| eni.private_ips())
                    .any(|private| private == needle);
                if hit {
                    return Ok(true);
                }
            }
        }

        for list_id in &rule.prefix_list_ids {
            let list = ctx.client.get_prefix_list(list_id).await?;
            if list.entries.iter().any(|cidr| cidr_contains(cidr, ip)) {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

/// Network ACL filter, optionally chained to a successor.
#[derive(Debug, Clone)]
pub struct NaclFilter {
    pub acl: NetworkAcl,
    pub account: String,
    pub next: Option<Box<Component>>,
}

impl NaclFilter {
    pub fn new(acl: NetworkAcl, account: impl Into<String>) -> Self {
        Self {
            acl,
            account: account.into(),
            next: None,
        }
    }

    pub fn with_next(mut self, next: Component) -> Self {
        self.next = Some(Box::new(next));
        self
    }

    pub(super) fn next_hops(&self, target: &RoutingTarget) -> Result<Vec<Component>> {
        let mut rules: Vec<&NaclRule> = match target.direction {
            Direction::Outbound => &self.acl.outbound_rules,
            Direction::Inbound => &self.acl.inbound_rules,
        }
        .iter()
        .collect();
        // Source order is not assumed sorted.
        rules.sort_by_key(|rule| rule.rule_number);

        for rule in rules {
            if !Self::rule_matches(rule, target) {
                continue;
            }
            return match rule.action {
                RuleAction::Allow => {
                    trace!(
                        acl = %self.acl.acl_id,
                        rule = rule.rule_number,
                        %target,
                        "nacl rule allows"
                    );
                    Ok(self.next.iter().map(|next| (**next).clone()).collect())
                }
                RuleAction::Deny => Err(Error::blocked(
                    &self.acl.acl_id,
                    format!(
                        "rule {} denies {} traffic to {}",
                        rule.rule_number,
                        target.direction,
                        target.ip_display()
                    ),
                )),
            };
        }

        Err(Error::blocked(
            &self.acl.acl_id,
            format!(
                "no rule matches {} traffic to {} (implicit deny)",
                target.direction,
                target.ip_display()
            ),
        ))
    }

    fn rule_matches(rule: &NaclRule, target: &RoutingTarget) -> bool {
        if !protocols_match(&rule.protocol, &target.protocol) {
            return false;
        }
        if !port_in_range(rule.from_port, rule.to_port, target.port) {
            return false;
        }
        let Some(ip) = target.ip else {
            return false;
        };
        // A rule must match at least one of its address-family blocks.
        rule.cidr_block
            .iter()
            .chain(rule.ipv6_cidr_block.iter())
            .any(|cidr| cidr_contains(cidr, ip))
    }
}

/// Network firewall filter, optionally chained to a successor.
#[derive(Debug, Clone)]
pub struct FirewallFilter {
    pub firewall: NetworkFirewall,
    pub account: String,
    pub next: Option<Box<Component>>,
}

impl FirewallFilter {
    pub fn new(firewall: NetworkFirewall, account: impl Into<String>) -> Self {
        Self {
            firewall,
            account: account.into(),
            next: None,
        }
    }

    pub fn with_next(mut self, next: Component) -> Self {
        self.next = Some(Box::new(next));
        self
    }

    pub(super) fn next_hops(&self, target: &RoutingTarget) -> Result<Vec<Component>> {
        let mut rules: Vec<_> = self.firewall.rules.iter().collect();
        rules.sort_by_key(|rule| rule.priority);

        for rule in rules {
            if !protocols_match(&rule.protocol, &target.protocol)
                || !port_in_range(rule.from_port, rule.to_port, target.port)
            {
                continue;
            }
            // An empty destination list matches any address.
            let dest_match = rule.destination_cidrs.is_empty()
                || target.ip.is_some_and(|ip| {
                    rule.destination_cidrs.iter().any(|cidr| cidr_contains(cidr, ip))
                });
            if !dest_match {
                continue;
            }
            return match rule.action {
                FirewallAction::Pass => {
                    Ok(self.next.iter().map(|next| (**next).clone()).collect())
                }
                FirewallAction::Drop => Err(Error::blocked(
                    &self.firewall.firewall_id,
                    format!(
                        "firewall rule priority {} drops traffic to {}",
                        rule.priority,
                        target.ip_display()
                    ),
                )),
            };
        }

        match self.firewall.default_action {
            FirewallAction::Pass => Ok(self.next.iter().map(|next| (**next).clone()).collect()),
            FirewallAction::Drop => Err(Error::blocked(
                &self.firewall.firewall_id,
                format!(
                    "no firewall rule matches traffic to {} and the default action drops",
                    target.ip_display()
                ),
            )),
        }
    }
}
