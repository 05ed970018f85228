//! The IP leaf: the true traversal terminal

use std::net::IpAddr;

/// Generic IP target carrying the destination forward. Always returns zero
/// further hops.
#[derive(Debug, Clone)]
pub struct IpTargetHop {
    /// The address doubles as the component id
    pub id: String,
    pub ip: IpAddr,
    pub account: String,
}

impl IpTargetHop {
    pub fn new(ip: IpAddr) -> Self {
        Self {
            id: ip.to_string(),
            ip,
            account: String::new(),
        }
    }

    pub(super) fn next_hops(&self) -> crate::error::Result<Vec<super::Component>> {
        Ok(vec![])
    }
}
