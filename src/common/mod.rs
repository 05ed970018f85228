//! Common types and utilities
//!
//! This module defines the types shared by every evaluator:
//! - RoutingTarget: the traffic descriptor hop decisions depend on
//! - Direction: which rule set a filter evaluates
//! - net: CIDR, protocol, port, and address-class arithmetic

pub mod net;
mod target;

pub use target::{Direction, RoutingTarget};

// Re-export error types from crate root
pub use crate::error::{Error, LookupError, Result};
