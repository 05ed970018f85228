//! netreach - packet-level reachability analysis for cloud network
//! topologies
//!
//! Given a source component and a destination traffic descriptor, netreach
//! walks a graph of virtual networking primitives and reports either
//! delivery or the exact component and rule that blocked the traffic. No
//! packet is ever sent; everything is evaluated against read-only resource
//! snapshots fetched through an injected client.
//!
//! # Architecture (Hop Pipeline)
//!
//! ```text
//! Source adapter (EC2/RDS/Lambda/...)
//! → Security-group chain
//! → Subnet (NACL → route table)
//! → Gateway / transit gateway / endpoint / load balancer
//! → IP target leaf
//! ```
//!
//! ## Core Principles
//!
//! - Every primitive implements one contract: `next_hops(target, ctx)`
//! - Hop decisions depend only on the RoutingTarget and snapshots, no IO
//!   besides client lookups
//! - A block is a value (`Error::Blocked`), attributed to exactly one
//!   component; a failed lookup is inconclusive, never "blocked"
//! - Traversal is an explicit worklist with a caller-owned visited set
//!
//! ## Module Structure
//!
//! ```text
//! src/
//! ├── common/          # RoutingTarget, Direction, net arithmetic
//! ├── model/           # Resource snapshots (pure data)
//! ├── client/          # Injected lookup traits + AnalyzerContext
//! ├── component/       # The closed Component enum and every evaluator
//! └── walk.rs          # Worklist traversal driver
//! ```

// Core types
pub mod common;
pub mod error;

// Data and boundaries
pub mod client;
pub mod model;

// Hop resolution
pub mod component;
pub mod walk;

// Re-exports for convenience
pub use client::{AccountResolver, AnalyzerContext, CloudClient, DestinationResolver};
pub use common::{Direction, RoutingTarget};
pub use component::Component;
pub use error::{Error, LookupError, Result};
pub use walk::{walk, walk_path};
