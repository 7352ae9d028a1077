//! Module for the cluster membership state, as served by the coordinator on `/state`.
//!
//! The membership state is the read-only view of the cluster topology the telemetry builders
//! work on ([MembershipState]):
//! - The cluster id (`cid`), which is empty until the coordination layer assigned one.
//! - The groups ([Group]), each with its members ([Member]) and tablets ([Tablet]).
//! - The coordinator (zero) nodes ([Member]).
//!
//! The membership state is read from:
//! - [MembershipState::read_http]: `http://<host>:<port>/state` of a coordinator.
//! - [MembershipState::read_file]: a saved copy of the same json.
//!
mod structs;
mod functions;

pub use structs::*;
pub use functions::*;
