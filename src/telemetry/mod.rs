//! Module for building the telemetry snapshot and reporting it to the collection endpoint.
//!
//! The snapshot ([Telemetry]) is built fresh for every report, serialized, posted and dropped:
//! - [Telemetry::new_zero] builds the cluster wide snapshot on a coordinator (zero).
//!   It returns `None` as long as the cluster has no cid.
//! - [Telemetry::new_alpha] builds the node local snapshot on a worker (alpha).
//! - [TelemetryClient::post] sends the snapshot in a single attempt.
//!
//! Every field that holds its zero value is left out of the json,
//! the collector distinguishes an absent field from an explicit zero.
//!
mod structs;
mod functions;
mod features;
mod client;

pub use structs::*;
pub use functions::*;
pub use features::*;
pub use client::*;
