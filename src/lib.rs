//! Cluster telemetry.
//!
//! Builds a point-in-time [telemetry::Telemetry] snapshot from the cluster membership
//! ([membership::MembershipState]) and posts it once to the collection endpoint
//! ([telemetry::TelemetryClient]).
//!
//! - [telemetry::Telemetry::new_zero]: cluster wide snapshot, built on the coordinator (zero).
//! - [telemetry::Telemetry::new_alpha]: node local snapshot, built on a worker (alpha).
//! - [telemetry::TelemetryClient::post]: a single POST, no retry.
//!
extern crate serde;
extern crate serde_json;
#[macro_use]
extern crate serde_derive;

pub mod membership;
pub mod telemetry;
pub mod utility;

/// Coordinator hosts used when neither `--hosts` nor `TELEMETRY_HOSTS` is set.
pub const DEFAULT_HOSTS: &str = "localhost";
/// Coordinator http ports used when neither `--ports` nor `TELEMETRY_PORTS` is set.
pub const DEFAULT_PORTS: &str = "6080";
/// Timeout for reading the membership state from a zero.
pub const DEFAULT_HTTP_GET_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);
