//! The structs
//!
use std::time::Duration;

/// The default collection endpoint. The `/pings` or `/dev` suffix is added per report.
pub const DEFAULT_TELEMETRY_URL: &str = "https://ping.dgraph.io/3.0/projects/5b809dfac9e77c0001783ad0/events";
/// The default hard timeout for a single report.
pub const DEFAULT_TELEMETRY_TIMEOUT: Duration = Duration::from_secs(10);
/// The version reported by builds without release version.
/// Reports from such builds go to the `/dev` endpoint.
pub const DEV_VERSION: &str = "dev";

/// The telemetry snapshot.
///
/// A zero snapshot looks like:
///
/// ```text
/// {
///     "Arch": "amd64",
///     "Cid": "abc123",
///     "ClusterSize": 4,
///     "DiskUsageMB": 512,
///     "NumAlphas": 3,
///     "NumGroups": 2,
///     "NumTablets": 17,
///     "NumZeros": 1,
///     "OS": "linux",
///     "Version": "v24.0.0",
///     "Codename": "rocket"
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Telemetry {
    #[serde(rename = "Arch", default, skip_serializing_if = "String::is_empty")]
    pub arch: String,
    #[serde(rename = "Cid", default, skip_serializing_if = "String::is_empty")]
    pub cid: String,
    /// NumAlphas + NumZeros.
    #[serde(rename = "ClusterSize", default, skip_serializing_if = "is_zero_i64")]
    pub cluster_size: i64,
    /// Sum of the on disk bytes of all tablets, divided by 2^20 (truncated).
    #[serde(rename = "DiskUsageMB", default, skip_serializing_if = "is_zero_i64")]
    pub disk_usage_mb: i64,
    #[serde(rename = "NumAlphas", default, skip_serializing_if = "is_zero_i64")]
    pub num_alphas: i64,
    #[serde(rename = "NumGroups", default, skip_serializing_if = "is_zero_i64")]
    pub num_groups: i64,
    #[serde(rename = "NumTablets", default, skip_serializing_if = "is_zero_i64")]
    pub num_tablets: i64,
    #[serde(rename = "NumZeros", default, skip_serializing_if = "is_zero_i64")]
    pub num_zeros: i64,
    #[serde(rename = "OS", default, skip_serializing_if = "String::is_empty")]
    pub os: String,
    #[serde(rename = "SinceHours", default, skip_serializing_if = "is_zero_i64")]
    pub since_hours: i64,
    #[serde(rename = "Version", default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(rename = "NumDQL", default, skip_serializing_if = "is_zero_u64")]
    pub num_dql: u64,
    #[serde(rename = "NumGraphQL", default, skip_serializing_if = "is_zero_u64")]
    pub num_graphql: u64,
    #[serde(rename = "EEFeaturesList", default, skip_serializing_if = "Vec::is_empty")]
    pub ee_features_list: Vec<String>,
    #[serde(rename = "Codename", default, skip_serializing_if = "String::is_empty")]
    pub codename: String,
}

fn is_zero_i64(value: &i64) -> bool {
    *value == 0
}

fn is_zero_u64(value: &u64) -> bool {
    *value == 0
}

/// Build provenance of the running process.
///
/// Read once and handed to the builders, so the builders stay pure.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: String,
    pub codename: String,
    /// Operating system family, in the collector's naming (`linux`, `darwin`, `windows`).
    pub os: String,
    /// CPU architecture, in the collector's naming (`amd64`, `arm64`).
    pub arch: String,
}

/// Where and how to report.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// The endpoint base url, without the `/pings` or `/dev` suffix.
    pub url: String,
    /// Sent as is in the `Authorization` header.
    pub auth_token: String,
    pub timeout: Duration,
}
