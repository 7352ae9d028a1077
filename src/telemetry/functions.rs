//! The impls and functions
//!
use std::{collections::HashMap, env, time::Duration};
use chrono::{DateTime, Utc};
use log::*;
use anyhow::{Context, Result};
use crate::utility;
use crate::membership::MembershipState;
use crate::telemetry::{Telemetry, BuildInfo, TelemetryConfig, FeatureFlags, DEFAULT_TELEMETRY_URL, DEFAULT_TELEMETRY_TIMEOUT, DEV_VERSION};

const BYTES_PER_MB: i64 = 1 << 20;

impl Telemetry {
    pub fn new() -> Self {
        Default::default()
    }
    /// The cluster wide snapshot, built from the membership state on a zero.
    ///
    /// Returns `None` if the cluster has no cid yet: there is nothing to report until it has.
    /// Alphas are counted per group, an alpha listed in multiple groups is counted multiple times.
    /// The disk usage saturates at `i64::MAX` bytes.
    pub fn new_zero(
        membership_state: &MembershipState,
        build_info: &BuildInfo,
    ) -> Option<Telemetry>
    {
        if membership_state.cid().is_empty() {
            debug!("No cid found yet");
            return None;
        }
        let mut telemetry = Telemetry {
            cid: membership_state.cid().to_string(),
            num_groups: membership_state.groups().len() as i64,
            num_zeros: membership_state.zeros().len() as i64,
            version: build_info.version.clone(),
            os: build_info.os.clone(),
            arch: build_info.arch.clone(),
            codename: build_info.codename.clone(),
            ..Default::default()
        };
        let mut disk_usage_bytes: i64 = 0;
        for group in membership_state.groups() {
            telemetry.num_alphas += group.members().len() as i64;
            for tablet in group.tablets() {
                telemetry.num_tablets += 1;
                disk_usage_bytes = disk_usage_bytes.saturating_add(tablet.on_disk_bytes());
            }
        }
        telemetry.disk_usage_mb = disk_usage_bytes / BYTES_PER_MB;
        telemetry.cluster_size = telemetry.num_alphas + telemetry.num_zeros;
        Some(telemetry)
    }
    /// The node local snapshot, built on an alpha.
    ///
    /// The cid is passed on as is, also when it is still empty.
    pub fn new_alpha<F>(
        membership_state: &MembershipState,
        build_info: &BuildInfo,
        feature_flags: &F,
    ) -> Telemetry
    where
        F: FeatureFlags + ?Sized,
    {
        Telemetry {
            cid: membership_state.cid().to_string(),
            version: build_info.version.clone(),
            os: build_info.os.clone(),
            arch: build_info.arch.clone(),
            ee_features_list: feature_flags.features_list(),
            codename: build_info.codename.clone(),
            ..Default::default()
        }
    }
    pub fn with_query_counts(
        mut self,
        num_dql: u64,
        num_graphql: u64,
    ) -> Self
    {
        self.num_dql = num_dql;
        self.num_graphql = num_graphql;
        self
    }
    /// Set `SinceHours` to the whole hours between `start` and `now`.
    /// A `start` in the future counts as zero hours.
    pub fn with_since(
        mut self,
        start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self
    {
        self.since_hours = (now - start).num_hours().max(0);
        self
    }
    /// The compact json body, without the fields holding a zero value.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .with_context(|| "Error serializing telemetry")
    }
    /// Development builds report to a separate endpoint, so they do not end up between
    /// the real deployments.
    pub fn endpoint_suffix(&self) -> &'static str {
        if self.version == DEV_VERSION {
            "/dev"
        } else {
            "/pings"
        }
    }
}

impl BuildInfo {
    /// The build info of this process.
    ///
    /// Version and codename are set at build time with the `TELEMETRY_BUILD_VERSION` and
    /// `TELEMETRY_BUILD_CODENAME` environment variables, and are `dev` if these are not set.
    pub fn from_process() -> Self {
        BuildInfo {
            version: option_env!("TELEMETRY_BUILD_VERSION").unwrap_or(DEV_VERSION).to_string(),
            codename: option_env!("TELEMETRY_BUILD_CODENAME").unwrap_or(DEV_VERSION).to_string(),
            os: collector_os_name(env::consts::OS).to_string(),
            arch: collector_arch_name(env::consts::ARCH).to_string(),
        }
    }
}

/// The collector groups on the operating system names it has always received.
pub fn collector_os_name(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

/// The collector groups on the architecture names it has always received.
pub fn collector_arch_name(arch: &str) -> &str {
    match arch {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        other => other,
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        TelemetryConfig {
            url: DEFAULT_TELEMETRY_URL.to_string(),
            auth_token: option_env!("TELEMETRY_AUTH_TOKEN").unwrap_or_default().to_string(),
            timeout: DEFAULT_TELEMETRY_TIMEOUT,
        }
    }
}

impl TelemetryConfig {
    /// The configuration from the environment (and `.env`), or the defaults.
    pub fn from_env() -> Result<Self> {
        TelemetryConfig::from_options(&None, &None, &None, &mut HashMap::new())
    }
    /// The configuration from the options if set, otherwise from the environment (and `.env`),
    /// otherwise the defaults.
    ///
    /// Options that are set are added to `changed_options`, with the exception of the
    /// auth token, which is never written to `.env`.
    pub fn from_options(
        url: &Option<String>,
        auth_token: &Option<String>,
        timeout: &Option<String>,
        changed_options: &mut HashMap<&str, String>,
    ) -> Result<Self>
    {
        let default = TelemetryConfig::default();

        let url = utility::set_option(url, "TELEMETRY_URL", &default.url, changed_options);

        let auth_token = match auth_token {
            Some(auth_token) => {
                info!("auth-token argument set");
                auth_token.clone()
            },
            None => match env::var("TELEMETRY_AUTH_TOKEN") {
                Ok(set_var) => {
                    info!("auth-token not set: set via .env: TELEMETRY_AUTH_TOKEN");
                    set_var
                },
                Err(_e) => {
                    info!("auth-token not set: and not set via .env: using build time token");
                    default.auth_token
                },
            },
        };

        if auth_token.is_empty() {
            warn!("auth-token is empty: the collection endpoint will reject the reports, set TELEMETRY_AUTH_TOKEN");
        }

        let timeout_string = utility::set_option(timeout, "TELEMETRY_TIMEOUT", &default.timeout.as_secs().to_string(), changed_options);
        let timeout_secs: u64 = timeout_string.parse()
            .with_context(|| format!("Invalid telemetry timeout (seconds): {}", timeout_string))?;

        Ok(TelemetryConfig {
            url,
            auth_token,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
