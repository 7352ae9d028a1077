//! Report the telemetry snapshot of a cluster once.
//!
//! The membership state is read from a zero (`--hosts`/`--ports`), or from a saved `/state`
//! json file (`--state-file`).
use std::{collections::HashMap, path::PathBuf};
use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use log::*;
use anyhow::{Context, Result};

use cluster_telemetry::membership::MembershipState;
use cluster_telemetry::telemetry::{BuildInfo, Telemetry, TelemetryClient, TelemetryConfig};
use cluster_telemetry::utility;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Role {
    /// Cluster wide snapshot: topology and disk usage.
    Zero,
    /// Node local snapshot: enabled enterprise features.
    Alpha,
}

/// Build the telemetry snapshot of the cluster and post it to the collection endpoint.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Opts {
    /// hostnames of the zeros (comma separated)
    #[arg(short = 'H', long, value_name = "hostname,hostname")]
    hosts: Option<String>,
    /// http port numbers of the zeros (comma separated)
    #[arg(short, long, value_name = "port,port")]
    ports: Option<String>,
    /// read the membership state from a /state json file instead of a zero
    #[arg(long, value_name = "file")]
    state_file: Option<PathBuf>,
    /// the snapshot to build
    #[arg(long, value_enum, default_value_t = Role::Zero)]
    role: Role,
    /// enabled enterprise features, for the alpha snapshot (comma separated)
    #[arg(long, value_delimiter = ',', value_name = "feature,feature")]
    features: Vec<String>,
    /// collection endpoint url, without /pings or /dev
    #[arg(long, value_name = "url")]
    url: Option<String>,
    /// authorization token for the collection endpoint
    #[arg(long, value_name = "token")]
    auth_token: Option<String>,
    /// timeout for the report in seconds
    #[arg(long, value_name = "seconds")]
    timeout: Option<String>,
    /// print the snapshot json instead of posting it
    #[arg(long)]
    print: bool,
    /// write the options set to .env
    #[arg(long)]
    write_dotenv: bool,
}

fn main() -> Result<()>
{
    env_logger::init();
    dotenv().ok();
    let options = Opts::parse();

    let mut changed_options = HashMap::new();

    let membership_state = match &options.state_file {
        Some(path) => MembershipState::read_file(path)?,
        None => {
            let hosts = utility::set_hosts(&options.hosts, &mut changed_options);
            let ports = utility::set_ports(&options.ports, &mut changed_options);
            MembershipState::read_first_available(&hosts, &ports)?
        },
    };
    let config = TelemetryConfig::from_options(&options.url, &options.auth_token, &options.timeout, &mut changed_options)?;
    let build_info = BuildInfo::from_process();

    let telemetry = match options.role {
        Role::Zero => match Telemetry::new_zero(&membership_state, &build_info) {
            Some(telemetry) => telemetry,
            None => {
                warn!("The cluster has no cid yet, nothing to report");
                return utility::dotenv_writer(options.write_dotenv, changed_options);
            },
        },
        Role::Alpha => Telemetry::new_alpha(&membership_state, &build_info, &options.features),
    };

    if options.print {
        println!("{}", telemetry.to_json()?);
    } else {
        let client = TelemetryClient::new(config)?;
        let url = client.endpoint_url(&telemetry);
        client.post(&telemetry)
            .with_context(|| format!("Telemetry report to {} failed", url))?;
    }

    utility::dotenv_writer(options.write_dotenv, changed_options)?;
    Ok(())
}
