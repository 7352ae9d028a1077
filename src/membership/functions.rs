//! The impls and functions
//!
use std::{collections::btree_map::Values, fs, path::Path, time::Instant};
use log::*;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer};
use crate::utility;
use crate::membership::{MembershipState, Group, Member, Tablet};

impl MembershipState {
    pub fn new() -> Self {
        Default::default()
    }
    /// The cluster id. An empty string means the coordination layer did not assign one yet.
    pub fn cid(&self) -> &str {
        &self.cid
    }
    pub fn groups(&self) -> Values<'_, String, Group> {
        self.groups.values()
    }
    pub fn zeros(&self) -> Values<'_, String, Member> {
        self.zeros.values()
    }
    pub fn read_http(
        host: &str,
        port: &str,
    ) -> Result<MembershipState>
    {
        let data_from_http = utility::http_get(host, port, "state")?;
        MembershipState::parse_membership_state(&data_from_http)
            .with_context(|| format!("({}:{}) could not parse /state json data", host, port))
    }
    pub fn read_file(
        path: &Path,
    ) -> Result<MembershipState>
    {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Error reading file: {}", path.display()))?;
        MembershipState::parse_membership_state(&data)
            .with_context(|| format!("Error parsing membership state in file: {}", path.display()))
    }
    /// Read the membership state from the first host:port combination that answers.
    pub fn read_first_available(
        hosts: &[String],
        ports: &[String],
    ) -> Result<MembershipState>
    {
        info!("begin membership state read");
        let timer = Instant::now();

        let mut failures: Vec<String> = Vec::new();
        for host in hosts {
            for port in ports {
                match MembershipState::read_http(host, port) {
                    Ok(membership_state) => {
                        info!("end membership state read from {}:{}: {:?}", host, port, timer.elapsed());
                        return Ok(membership_state);
                    },
                    Err(e) => {
                        warn!("({}:{}) no membership state, skipping: {:#}", host, port, e);
                        failures.push(format!("({}:{}) {:#}", host, port, e));
                    },
                }
            }
        }
        bail!("No membership state could be read from hosts: {} ports: {}: {}", hosts.join(","), ports.join(","), failures.join("; "))
    }
    fn parse_membership_state(
        json: &str,
    ) -> Result<MembershipState>
    {
        Ok(serde_json::from_str(json)?)
    }
}

impl Group {
    pub fn members(&self) -> Values<'_, String, Member> {
        self.members.values()
    }
    pub fn tablets(&self) -> Values<'_, String, Tablet> {
        self.tablets.values()
    }
}

impl Tablet {
    pub fn on_disk_bytes(&self) -> i64 {
        self.on_disk_bytes
    }
}

/// The `/state` json encodes 64 bit integers as strings, hand built json often uses numbers.
pub fn deserialize_i64_from_string_or_number<'de, D>(
    deserializer: D,
) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(i64),
    }

    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(string) if string.is_empty() => Ok(0),
        StringOrNumber::String(string) => string.parse::<i64>().map_err(serde::de::Error::custom),
        StringOrNumber::Number(number) => Ok(number),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_parse_membership_state() {
        // This is what /state on a zero returns, shortened.
        let json = r#"{
  "counter": "1048",
  "groups": {
    "1": {
      "members": {
        "1": { "id": "1", "groupId": 1, "addr": "alpha1:7080", "leader": true, "amDead": false, "lastUpdate": "1697700000" },
        "2": { "id": "2", "groupId": 1, "addr": "alpha2:7080", "leader": false, "amDead": false, "lastUpdate": "0" }
      },
      "tablets": {
        "dgraph.type": { "groupId": 1, "predicate": "dgraph.type", "force": false, "onDiskBytes": "2097152", "remove": false, "readOnly": false, "moveTs": "0", "uncompressedBytes": "4194304" },
        "name": { "groupId": 1, "predicate": "name", "onDiskBytes": "1500" }
      },
      "snapshotTs": "1030",
      "checksum": "8721981640389406281",
      "checkpointTs": "0"
    },
    "2": {
      "members": {
        "3": { "id": "3", "groupId": 2, "addr": "alpha3:7080", "leader": true }
      },
      "tablets": {}
    }
  },
  "zeros": {
    "1": { "id": "1", "addr": "zero1:5080", "leader": true, "amDead": false }
  },
  "maxUID": "10000",
  "maxTxnTs": "20000",
  "maxNsID": "0",
  "maxRaftId": "3",
  "removed": [],
  "cid": "6b5d6a8e-5ea5-4e2c-9a0b-c8de5e30b1a3",
  "license": { "user": "", "maxNodes": "18446744073709551615", "expiryTs": "1700292000", "enabled": true }
}"#;
        let result = MembershipState::parse_membership_state(json).unwrap();
        assert_eq!(result.cid(), "6b5d6a8e-5ea5-4e2c-9a0b-c8de5e30b1a3");
        assert_eq!(result.counter, 1048);
        assert_eq!(result.max_raft_id, 3);
        assert_eq!(result.groups().len(), 2);
        assert_eq!(result.zeros().len(), 1);
        let group = &result.groups["1"];
        assert_eq!(group.members().len(), 2);
        assert_eq!(group.snapshot_ts, 1030);
        assert_eq!(group.tablets["dgraph.type"].on_disk_bytes(), 2_097_152);
        assert_eq!(group.tablets["dgraph.type"].uncompressed_bytes, 4_194_304);
        assert_eq!(group.tablets["name"].on_disk_bytes(), 1500);
        assert!(group.members["1"].leader);
        assert_eq!(group.members["1"].last_update, 1_697_700_000);
    }

    #[test]
    fn unit_parse_membership_state_numbers_and_missing_fields() {
        let json = r#"{ "groups": { "1": { "tablets": { "name": { "onDiskBytes": 42 } } } } }"#;
        let result = MembershipState::parse_membership_state(json).unwrap();
        assert_eq!(result.cid(), "");
        assert_eq!(result.zeros().len(), 0);
        assert_eq!(result.groups["1"].members().len(), 0);
        assert_eq!(result.groups["1"].tablets["name"].on_disk_bytes(), 42);
    }

    #[test]
    fn unit_parse_membership_state_invalid_integer() {
        let json = r#"{ "counter": "not-a-number" }"#;
        assert!(MembershipState::parse_membership_state(json).is_err());
    }

    #[test]
    fn unit_read_membership_state_file() {
        let path = std::env::temp_dir().join(format!("cluster_telemetry_state_{}.json", std::process::id()));
        fs::write(&path, r#"{ "cid": "abc123", "zeros": { "1": { "id": "1" } } }"#).unwrap();
        let result = MembershipState::read_file(&path);
        fs::remove_file(&path).unwrap();
        let result = result.unwrap();
        assert_eq!(result.cid(), "abc123");
        assert_eq!(result.zeros().len(), 1);
    }

    #[test]
    fn unit_read_first_available_reports_every_failure() {
        // ports 9 (discard) and 7 (echo) are not expected to run an http server.
        let hosts = vec!["127.0.0.1".to_string()];
        let ports = vec!["9".to_string(), "7".to_string()];
        let error = MembershipState::read_first_available(&hosts, &ports).unwrap_err().to_string();
        assert!(error.contains("(127.0.0.1:9)"), "{}", error);
        assert!(error.contains("(127.0.0.1:7)"), "{}", error);
    }

    #[test]
    fn unit_read_first_available_without_hosts() {
        assert!(MembershipState::read_first_available(&[], &["6080".to_string()]).is_err());
    }

    #[test]
    fn unit_read_membership_state_missing_file() {
        let path = Path::new("/nonexistent/cluster_telemetry/state.json");
        assert!(MembershipState::read_file(path).is_err());
    }
}
