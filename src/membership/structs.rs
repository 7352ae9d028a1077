//! The structs
//!
use std::collections::BTreeMap;
use crate::membership::deserialize_i64_from_string_or_number;

/// The root struct for deserializing `/state`.
///
/// The groups, members, tablets and zeros are json objects keyed by id or predicate name.
/// 64 bit integers are encoded as strings.
///
/// ```text
/// {
///     "counter": "1048",
///     "groups": {
///         "1": {
///             "members": { "1": { "id": "1", "groupId": 1, "addr": "alpha1:7080", "leader": true } },
///             "tablets": { "name": { "groupId": 1, "predicate": "name", "onDiskBytes": "1500" } },
///             "snapshotTs": "1030"
///         }
///     },
///     "zeros": { "1": { "id": "1", "addr": "zero1:5080", "leader": true } },
///     "maxRaftId": "3",
///     "cid": "6b5d6a8e-5ea5-4e2c-9a0b-c8de5e30b1a3"
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct MembershipState {
    #[serde(deserialize_with = "deserialize_i64_from_string_or_number")]
    pub counter: i64,
    pub groups: BTreeMap<String, Group>,
    pub zeros: BTreeMap<String, Member>,
    #[serde(deserialize_with = "deserialize_i64_from_string_or_number")]
    pub max_raft_id: i64,
    pub cid: String,
}

/// A partition group: the alphas serving it and the tablets it owns.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct Group {
    pub members: BTreeMap<String, Member>,
    pub tablets: BTreeMap<String, Tablet>,
    #[serde(deserialize_with = "deserialize_i64_from_string_or_number")]
    pub snapshot_ts: i64,
}

/// A cluster node, either an alpha in a group or a zero.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct Member {
    #[serde(deserialize_with = "deserialize_i64_from_string_or_number")]
    pub id: i64,
    pub group_id: u32,
    pub addr: String,
    pub leader: bool,
    pub am_dead: bool,
    #[serde(deserialize_with = "deserialize_i64_from_string_or_number")]
    pub last_update: i64,
}

/// A tablet: the data of one predicate, owned by one group.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct Tablet {
    pub group_id: u32,
    pub predicate: String,
    #[serde(deserialize_with = "deserialize_i64_from_string_or_number")]
    pub on_disk_bytes: i64,
    #[serde(deserialize_with = "deserialize_i64_from_string_or_number")]
    pub uncompressed_bytes: i64,
    pub read_only: bool,
}
