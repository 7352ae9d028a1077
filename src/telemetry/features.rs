//! Enterprise feature flags.
//!
/// Reports the enterprise features currently enabled on this node.
///
/// The list can change during the lifetime of the process (license applied or expired),
/// so it is asked for every time a snapshot is built.
pub trait FeatureFlags {
    fn features_list(&self) -> Vec<String>;
}

/// A fixed list, for example given on the command line.
impl FeatureFlags for Vec<String> {
    fn features_list(&self) -> Vec<String> {
        self.clone()
    }
}

impl FeatureFlags for [String] {
    fn features_list(&self) -> Vec<String> {
        self.to_vec()
    }
}
