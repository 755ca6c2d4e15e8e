//! `VersionControl` UAPI payloads

use serde::Deserialize;

/// Result of `VersionControl::update` for a branch.
///
/// Only `deployable` is semantic for this step: it says whether the synced
/// working tree is in a state cPanel will deploy. Everything else the server
/// includes (branch head, last update time, remote url, ...) is opaque and
/// kept only for diagnostics.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BranchUpdate {
    #[serde(default, deserialize_with = "crate::dto::uapi::truthy")]
    pub deployable: bool,
    #[serde(flatten)]
    pub info: serde_json::Map<String, serde_json::Value>,
}

impl BranchUpdate {
    /// The opaque informational payload as pretty JSON, for log output.
    pub fn info_json(&self) -> String {
        serde_json::to_string_pretty(&self.info).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployable_accepts_numeric_flag() {
        let update: BranchUpdate =
            serde_json::from_str(r#"{"deployable": 1, "branch": "main"}"#).unwrap();
        assert!(update.deployable);
        assert_eq!(update.info["branch"], "main");
    }

    #[test]
    fn test_missing_deployable_reads_as_false() {
        let update: BranchUpdate = serde_json::from_str(r#"{"branch": "main"}"#).unwrap();
        assert!(!update.deployable);
    }

    #[test]
    fn test_info_json_renders_the_opaque_payload() {
        let update: BranchUpdate =
            serde_json::from_str(r#"{"deployable": 0, "last_update": "123"}"#).unwrap();
        assert!(update.info_json().contains("last_update"));
    }
}
