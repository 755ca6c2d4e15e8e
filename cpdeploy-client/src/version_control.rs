//! `VersionControl` endpoint wrappers.

use cpdeploy_core::dto::version_control::BranchUpdate;

use crate::{CpanelClient, Result};

impl CpanelClient {
    /// Points the managed repository at `branch` and pulls its latest
    /// commits.
    ///
    /// The response reports whether the checkout left the repository
    /// deployable, alongside general branch information.
    pub async fn update_branch(&self, branch: &str) -> Result<BranchUpdate> {
        self.execute("VersionControl", "update", &[("branch", branch)])
            .await
    }
}
