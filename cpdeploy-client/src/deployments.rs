//! `VersionControlDeployment` endpoint wrappers.

use cpdeploy_core::domain::deployment::{Deployment, DeploymentStatus};

use crate::{CpanelClient, Result};

impl CpanelClient {
    /// Queues a deployment of the currently checked-out branch.
    pub async fn create_deployment(&self) -> Result<Deployment> {
        self.execute("VersionControlDeployment", "create", &[])
            .await
    }

    /// Lists the deployment records the server still tracks for this
    /// repository. Finished deployments age out of this listing.
    pub async fn retrieve_deployments(&self) -> Result<Vec<DeploymentStatus>> {
        self.execute("VersionControlDeployment", "retrieve", &[])
            .await
    }
}
