//! cPanel API surface used by the deploy driver
//!
//! The driver and watch strategies depend on this trait rather than on the
//! concrete client, so scenario tests can script responses without a
//! server.

use async_trait::async_trait;
use cpdeploy_client::{CpanelClient, EventStream, Result};
use cpdeploy_core::domain::deployment::{Deployment, DeploymentStatus};
use cpdeploy_core::dto::version_control::BranchUpdate;

/// The remote calls one deployment run performs.
#[async_trait]
pub trait DeployApi: Send + Sync {
    /// Checks out `branch` on the server and syncs it.
    async fn update_branch(&self, branch: &str) -> Result<BranchUpdate>;

    /// Queues a deployment of the checked-out branch.
    async fn create_deployment(&self) -> Result<Deployment>;

    /// Lists the deployments the server currently tracks.
    async fn retrieve_deployments(&self) -> Result<Vec<DeploymentStatus>>;

    /// Reads a remote file, typically a deploy log.
    async fn log_content(&self, path: &str) -> Result<String>;

    /// Opens the server-sent event stream for a deployment.
    async fn open_events(&self, sse_url: &str) -> Result<EventStream>;
}

#[async_trait]
impl DeployApi for CpanelClient {
    async fn update_branch(&self, branch: &str) -> Result<BranchUpdate> {
        CpanelClient::update_branch(self, branch).await
    }

    async fn create_deployment(&self) -> Result<Deployment> {
        CpanelClient::create_deployment(self).await
    }

    async fn retrieve_deployments(&self) -> Result<Vec<DeploymentStatus>> {
        CpanelClient::retrieve_deployments(self).await
    }

    async fn log_content(&self, path: &str) -> Result<String> {
        CpanelClient::log_content(self, path).await
    }

    async fn open_events(&self, sse_url: &str) -> Result<EventStream> {
        CpanelClient::open_events(self, sse_url).await
    }
}
