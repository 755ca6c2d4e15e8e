//! Completion watch strategies
//!
//! After a deployment is created the run waits for its terminal state.
//! Two transports exist: polling the deployment listing and following the
//! server-sent event stream. The driver only ever sees the trait, so the
//! transport is swappable per run.

mod poll;
mod stream;

pub use poll::PollWatch;
pub use stream::StreamWatch;

use async_trait::async_trait;
use cpdeploy_core::domain::deployment::Deployment;
use cpdeploy_core::domain::watch::WatchOutcome;

use crate::api::DeployApi;
use crate::error::DeployError;

/// Waits for a created deployment to reach a terminal state.
#[async_trait]
pub trait CompletionWatch: Send + Sync {
    /// Blocks until the deployment succeeds, fails, vanishes from the
    /// listing, or the time budget runs out.
    async fn wait(
        &self,
        api: &dyn DeployApi,
        deployment: &Deployment,
    ) -> Result<WatchOutcome, DeployError>;
}

/// Builds the failure error for a deployment, attaching the deploy log when
/// it can be fetched. Log retrieval is best effort; the failure itself is
/// already established.
pub(crate) async fn failed_with_log(
    api: &dyn DeployApi,
    deployment: &Deployment,
    log_path: Option<String>,
) -> DeployError {
    let log = match &log_path {
        Some(path) => match api.log_content(path).await {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::warn!("Could not fetch deploy log from {}: {}", path, e);
                None
            }
        },
        None => None,
    };

    DeployError::Failed {
        deploy_id: deployment.deploy_id.clone(),
        log_path,
        log,
    }
}
