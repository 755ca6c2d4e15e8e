//! Event-stream completion watch
//!
//! Follows the server-sent event stream cPanel exposes for the deployment
//! task instead of polling the listing. The stream itself carries no
//! deadline, so the whole watch runs under the same overall budget as the
//! polling transport; a stream that never produces a terminal event would
//! otherwise hang the run forever.

use std::time::Duration;

use async_trait::async_trait;
use cpdeploy_client::EventStream;
use cpdeploy_core::domain::deployment::Deployment;
use cpdeploy_core::domain::watch::{WatchOutcome, WatchSignal};
use tracing::{debug, info};

use crate::api::DeployApi;
use crate::error::DeployError;

use super::{CompletionWatch, failed_with_log};

/// Watches a deployment by following its server-sent event stream.
pub struct StreamWatch {
    budget: Duration,
}

impl StreamWatch {
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }
}

#[async_trait]
impl CompletionWatch for StreamWatch {
    async fn wait(
        &self,
        api: &dyn DeployApi,
        deployment: &Deployment,
    ) -> Result<WatchOutcome, DeployError> {
        let Some(sse_url) = deployment.sse_url.as_deref() else {
            return Err(DeployError::MissingStreamUrl {
                deploy_id: deployment.deploy_id.clone(),
            });
        };

        let events = api.open_events(sse_url).await?;
        match tokio::time::timeout(self.budget, follow(api, deployment, events)).await {
            Ok(result) => result,
            Err(_) => Err(DeployError::Timeout {
                budget: self.budget,
            }),
        }
    }
}

/// Consumes events until a terminal signal arrives.
///
/// Event payloads are opaque; only the event names carry meaning.
async fn follow(
    api: &dyn DeployApi,
    deployment: &Deployment,
    mut events: EventStream,
) -> Result<WatchOutcome, DeployError> {
    while let Some(event) = events.next_event().await? {
        match WatchSignal::from_event_name(&event.event) {
            Some(WatchSignal::Processing) => {
                info!("Deployment {} is processing", deployment.deploy_id);
            }
            Some(WatchSignal::Succeeded) => return Ok(WatchOutcome::Completed),
            Some(WatchSignal::Failed { .. }) => {
                return Err(failed_with_log(api, deployment, deployment.log_path.clone()).await);
            }
            _ => {
                debug!("Ignoring stream event '{}'", event.event);
            }
        }
    }

    // The server closed the stream without a terminal event. Surfacing
    // that beats pretending the deployment finished.
    Err(DeployError::StreamClosed)
}
