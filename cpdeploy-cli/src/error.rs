//! Run-level error types
//!
//! One variant per way a deployment run can end badly. API-level failures
//! pass through from the client untouched; the variants here cover the
//! semantic failures the driver itself detects.

use std::time::Duration;

use cpdeploy_client::ClientError;
use cpdeploy_core::domain::deployment::DeployId;
use thiserror::Error;

/// Errors that terminate a deployment run.
///
/// None of these are retried; the first one aborts the run and becomes its
/// single failure message.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Transport, HTTP or cPanel domain error from the API client.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The branch sync succeeded but left the repository undeployable.
    #[error("branch '{branch}' is not deployable; is its source tree clean?")]
    BranchNotDeployable { branch: String },

    /// The create call came back without a usable deployment id.
    #[error("the deployment was not created in cPanel (empty deploy_id)")]
    MissingDeployId,

    /// The deployment ran and failed on the server.
    #[error("deployment {deploy_id} failed; log: {}", .log_path.as_deref().unwrap_or("unavailable"))]
    Failed {
        deploy_id: DeployId,
        log_path: Option<String>,
        /// Deploy log content, when it could be fetched.
        log: Option<String>,
    },

    /// No terminal signal arrived within the configured budget.
    #[error("deployment did not finish within the configured timeout of {budget:?}")]
    Timeout { budget: Duration },

    /// The event stream ended before any terminal event.
    #[error("event stream closed before the deployment reached a terminal state")]
    StreamClosed,

    /// The stream transport was requested but the create response carried
    /// no stream URL.
    #[error("deployment {deploy_id} exposes no event stream URL; use the poll transport")]
    MissingStreamUrl { deploy_id: DeployId },
}
