//! Deployment driver
//!
//! Orchestrates one run: branch sync, deployment creation, completion
//! watch. Phases execute strictly in sequence; the first error aborts the
//! run and becomes its single failure message.

use cpdeploy_core::domain::deployment::{DeployId, Deployment};
use cpdeploy_core::domain::watch::WatchOutcome;
use tracing::{info, warn};

use crate::api::DeployApi;
use crate::ci;
use crate::config::Config;
use crate::error::DeployError;
use crate::watch::CompletionWatch;

/// What a finished run reports back to the workflow.
#[derive(Debug)]
pub struct DeployReport {
    pub deploy_id: DeployId,
    pub outcome: WatchOutcome,
}

/// Drives one deployment run against the cPanel API.
pub struct Driver<'a, A: DeployApi> {
    api: &'a A,
    config: &'a Config,
}

impl<'a, A: DeployApi> Driver<'a, A> {
    pub fn new(api: &'a A, config: &'a Config) -> Self {
        Self { api, config }
    }

    /// Runs sync, create and watch, in that order.
    pub async fn run(&self, watch: &dyn CompletionWatch) -> Result<DeployReport, DeployError> {
        {
            let _group = ci::Group::open("Update cPanel branch information");
            self.sync_branch().await?;
        }

        let deployment = {
            let _group = ci::Group::open("Creating cPanel deployment");
            self.create_deployment().await?
        };

        let outcome = {
            let _group = ci::Group::open("Waiting for the deployment to finish");
            watch.wait(self.api, &deployment).await?
        };

        if outcome == WatchOutcome::Vanished {
            warn!(
                "Deployment {} left the deployment list without reporting a terminal state",
                deployment.deploy_id
            );
            ci::warning(
                "The deployment disappeared from the active list before reporting \
                 success or failure; treating it as finished",
            );
        }

        Ok(DeployReport {
            deploy_id: deployment.deploy_id,
            outcome,
        })
    }

    /// Checks the branch out on the server and verifies it is deployable.
    async fn sync_branch(&self) -> Result<(), DeployError> {
        let update = self.api.update_branch(&self.config.branch).await?;
        if !update.deployable {
            return Err(DeployError::BranchNotDeployable {
                branch: self.config.branch.clone(),
            });
        }
        info!("Updated cPanel branch information: {}", update.info_json());
        Ok(())
    }

    /// Queues the deployment and insists on a usable id, the only key the
    /// watch phase can correlate on.
    async fn create_deployment(&self) -> Result<Deployment, DeployError> {
        let deployment = self.api.create_deployment().await?;
        if deployment.deploy_id.is_unset() {
            return Err(DeployError::MissingDeployId);
        }
        info!("Created deployment with id: {}", deployment.deploy_id);
        Ok(deployment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use cpdeploy_client::{EventStream, Result as ClientResult};
    use cpdeploy_core::domain::deployment::DeploymentStatus;
    use cpdeploy_core::dto::version_control::BranchUpdate;

    use crate::config::WatchTransport;

    struct ScriptedApi {
        deployable: bool,
        deploy_id: &'static str,
        create_calls: AtomicUsize,
    }

    impl ScriptedApi {
        fn new(deployable: bool, deploy_id: &'static str) -> Self {
            Self {
                deployable,
                deploy_id,
                create_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DeployApi for ScriptedApi {
        async fn update_branch(&self, _branch: &str) -> ClientResult<BranchUpdate> {
            Ok(BranchUpdate {
                deployable: self.deployable,
                ..Default::default()
            })
        }

        async fn create_deployment(&self) -> ClientResult<Deployment> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Deployment {
                deploy_id: DeployId::new(self.deploy_id),
                task_id: None,
                sse_url: None,
                log_path: None,
            })
        }

        async fn retrieve_deployments(&self) -> ClientResult<Vec<DeploymentStatus>> {
            unreachable!("scenario tests stub the watch")
        }

        async fn log_content(&self, _path: &str) -> ClientResult<String> {
            unreachable!("scenario tests stub the watch")
        }

        async fn open_events(&self, _sse_url: &str) -> ClientResult<EventStream> {
            unreachable!("scenario tests stub the watch")
        }
    }

    /// Watch stub that resolves instantly with a fixed outcome.
    struct InstantWatch(WatchOutcome);

    #[async_trait]
    impl CompletionWatch for InstantWatch {
        async fn wait(
            &self,
            _api: &dyn DeployApi,
            _deployment: &Deployment,
        ) -> Result<WatchOutcome, DeployError> {
            Ok(self.0.clone())
        }
    }

    /// Watch stub that must never run.
    struct UnreachableWatch;

    #[async_trait]
    impl CompletionWatch for UnreachableWatch {
        async fn wait(
            &self,
            _api: &dyn DeployApi,
            _deployment: &Deployment,
        ) -> Result<WatchOutcome, DeployError> {
            panic!("the watch must not start for this scenario");
        }
    }

    fn config() -> Config {
        Config {
            base_url: "https://server.example:2083".to_string(),
            username: "deployer".to_string(),
            api_token: "token".to_string(),
            repository_root: "/home/deployer/repo".to_string(),
            branch: "main".to_string(),
            timeout: Duration::from_secs(300),
            poll_interval: Duration::from_secs(5),
            transport: WatchTransport::Poll,
        }
    }

    #[tokio::test]
    async fn test_undeployable_branch_aborts_before_creation() {
        let api = ScriptedApi::new(false, "42");
        let config = config();
        let driver = Driver::new(&api, &config);

        let err = driver.run(&UnreachableWatch).await.unwrap_err();
        assert!(matches!(err, DeployError::BranchNotDeployable { ref branch } if branch == "main"));
        assert_eq!(api.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unset_deploy_id_aborts_before_watch() {
        let api = ScriptedApi::new(true, "");
        let config = config();
        let driver = Driver::new(&api, &config);

        let err = driver.run(&UnreachableWatch).await.unwrap_err();
        assert!(matches!(err, DeployError::MissingDeployId));
        assert_eq!(api.create_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_successful_run_reports_the_deploy_id() {
        let api = ScriptedApi::new(true, "42");
        let config = config();
        let driver = Driver::new(&api, &config);

        let report = driver.run(&InstantWatch(WatchOutcome::Completed)).await.unwrap();
        assert_eq!(report.deploy_id.as_str(), "42");
        assert_eq!(report.outcome, WatchOutcome::Completed);
    }

    #[tokio::test]
    async fn test_vanished_deployment_still_counts_as_finished() {
        let api = ScriptedApi::new(true, "42");
        let config = config();
        let driver = Driver::new(&api, &config);

        let report = driver.run(&InstantWatch(WatchOutcome::Vanished)).await.unwrap();
        assert_eq!(report.deploy_id.as_str(), "42");
        assert_eq!(report.outcome, WatchOutcome::Vanished);
    }
}
