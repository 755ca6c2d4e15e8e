//! Polling completion watch
//!
//! Re-reads the deployment listing on a fixed interval until the watched
//! deployment reaches a terminal state or the time budget runs out.

use std::time::Duration;

use async_trait::async_trait;
use cpdeploy_core::domain::deployment::Deployment;
use cpdeploy_core::domain::watch::{WatchOutcome, WatchSignal};
use tracing::{debug, info};

use crate::api::DeployApi;
use crate::error::DeployError;

use super::{CompletionWatch, failed_with_log};

/// Watches a deployment by polling the retrieve listing.
pub struct PollWatch {
    interval: Duration,
    budget: Duration,
}

impl PollWatch {
    pub fn new(interval: Duration, budget: Duration) -> Self {
        Self { interval, budget }
    }
}

#[async_trait]
impl CompletionWatch for PollWatch {
    async fn wait(
        &self,
        api: &dyn DeployApi,
        deployment: &Deployment,
    ) -> Result<WatchOutcome, DeployError> {
        let mut remaining = self.budget;
        while !remaining.is_zero() {
            // The interval is spent before the check, so the first check
            // happens immediately and a budget shorter than one interval
            // still gets one look at the listing.
            remaining = remaining.saturating_sub(self.interval);

            let statuses = api.retrieve_deployments().await?;
            match WatchSignal::from_statuses(&statuses, &deployment.deploy_id) {
                WatchSignal::Unknown => {
                    // The record left the listing without a terminal
                    // timestamp. Finished deployments age out of it, so
                    // there is nothing more to watch.
                    return Ok(WatchOutcome::Vanished);
                }
                WatchSignal::Failed { log_path } => {
                    let log_path = log_path.or_else(|| deployment.log_path.clone());
                    return Err(failed_with_log(api, deployment, log_path).await);
                }
                WatchSignal::Succeeded => {
                    let finished = statuses
                        .iter()
                        .find(|s| s.deploy_id == deployment.deploy_id)
                        .and_then(|s| s.timestamps.succeeded);
                    if let Some(at) = finished {
                        info!("Deployment {} succeeded at {}", deployment.deploy_id, at);
                    }
                    return Ok(WatchOutcome::Completed);
                }
                WatchSignal::Processing => {
                    debug!("Deployment {} still in progress", deployment.deploy_id);
                }
            }

            tokio::time::sleep(self.interval).await;
        }

        Err(DeployError::Timeout {
            budget: self.budget,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use cpdeploy_client::{EventStream, Result as ClientResult};
    use cpdeploy_core::domain::deployment::{
        DeployId, DeployTimestamps, DeploymentStatus, UnixStamp,
    };
    use cpdeploy_core::dto::version_control::BranchUpdate;

    struct ScriptedApi {
        snapshots: Mutex<VecDeque<Vec<DeploymentStatus>>>,
        log_requests: Mutex<Vec<String>>,
    }

    impl ScriptedApi {
        /// The last snapshot repeats forever once the script runs out.
        fn new(snapshots: Vec<Vec<DeploymentStatus>>) -> Self {
            Self {
                snapshots: Mutex::new(snapshots.into()),
                log_requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl DeployApi for ScriptedApi {
        async fn update_branch(&self, _branch: &str) -> ClientResult<BranchUpdate> {
            unreachable!("branch sync is not part of the watch")
        }

        async fn create_deployment(&self) -> ClientResult<Deployment> {
            unreachable!("creation is not part of the watch")
        }

        async fn retrieve_deployments(&self) -> ClientResult<Vec<DeploymentStatus>> {
            let mut snapshots = self.snapshots.lock().unwrap();
            Ok(match snapshots.len() {
                0 => Vec::new(),
                1 => snapshots.front().unwrap().clone(),
                _ => snapshots.pop_front().unwrap(),
            })
        }

        async fn log_content(&self, path: &str) -> ClientResult<String> {
            self.log_requests.lock().unwrap().push(path.to_string());
            Ok("remote: deploy failed at step 3\n".to_string())
        }

        async fn open_events(&self, _sse_url: &str) -> ClientResult<EventStream> {
            unreachable!("the polling watch never opens a stream")
        }
    }

    fn stamp() -> UnixStamp {
        serde_json::from_str("1523381618").unwrap()
    }

    fn entry(id: &str, succeeded: bool, failed: bool) -> DeploymentStatus {
        DeploymentStatus {
            deploy_id: DeployId::new(id),
            repository_root: None,
            log_path: Some(format!("/home/user/logs/deploy-{id}.log")),
            timestamps: DeployTimestamps {
                queued: Some(stamp()),
                active: Some(stamp()),
                succeeded: succeeded.then(stamp),
                failed: failed.then(stamp),
            },
        }
    }

    fn deployment(id: &str) -> Deployment {
        Deployment {
            deploy_id: DeployId::new(id),
            task_id: None,
            sse_url: None,
            log_path: None,
        }
    }

    fn fast_watch() -> PollWatch {
        PollWatch::new(Duration::from_millis(5), Duration::from_millis(100))
    }

    #[tokio::test]
    async fn test_missing_record_ends_the_watch_without_error() {
        let api = ScriptedApi::new(vec![vec![entry("1", false, false)]]);
        let outcome = fast_watch().wait(&api, &deployment("9")).await.unwrap();
        assert_eq!(outcome, WatchOutcome::Vanished);
    }

    #[tokio::test]
    async fn test_success_after_some_waiting_completes() {
        let api = ScriptedApi::new(vec![
            vec![entry("7", false, false)],
            vec![entry("7", false, false)],
            vec![entry("7", true, false)],
        ]);
        let outcome = fast_watch().wait(&api, &deployment("7")).await.unwrap();
        assert_eq!(outcome, WatchOutcome::Completed);
    }

    #[tokio::test]
    async fn test_failure_fetches_the_listed_log() {
        let api = ScriptedApi::new(vec![vec![entry("7", false, true)]]);
        let err = fast_watch()
            .wait(&api, &deployment("7"))
            .await
            .unwrap_err();

        match &err {
            DeployError::Failed {
                log_path, log, ..
            } => {
                assert_eq!(log_path.as_deref(), Some("/home/user/logs/deploy-7.log"));
                assert_eq!(log.as_deref(), Some("remote: deploy failed at step 3\n"));
            }
            other => panic!("expected a deployment failure, got {other:?}"),
        }
        // The message must point the reader at the log.
        assert!(err.to_string().contains("/home/user/logs/deploy-7.log"));
        assert_eq!(
            api.log_requests.lock().unwrap().as_slice(),
            ["/home/user/logs/deploy-7.log"]
        );
    }

    #[tokio::test]
    async fn test_budget_exhaustion_times_out_citing_the_duration() {
        let api = ScriptedApi::new(vec![vec![entry("7", false, false)]]);
        let watch = PollWatch::new(Duration::from_millis(5), Duration::from_millis(20));
        let err = watch.wait(&api, &deployment("7")).await.unwrap_err();

        assert!(matches!(
            err,
            DeployError::Timeout {
                budget
            } if budget == Duration::from_millis(20)
        ));
        assert!(err.to_string().contains("20ms"));
    }

    #[tokio::test]
    async fn test_budget_shorter_than_interval_still_checks_once() {
        let api = ScriptedApi::new(vec![vec![entry("7", true, false)]]);
        let watch = PollWatch::new(Duration::from_secs(60), Duration::from_millis(1));
        let outcome = watch.wait(&api, &deployment("7")).await.unwrap();
        assert_eq!(outcome, WatchOutcome::Completed);
    }
}
