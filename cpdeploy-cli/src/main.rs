//! cPanel deployment step
//!
//! Triggers a git deployment on a cPanel server and supervises it to
//! completion. Built to run inside a GitHub Actions job: inputs arrive as
//! `INPUT_*` environment variables, progress is grouped in the step log,
//! and the final deployment id is published as a step output.
//!
//! Flow:
//! - Configuration: resolved once from flags/environment at startup
//! - Branch sync: `VersionControl::update` must leave the branch deployable
//! - Create: `VersionControlDeployment::create` must issue a deploy id
//! - Watch: poll the deployment listing, or follow the event stream, until
//!   a terminal state arrives or the budget runs out

mod api;
mod ci;
mod config;
mod driver;
mod error;
mod watch;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use colored::*;
use cpdeploy_client::{CpanelClient, Credentials};
use cpdeploy_core::domain::watch::WatchOutcome;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, WatchTransport};
use crate::driver::{DeployReport, Driver};
use crate::error::DeployError;
use crate::watch::{CompletionWatch, PollWatch, StreamWatch};

/// Deploys a git branch through the cPanel UAPI and waits for the result.
#[derive(Parser, Debug)]
#[command(name = "cpdeploy", version, about)]
struct Cli {
    /// cPanel host including scheme and port
    #[arg(long, env = "INPUT_CPANEL_URL")]
    cpanel_url: String,

    /// Account that owns the repository
    #[arg(long, env = "INPUT_DEPLOY_USER")]
    deploy_user: String,

    /// UAPI token issued for the account
    #[arg(long, env = "INPUT_DEPLOY_KEY", hide_env_values = true)]
    deploy_key: String,

    /// Absolute path of the managed repository on the server
    #[arg(long, env = "INPUT_CPANEL_REPOSITORY_ROOT")]
    repository_root: String,

    /// Branch to deploy
    #[arg(long, env = "INPUT_BRANCH", default_value = "main")]
    branch: String,

    /// Overall completion budget, in seconds
    #[arg(long, env = "INPUT_DEPLOYMENT_TIMEOUT", default_value_t = 300)]
    timeout: u64,

    /// Delay between status polls, in seconds
    #[arg(long, env = "INPUT_DEPLOYMENT_INTERVAL", default_value_t = 5)]
    poll_interval: u64,

    /// How to watch the deployment to completion
    #[arg(long, env = "INPUT_TRANSPORT", value_enum, default_value = "poll")]
    transport: WatchTransport,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            base_url: self.cpanel_url,
            username: self.deploy_user,
            api_token: self.deploy_key,
            repository_root: self.repository_root,
            branch: self.branch,
            timeout: Duration::from_secs(self.timeout),
            poll_interval: Duration::from_secs(self.poll_interval),
            transport: self.transport,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing();

    let config = cli.into_config();

    // Neither credential value may reach the step log, not even inside an
    // error body echoed back by the server.
    for secret in config.secrets() {
        ci::add_mask(secret);
    }

    if let Err(e) = config.validate() {
        ci::error(&format!("Invalid configuration: {e}"));
        return ExitCode::FAILURE;
    }

    info!(
        "Deploying branch '{}' of {} on {}",
        config.branch, config.repository_root, config.base_url
    );

    match run(&config).await {
        Ok(report) => {
            report_success(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            report_failure(&e);
            ExitCode::FAILURE
        }
    }
}

/// Builds the client and watch strategy, then hands control to the driver.
async fn run(config: &Config) -> Result<DeployReport, DeployError> {
    let credentials = Credentials::new(&config.username, &config.api_token);
    let client = CpanelClient::new(&config.base_url, &config.repository_root, credentials);
    let driver = Driver::new(&client, config);

    let watch: Box<dyn CompletionWatch> = match config.transport {
        WatchTransport::Poll => Box::new(PollWatch::new(config.poll_interval, config.timeout)),
        WatchTransport::Stream => Box::new(StreamWatch::new(config.timeout)),
    };

    driver.run(watch.as_ref()).await
}

fn report_success(report: &DeployReport) {
    if let Err(e) = ci::set_output("deployment-id", report.deploy_id.as_str()) {
        ci::warning(&format!("Could not publish the deployment-id output: {e}"));
    }

    let headline = match report.outcome {
        WatchOutcome::Completed => "✓ Deployment finished successfully!",
        WatchOutcome::Vanished => "✓ Deployment finished (no longer listed by the server)",
    };
    println!("{}", headline.green().bold());
    println!(
        "  Deployment ID: {}",
        report.deploy_id.to_string().cyan()
    );
}

fn report_failure(error: &DeployError) {
    // Show the remote deploy log before the terminal error so the reason
    // sits right above the failure annotation.
    if let DeployError::Failed { log: Some(log), .. } = error {
        let _group = ci::Group::open("Deployment log");
        println!("{log}");
    }

    ci::error(&error.to_string());
    println!("{}", format!("✗ Deployment failed: {error}").red().bold());
}

fn init_tracing() {
    // RUNNER_DEBUG is how Actions signals a re-run with debug logging.
    let default_filter = if ci::is_debug() {
        "cpdeploy_cli=debug,cpdeploy_client=debug"
    } else {
        "cpdeploy_cli=info,cpdeploy_client=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
