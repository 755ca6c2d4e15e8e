//! Deploy step configuration
//!
//! Defines all configurable parameters for a deployment run. Everything is
//! resolved at startup into an explicit struct; nothing below `main` reads
//! the environment.

use std::time::Duration;

use anyhow::bail;

/// Transport used to watch a deployment to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum WatchTransport {
    /// Poll the deployment listing until a terminal timestamp appears.
    Poll,
    /// Follow the server-sent event stream cPanel exposes for the task.
    Stream,
}

/// Configuration for one deployment run.
#[derive(Debug, Clone)]
pub struct Config {
    /// cPanel host including scheme and port (e.g., "https://server.example:2083")
    pub base_url: String,

    /// Account that owns the repository
    pub username: String,

    /// UAPI token issued for the account
    pub api_token: String,

    /// Absolute path of the managed repository on the server
    pub repository_root: String,

    /// Branch to check out and deploy
    pub branch: String,

    /// Total time budget for the completion watch
    pub timeout: Duration,

    /// Delay between deployment listing polls
    pub poll_interval: Duration,

    /// Completion watch transport
    pub transport: WatchTransport,
}

impl Config {
    /// Input values that must never appear in the step log.
    pub fn secrets(&self) -> [&str; 2] {
        [&self.username, &self.api_token]
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.is_empty() {
            bail!("cPanel URL cannot be empty");
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            bail!("cPanel URL must start with http:// or https://");
        }

        if self.username.is_empty() {
            bail!("deploy user cannot be empty");
        }

        if self.api_token.is_empty() {
            bail!("deploy key cannot be empty");
        }

        if self.repository_root.is_empty() {
            bail!("repository root cannot be empty");
        }

        if self.branch.is_empty() {
            bail!("branch cannot be empty");
        }

        if self.timeout.is_zero() {
            bail!("timeout must be greater than 0");
        }

        if self.poll_interval.is_zero() {
            bail!("poll interval must be greater than 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
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

    #[test]
    fn test_valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_secrets_cover_both_credential_values() {
        let config = base_config();
        assert_eq!(config.secrets(), ["deployer", "token"]);
    }

    #[test]
    fn test_config_validation() {
        let mut config = base_config();

        // Missing scheme should fail
        config.base_url = "server.example:2083".to_string();
        assert!(config.validate().is_err());

        config.base_url = "https://server.example:2083".to_string();
        assert!(config.validate().is_ok());

        // Empty credentials should fail
        config.api_token = String::new();
        assert!(config.validate().is_err());

        config.api_token = "token".to_string();

        // Zero intervals should fail
        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());

        config.poll_interval = Duration::from_secs(5);
        config.timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
