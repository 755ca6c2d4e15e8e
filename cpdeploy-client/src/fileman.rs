//! `Fileman` endpoint wrappers.

use cpdeploy_core::dto::fileman::FileContent;

use crate::{CpanelClient, Result};

/// Splits a remote path into the `(dir, file)` pair that
/// `Fileman::get_file_content` expects.
///
/// A bare file name resolves against `.`, which cPanel treats as the
/// account home.
pub fn split_remote_path(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some(("", file)) => ("/", file),
        Some((dir, file)) => (dir, file),
        None => (".", path),
    }
}

impl CpanelClient {
    /// Fetches the content of a file on the server, typically a deploy log.
    ///
    /// Returns an empty string when the server omits the content field.
    pub async fn log_content(&self, path: &str) -> Result<String> {
        let (dir, file) = split_remote_path(path);
        let data: FileContent = self
            .execute("Fileman", "get_file_content", &[("dir", dir), ("file", file)])
            .await?;
        Ok(data.into_text())
    }
}
