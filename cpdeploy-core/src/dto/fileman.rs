//! `Fileman` UAPI payloads

use serde::Deserialize;

/// Result of `Fileman::get_file_content`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileContent {
    #[serde(default)]
    pub content: Option<String>,
}

impl FileContent {
    /// The file text. Absent content reads as empty: by the time a log is
    /// fetched the failure is already established, so there is nothing to
    /// gain from erroring here.
    pub fn into_text(self) -> String {
        self.content.unwrap_or_default()
    }
}
