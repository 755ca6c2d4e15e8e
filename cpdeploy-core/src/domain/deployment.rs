//! Deployment domain types
//!
//! Shapes produced by cPanel's `VersionControlDeployment` UAPI module. The
//! `deploy_id` is issued by the server and treated as opaque; it is the only
//! key used to correlate retrieve entries with this run's deployment.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque deployment identifier.
///
/// cPanel serializes this as a JSON number on some builds and as a string on
/// others, so deserialization accepts both and normalizes to a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct DeployId(String);

impl DeployId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when cPanel accepted the request but issued no usable
    /// identifier. Ids start at 1; `0` is the unset marker.
    pub fn is_unset(&self) -> bool {
        self.0.is_empty() || self.0 == "0"
    }
}

impl fmt::Display for DeployId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DeployId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(u64),
            Str(String),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Num(n)) => DeployId(n.to_string()),
            Some(Raw::Str(s)) => DeployId(s),
            None => DeployId(String::new()),
        })
    }
}

/// A point in time as cPanel reports it: seconds since the epoch, possibly
/// fractional, as either a JSON number or a string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnixStamp(f64);

impl UnixStamp {
    pub fn as_secs_f64(&self) -> f64 {
        self.0
    }

    /// UTC wall-clock rendering, when the value is in chrono's range.
    pub fn to_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        let secs = self.0.trunc() as i64;
        let nanos = (self.0.fract() * 1e9) as u32;
        chrono::DateTime::from_timestamp(secs, nanos)
    }
}

impl fmt::Display for UnixStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_utc() {
            Some(utc) => write!(f, "{}", utc.format("%Y-%m-%d %H:%M:%S UTC")),
            None => write!(f, "{}", self.0),
        }
    }
}

impl<'de> Deserialize<'de> for UnixStamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(f64),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Num(n) => Ok(UnixStamp(n)),
            Raw::Str(s) => s
                .parse::<f64>()
                .map(UnixStamp)
                .map_err(|_| serde::de::Error::custom(format!("invalid epoch stamp '{s}'"))),
        }
    }
}

/// Lifecycle timestamps of one deployment. Only the fields the server has
/// reached are present; `failed` and `succeeded` are mutually exclusive in
/// practice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeployTimestamps {
    #[serde(default)]
    pub queued: Option<UnixStamp>,
    #[serde(default)]
    pub active: Option<UnixStamp>,
    #[serde(default)]
    pub succeeded: Option<UnixStamp>,
    #[serde(default)]
    pub failed: Option<UnixStamp>,
}

/// Record returned by `VersionControlDeployment::create`.
///
/// Read-only after creation. `log_path` serves the polling transport's
/// failure reporting; `sse_url` (plus `task_id`) serves the event-stream
/// transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    #[serde(default)]
    pub deploy_id: DeployId,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub sse_url: Option<String>,
    #[serde(default)]
    pub log_path: Option<String>,
}

/// One entry of the `VersionControlDeployment::retrieve` listing. The
/// endpoint has no server-side filter; callers match entries on `deploy_id`
/// and ignore the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentStatus {
    #[serde(default)]
    pub deploy_id: DeployId,
    #[serde(default)]
    pub repository_root: Option<String>,
    #[serde(default)]
    pub log_path: Option<String>,
    #[serde(default)]
    pub timestamps: DeployTimestamps,
}
