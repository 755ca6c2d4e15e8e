//! UAPI response envelope
//!
//! Every `/execute/<Module>/<function>` response wraps its payload in the
//! same envelope: `status` (1 on success, 0 on failure), an `errors` list,
//! optional `messages`, and the call-specific `data`.

use serde::{Deserialize, Deserializer};

/// The envelope around every UAPI payload.
#[derive(Debug, Clone, Deserialize)]
pub struct UapiResponse<T> {
    /// Whether the call succeeded. Falsy or absent means the remote side
    /// reported a domain-level failure.
    #[serde(default, deserialize_with = "truthy")]
    pub status: bool,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
    #[serde(default)]
    pub messages: Option<Vec<String>>,
    // Path form; a bare `default` would bound `T: Default`.
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> UapiResponse<T> {
    /// The remote error list; empty when the server reported none.
    pub fn error_list(&self) -> Vec<String> {
        self.errors.clone().unwrap_or_default()
    }
}

/// cPanel booleans arrive as 0/1 numbers, "0"/"1" strings, or real booleans
/// depending on endpoint and version.
pub fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Num(i64),
        Str(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Bool(b)) => b,
        Some(Raw::Num(n)) => n != 0,
        Some(Raw::Str(s)) => !matches!(s.as_str(), "" | "0"),
        None => false,
    })
}
