use serde::{Deserialize, Serialize};

/// One category record as the backend reports it. The wire format keeps the
/// backend's Portuguese field names; everything above the wire uses English.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "nome")]
    pub name: String,

    #[serde(rename = "favoritos")]
    pub favorites: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    pub version: u32,

    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub email: String,

    /// Stored only when the user opts in (`login --remember-senha`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub senha: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub version: u32,

    /// Bearer tokens keyed per remote (see `SessionStore::token_key`).
    #[serde(default)]
    pub tokens: std::collections::HashMap<String, String>,
}
