use anyhow::{Context, Result};

use crate::metrics::{self, EngagementStats};
use crate::model::{Category, RemoteConfig};
use crate::remote::RemoteClient;
use crate::session::SessionStore;

/// One loaded dataset: the original payload order (export iterates this),
/// a sorted copy for display, and the aggregates computed from the whole.
#[derive(Clone, Debug)]
pub struct DashboardData {
    pub categories: Vec<Category>,
    pub sorted: Vec<Category>,
    pub stats: EngagementStats,
}

impl DashboardData {
    pub fn from_categories(categories: Vec<Category>) -> Self {
        let stats = metrics::compute_stats(&categories);
        let sorted = metrics::sorted_by_favorites(&categories);
        Self {
            categories,
            sorted,
            stats,
        }
    }
}

pub fn require_remote(store: &SessionStore) -> Result<RemoteConfig> {
    let cfg = store.read_config()?;
    cfg.remote
        .context("no remote configured (run `favdash login --url ... --email ...`)")
}

/// Password resolution order: config (opt-in), then `FAVDASH_SENHA`.
pub fn resolve_senha(remote: &RemoteConfig) -> Result<String> {
    if let Some(senha) = &remote.senha {
        return Ok(senha.clone());
    }
    std::env::var("FAVDASH_SENHA")
        .context("no senha available (pass --senha, set FAVDASH_SENHA, or login --remember-senha)")
}

/// Auth bootstrap + data load. A stored token is reused as-is; otherwise a
/// login exchange runs once and its token is persisted before the fetch.
/// No retry in either leg.
pub fn load(store: &SessionStore, remote: &RemoteConfig) -> Result<DashboardData> {
    let client = RemoteClient::new(remote.clone())?;

    let token = match store.get_token(remote)? {
        Some(token) => token,
        None => {
            let senha = resolve_senha(remote)?;
            let token = client.login(&senha).context("login")?;
            store.set_token(remote, &token).context("persist token")?;
            token
        }
    };

    let categories = client.fetch_categories(&token).context("load categories")?;
    Ok(DashboardData::from_categories(categories))
}
