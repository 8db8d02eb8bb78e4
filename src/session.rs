use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::model::{RemoteConfig, SessionConfig, SessionState};

const STORE_DIR: &str = ".favdash";

/// Persistent per-user session state: `config.json` holds the remote and
/// identity, `state.json` holds bearer tokens. Tokens never live in
/// `config.json`.
#[derive(Clone)]
pub struct SessionStore {
    root: PathBuf,
}

impl SessionStore {
    pub fn store_dir(root: &Path) -> PathBuf {
        root.join(STORE_DIR)
    }

    /// Default store root: `FAVDASH_HOME`, else the user's home directory.
    pub fn default_root() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("FAVDASH_HOME") {
            return Ok(PathBuf::from(dir));
        }
        dirs::home_dir().ok_or_else(|| anyhow!("cannot determine home directory"))
    }

    pub fn open_or_init(root: &Path) -> Result<Self> {
        let dir = Self::store_dir(root);
        if !dir.is_dir() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("create {}", dir.display()))?;

            let cfg = SessionConfig {
                version: 1,
                remote: None,
            };
            let cfg_bytes =
                serde_json::to_vec_pretty(&cfg).context("serialize session config")?;
            write_atomic(&dir.join("config.json"), &cfg_bytes).context("write config.json")?;

            let state = SessionState {
                version: 1,
                tokens: std::collections::HashMap::new(),
            };
            let state_bytes =
                serde_json::to_vec_pretty(&state).context("serialize session state")?;
            write_atomic(&dir.join("state.json"), &state_bytes).context("write state.json")?;
        }
        Ok(Self { root: dir })
    }

    pub fn read_config(&self) -> Result<SessionConfig> {
        let bytes = fs::read(self.root.join("config.json")).context("read config.json")?;
        serde_json::from_slice(&bytes).context("parse config.json")
    }

    pub fn write_config(&self, cfg: &SessionConfig) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(cfg).context("serialize session config")?;
        write_atomic(&self.root.join("config.json"), &bytes).context("write config.json")?;
        Ok(())
    }

    fn read_state(&self) -> Result<SessionState> {
        let path = self.root.join("state.json");
        if !path.is_file() {
            return Ok(SessionState {
                version: 1,
                tokens: std::collections::HashMap::new(),
            });
        }
        let bytes = fs::read(&path).context("read state.json")?;
        serde_json::from_slice(&bytes).context("parse state.json")
    }

    fn write_state(&self, state: &SessionState) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(state).context("serialize session state")?;
        write_atomic(&self.root.join("state.json"), &bytes).context("write state.json")?;
        Ok(())
    }

    /// Tokens are keyed per identity and remote so switching either never
    /// reuses a stale credential.
    pub fn token_key(&self, remote: &RemoteConfig) -> String {
        format!("{}@{}", remote.email, remote.base_url)
    }

    pub fn get_token(&self, remote: &RemoteConfig) -> Result<Option<String>> {
        let state = self.read_state()?;
        Ok(state.tokens.get(&self.token_key(remote)).cloned())
    }

    pub fn set_token(&self, remote: &RemoteConfig, token: &str) -> Result<()> {
        let mut state = self.read_state()?;
        state
            .tokens
            .insert(self.token_key(remote), token.to_string());
        self.write_state(&state)
    }

    pub fn clear_token(&self, remote: &RemoteConfig) -> Result<()> {
        let mut state = self.read_state()?;
        state.tokens.remove(&self.token_key(remote));
        self.write_state(&state)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
