//! JSON file backed state store

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next as dirs;

use super::StateStore;
use crate::core::proxy::state::PersistedState;

/// Application identifier used for the default state location
const APP_DIR: &str = "proxy-switchboard";

fn join_default_path(base: &Path) -> PathBuf {
    let mut p = base.to_path_buf();
    p.push("state");
    p.push("state.json");
    p
}

/// State store persisting a single pretty-printed JSON document.
///
/// The document is a flat object whose keys are the persisted key space
/// (`proxyActive`, `selectedProxy`, `lastError`, `lastConnected`,
/// `lastDisconnected`, `installDate`).
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store at an explicit file path
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under a base directory (`<base>/state/state.json`)
    pub fn at_base_dir(base: &Path) -> Self {
        Self {
            path: join_default_path(base),
        }
    }

    /// Store at the platform default location.
    ///
    /// Windows: `%APPDATA%\proxy-switchboard`,
    /// macOS: `~/Library/Application Support/proxy-switchboard`,
    /// Linux: `~/.config/proxy-switchboard`. Falls back to the current
    /// directory only when no config dir can be resolved.
    pub fn default_location() -> Self {
        let base = dirs::config_dir()
            .map(|mut dir| {
                dir.push(APP_DIR);
                dir
            })
            .unwrap_or_else(|| {
                std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
            });
        Self::at_base_dir(&base)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored state, seeding the initial state on first run.
    ///
    /// The seeded state stamps `installDate`, so callers can tell a fresh
    /// install from a restart.
    pub fn load_or_init(&self) -> Result<PersistedState> {
        if self.path.exists() {
            self.load()
        } else {
            let state = PersistedState::initial();
            self.save(&state)?;
            tracing::info!(target = "store", path = %self.path.display(), "state initialized");
            Ok(state)
        }
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<PersistedState> {
        let data = fs::read(&self.path)
            .with_context(|| format!("read state: {}", self.path.display()))?;
        let state: PersistedState =
            serde_json::from_slice(&data).context("parse state json")?;
        Ok(state)
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).ok();
        }
        let json = serde_json::to_string_pretty(state).context("serialize state")?;
        let mut f = fs::File::create(&self.path)
            .with_context(|| format!("create state: {}", self.path.display()))?;
        f.write_all(json.as_bytes()).context("write state")?;
        tracing::debug!(target = "store", path = %self.path.display(), "state saved");
        Ok(())
    }
}
