//! On-disk token persistence.
//!
//! A small JSON file under the platform config directory holding the last
//! id/access token pair, so a signed-in session survives restarts. Token
//! *acquisition* is an external concern; this module only keeps what the
//! caller hands it.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokens {
    #[serde(default)]
    pub id_token: String,
    #[serde(default)]
    pub access_token: String,
}

pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store at the platform default location
    /// (e.g. `~/.config/datagrid/tokens.json`). `None` when the platform has
    /// no config directory.
    pub fn default_location() -> Option<Self> {
        let dir = dirs::config_dir()?;
        Some(Self {
            path: dir.join("datagrid").join("tokens.json"),
        })
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load stored tokens. Missing or corrupt files yield the empty default.
    pub fn load(&self) -> StoredTokens {
        match fs::read_to_string(&self.path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                log::warn!("corrupt token file {}: {}", self.path.display(), e);
                StoredTokens::default()
            }),
            Err(_) => StoredTokens::default(),
        }
    }

    /// Persist tokens, creating parent directories as needed.
    pub fn save(&self, tokens: &StoredTokens) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(tokens)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, json)
    }

    /// Remove the token file. Missing file is not an error.
    pub fn clear(&self) -> std::io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
