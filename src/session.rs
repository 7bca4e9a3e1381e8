//! Session token storage.
//!
//! The web frontends kept the bearer token in browser session storage;
//! the CLI equivalent is a token file under the user's config directory.
//! The token is only ever handed to the API client explicitly, the client
//! itself holds no session state.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::debug;

/// Environment variable overriding the token file location.
pub const TOKEN_FILE_ENV: &str = "BOOMKAART_TOKEN_FILE";

/// File-backed store for the session bearer token.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store at the default location.
    ///
    /// Resolution order: `BOOMKAART_TOKEN_FILE`, then
    /// `<config dir>/boomkaart/token`, then `.boomkaart-token` in the
    /// working directory when no config dir exists.
    #[must_use]
    pub fn from_env() -> Self {
        let path = std::env::var_os(TOKEN_FILE_ENV).map_or_else(
            || {
                dirs::config_dir().map_or_else(
                    || PathBuf::from(".boomkaart-token"),
                    |dir| dir.join("boomkaart").join("token"),
                )
            },
            PathBuf::from,
        );
        Self { path }
    }

    /// Create a store at an explicit path.
    #[must_use]
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the token file exists but cannot be read.
    pub fn load(&self) -> Result<Option<String>, io::Error> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim().to_string();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Persist a token, replacing any previous session.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directory cannot be written.
    pub fn save(&self, token: &str) -> Result<(), io::Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        debug!("session token written to {}", self.path.display());
        Ok(())
    }

    /// Remove the stored token. Missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the token file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), io::Error> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("session token cleared");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
