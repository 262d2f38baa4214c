//! Authentication session shared by the client, the route guard and the CLI.
//!
//! A [`SessionStore`] is a cheap cloneable handle; every clone sees the same
//! session. The token is persisted through a [`TokenStore`] so a restart can
//! restore it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::ClientError;
use crate::models::AccessToken;

/// Current authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub authenticated: bool,
}

impl Session {
    fn with_token(token: Option<String>) -> Self {
        Self {
            authenticated: token.is_some(),
            token,
        }
    }
}

/// Token persistence errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed session file: {0}")]
    Format(#[from] serde_json::Error),
}

/// Login failures surfaced to the UI.
#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Login rejected: invalid username or password")]
    Rejected,

    #[error("Login failed: {0}")]
    Client(ClientError),

    #[error("Could not persist session: {0}")]
    Persist(#[from] SessionError),
}

impl From<ClientError> for LoginError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Unauthorized | ClientError::BadRequest(_) => LoginError::Rejected,
            other => LoginError::Client(other),
        }
    }
}

/// Exchanges credentials for an access token.
#[allow(async_fn_in_trait)]
pub trait Authenticator {
    async fn request_token(&self, username: &str, password: &str)
        -> Result<AccessToken, ClientError>;
}

/// Where the session token lives between runs.
pub trait TokenStore: Send + Sync + std::fmt::Debug {
    fn load(&self) -> Result<Option<String>, SessionError>;
    fn save(&self, token: &str) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
}

/// JSON file holding the token under the `token` key.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let stored: StoredSession = serde_json::from_str(&content)?;
        Ok(Some(stored.token))
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&StoredSession {
            token: token.to_string(),
        })?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local token storage, for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.token.lock().clone())
    }

    fn save(&self, token: &str) -> Result<(), SessionError> {
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.token.lock() = None;
        Ok(())
    }
}

/// Shared handle to the authentication session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    state: Arc<RwLock<Session>>,
    store: Arc<dyn TokenStore>,
}

impl SessionStore {
    /// Create a store, restoring any persisted token.
    ///
    /// An unreadable token file is logged and treated as logged out.
    pub fn new(store: impl TokenStore + 'static) -> Self {
        let token = store.load().unwrap_or_else(|e| {
            tracing::warn!("Ignoring persisted session: {}", e);
            None
        });
        if token.is_some() {
            tracing::debug!("Restored persisted session");
        }
        Self {
            state: Arc::new(RwLock::new(Session::with_token(token))),
            store: Arc::new(store),
        }
    }

    /// Store backed by a JSON file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(FileTokenStore::new(path))
    }

    /// Store that forgets everything when dropped.
    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStore::default())
    }

    pub fn snapshot(&self) -> Session {
        self.state.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().authenticated
    }

    /// Exchange credentials for a token and start a session.
    ///
    /// On failure the current session is left untouched.
    pub async fn login<A: Authenticator>(
        &self,
        auth: &A,
        username: &str,
        password: &str,
    ) -> Result<(), LoginError> {
        let token = match auth.request_token(username, password).await {
            Ok(token) => token.access_token,
            Err(e) => {
                let err = LoginError::from(e);
                tracing::warn!(username, "Login failed: {}", err);
                return Err(err);
            }
        };

        if let Err(e) = self.store.save(&token) {
            tracing::warn!(username, "Login failed: could not persist session: {}", e);
            return Err(LoginError::Persist(e));
        }
        *self.state.write() = Session::with_token(Some(token));
        tracing::info!(username, "Logged in");
        Ok(())
    }

    /// End the session. Safe to call when already logged out.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear persisted session: {}", e);
        }
        let mut state = self.state.write();
        if state.authenticated {
            tracing::info!("Logged out");
        }
        *state = Session::default();
    }
}
