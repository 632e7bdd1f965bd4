//! Session token persistence
//!
//! The access and refresh tokens are the only state the client keeps between
//! runs apart from the discovery draft. [`TokenStore`] abstracts where they
//! live so the request helper can be exercised against an in-memory store:
//!
//! - [`FileTokenStore`] -- JSON file in the data directory (default)
//! - [`KeyringTokenStore`] -- OS native credential store
//! - [`MemoryTokenStore`] -- process memory, used by tests and `session.store: memory`

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::config::{Config, TokenStoreKind};
use crate::error::{Result, VitalPathError};

/// File name of the session file inside the data directory.
pub const SESSION_FILE_NAME: &str = "session.json";

// ---------------------------------------------------------------------------
// SessionTokens
// ---------------------------------------------------------------------------

/// The pair of credentials issued at login and renewed on refresh.
///
/// # Examples
///
/// ```
/// use vitalpath::session::SessionTokens;
///
/// let tokens = SessionTokens::new("access", Some("refresh".to_string()));
/// assert!(tokens.can_refresh());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    /// Short-lived bearer token attached to every authenticated request.
    pub access_token: String,

    /// Long-lived token exchanged for a new access token after a `401`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl SessionTokens {
    /// Creates a token pair.
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
        }
    }

    /// Returns `true` when a non-empty refresh token is available.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token
            .as_deref()
            .map(|t| !t.is_empty())
            .unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// TokenStore
// ---------------------------------------------------------------------------

/// Persistent home of the session tokens.
///
/// Implementations must treat a missing session as `Ok(None)` and make
/// [`clear`](TokenStore::clear) idempotent.
pub trait TokenStore: Send + Sync {
    /// Loads the stored tokens, if any.
    fn load(&self) -> Result<Option<SessionTokens>>;

    /// Replaces the stored tokens.
    fn save(&self, tokens: &SessionTokens) -> Result<()>;

    /// Deletes the stored tokens. Succeeds when nothing is stored.
    fn clear(&self) -> Result<()>;
}

/// Opens the token store selected by `config.session.store`.
///
/// # Errors
///
/// Returns an error if the data directory cannot be determined for the file
/// store.
pub fn open_token_store(config: &Config) -> Result<Arc<dyn TokenStore>> {
    let store: Arc<dyn TokenStore> = match config.session.store {
        TokenStoreKind::File => Arc::new(FileTokenStore::new(
            config.data_dir()?.join(SESSION_FILE_NAME),
        )),
        TokenStoreKind::Keyring => Arc::new(KeyringTokenStore::default()),
        TokenStoreKind::Memory => Arc::new(MemoryTokenStore::default()),
    };
    tracing::debug!(store = ?config.session.store, "Opened token store");
    Ok(store)
}

// ---------------------------------------------------------------------------
// FileTokenStore
// ---------------------------------------------------------------------------

/// Stores the tokens as a small JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// The file and its parent directory are created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SessionTokens>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(VitalPathError::Io(e).into()),
        };
        let tokens: SessionTokens = serde_json::from_str(&contents).map_err(|e| {
            VitalPathError::TokenStore(format!(
                "Malformed session file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(Some(tokens))
    }

    fn save(&self, tokens: &SessionTokens) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json_str = serde_json::to_string_pretty(tokens)?;
        write_owner_only(&self.path, &json_str)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(VitalPathError::Io(e).into()),
        }
    }
}

/// Writes `contents` to `path`, readable and writable by the owner only on
/// unix. A pre-existing file is narrowed to the same mode.
fn write_owner_only(path: &Path, contents: &str) -> std::io::Result<()> {
    use std::io::Write;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents.as_bytes())
}

// ---------------------------------------------------------------------------
// KeyringTokenStore
// ---------------------------------------------------------------------------

/// Stores each token as its own entry in the OS native keyring.
///
/// Both entries share one service name; the access token is kept under the
/// `access` user and the refresh token under `refresh`.
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    service: String,
}

const ACCESS_ENTRY: &str = "access";
const REFRESH_ENTRY: &str = "refresh";

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new("vitalpath-session")
    }
}

impl KeyringTokenStore {
    /// Creates a store under the given keyring service name.
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, user: &str) -> Result<keyring::Entry> {
        keyring::Entry::new(&self.service, user).map_err(|e| VitalPathError::Keyring(e).into())
    }

    fn read(&self, user: &str) -> Result<Option<String>> {
        match self.entry(user)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(VitalPathError::Keyring(e).into()),
        }
    }

    fn delete(&self, user: &str) -> Result<()> {
        match self.entry(user)?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(VitalPathError::Keyring(e).into()),
        }
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<SessionTokens>> {
        let Some(access_token) = self.read(ACCESS_ENTRY)? else {
            return Ok(None);
        };
        let refresh_token = self.read(REFRESH_ENTRY)?;
        Ok(Some(SessionTokens {
            access_token,
            refresh_token,
        }))
    }

    fn save(&self, tokens: &SessionTokens) -> Result<()> {
        self.entry(ACCESS_ENTRY)?
            .set_password(&tokens.access_token)
            .map_err(VitalPathError::Keyring)?;
        match &tokens.refresh_token {
            Some(refresh) => self
                .entry(REFRESH_ENTRY)?
                .set_password(refresh)
                .map_err(VitalPathError::Keyring)?,
            None => self.delete(REFRESH_ENTRY)?,
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.delete(ACCESS_ENTRY)?;
        self.delete(REFRESH_ENTRY)
    }
}

// ---------------------------------------------------------------------------
// MemoryTokenStore
// ---------------------------------------------------------------------------

/// Keeps the tokens in process memory.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<Option<SessionTokens>>,
}

impl MemoryTokenStore {
    /// Creates a store pre-populated with `tokens`.
    pub fn with_tokens(tokens: SessionTokens) -> Self {
        Self {
            tokens: Mutex::new(Some(tokens)),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<SessionTokens>>> {
        self.tokens
            .lock()
            .map_err(|_| VitalPathError::TokenStore("token store lock poisoned".to_string()).into())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SessionTokens>> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, tokens: &SessionTokens) -> Result<()> {
        *self.lock()? = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock()? = None;
        Ok(())
    }
}
