use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::credentials::token::Token;
use crate::error::{FetchError, StoreError};

/// Single-slot holder of the OAuth2 token, backed by a JSON file.
///
/// Readers get a clone of the whole token, so a concurrent `replace`
/// is never observed half-written.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    token: RwLock<Option<Token>>,
    // serializes writers so disk and memory never disagree
    writer: Mutex<()>,
}

impl CredentialStore {
    /// Load the token file. A missing file gives an empty store,
    /// a corrupt one is an error.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let token = match fs::read_to_string(&path).await {
            Ok(content) => {
                let token: Token = serde_json::from_str(&content)?;
                info!(path = %path.display(), expiry = %token.expiry, "token loaded");
                Some(token)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "no token file, login required");
                None
            }
            Err(err) => return Err(StoreError::Io(err)),
        };

        Ok(Self {
            path,
            token: RwLock::new(token),
            writer: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Latest known token. Never touches the network or the disk.
    pub async fn current(&self) -> Result<Token, FetchError> {
        self.token
            .read()
            .await
            .clone()
            .ok_or_else(|| FetchError::Credential(StoreError::Empty.to_string()))
    }

    /// Persist `token` and only then make it current. On a persistence
    /// failure the previous token stays in memory and on disk.
    pub async fn replace(&self, token: Token) -> Result<(), StoreError> {
        let _writer = self.writer.lock().await;
        persist(&self.path, &token).await?;
        *self.token.write().await = Some(token);
        debug!(path = %self.path.display(), "token replaced");
        Ok(())
    }

    /// Like [`CredentialStore::replace`], but only while the held token is
    /// still `expected`. Returns false, writing nothing, when another writer
    /// got there first.
    pub async fn replace_if_current(&self, expected: &Token, token: Token) -> Result<bool, StoreError> {
        let _writer = self.writer.lock().await;
        if self.token.read().await.as_ref() != Some(expected) {
            debug!(path = %self.path.display(), "token changed underneath, not replaced");
            return Ok(false);
        }
        persist(&self.path, &token).await?;
        *self.token.write().await = Some(token);
        debug!(path = %self.path.display(), "token replaced");
        Ok(true)
    }
}

/// Atomic write: tmp file with 0600 permissions, then rename over the target.
async fn persist(path: &Path, token: &Token) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let content = serde_json::to_vec_pretty(token)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &content).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600)).await?;
    }

    if let Err(err) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(StoreError::Io(err));
    }
    Ok(())
}
