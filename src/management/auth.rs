use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::{error::ApiError, types::UserToken};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored token is unreadable: {0}")]
    Token(#[from] ApiError),
}

/// Persists a user token between sessions as one compact line in the local
/// data directory.
///
/// This is a storage collaborator only: the token held by the client stays
/// the single source of truth during a session, and this cache is written
/// after lifecycle changes (login, refresh) and deleted on logout.
pub struct TokenCache {
    path: PathBuf,
    token: UserToken,
}

impl TokenCache {
    pub fn new(token: UserToken) -> Self {
        Self {
            path: Self::token_path(),
            token,
        }
    }

    /// Cache backed by an explicit file, for tests and custom hosts.
    pub fn with_path(path: PathBuf, token: UserToken) -> Self {
        Self { path, token }
    }

    pub async fn load() -> Result<Self, CacheError> {
        Self::load_from(&Self::token_path()).await
    }

    pub async fn load_from(path: &Path) -> Result<Self, CacheError> {
        let content = async_fs::read_to_string(path).await?;
        let token = UserToken::from_compact(content.trim())?;
        Ok(Self {
            path: path.to_path_buf(),
            token,
        })
    }

    pub async fn persist(&self) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }
        async_fs::write(&self.path, self.token.to_compact()).await?;
        Ok(())
    }

    /// Delete the cached token file; missing files count as cleared.
    pub async fn clear() -> Result<(), CacheError> {
        match async_fs::remove_file(Self::token_path()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Io(e)),
        }
    }

    pub fn token(&self) -> &UserToken {
        &self.token
    }

    pub fn into_token(self) -> UserToken {
        self.token
    }

    fn token_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("tonalcli/cache/token");
        path
    }
}
