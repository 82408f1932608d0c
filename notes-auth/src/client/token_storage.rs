use crate::common::StoredSession;
use crate::error::AuthError;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// The three entries a session is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    AccessToken,
    RefreshToken,
    UserEmail,
}

/// Durable session storage, scoped to one API origin.
///
/// The session lives in a JSON file that is loaded once at construction and
/// mirrored in memory; every write goes through to disk. Concurrent writers
/// from other processes are not coordinated.
pub struct TokenStore {
    session_path: PathBuf,
    session: Mutex<StoredSession>,
}

impl TokenStore {
    /// Open the store for `api_url` inside `storage_dir`, creating the
    /// directory if needed.
    pub fn open(storage_dir: &Path, api_url: &str) -> Result<Self, AuthError> {
        if !storage_dir.exists() {
            fs::create_dir_all(storage_dir).map_err(|e| {
                AuthError::TokenStorage(format!("Failed to create storage directory: {}", e))
            })?;
        }

        let session_path = storage_dir.join(format!("session-{}.json", origin_key(api_url)));
        let session = Self::read(&session_path)?;

        tracing::debug!(path = %session_path.display(), "Token store opened");
        Ok(Self {
            session_path,
            session: Mutex::new(session),
        })
    }

    pub fn path(&self) -> &Path {
        &self.session_path
    }

    /// Stored value for `kind`; empty strings count as absent.
    pub fn get(&self, kind: TokenKind) -> Option<String> {
        let session = self.lock();
        let value = match kind {
            TokenKind::AccessToken => &session.access_token,
            TokenKind::RefreshToken => &session.refresh_token,
            TokenKind::UserEmail => &session.user_email,
        };
        value.clone().filter(|v| !v.is_empty())
    }

    pub fn access_token(&self) -> Option<String> {
        self.get(TokenKind::AccessToken)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.get(TokenKind::RefreshToken)
    }

    pub fn user_email(&self) -> Option<String> {
        self.get(TokenKind::UserEmail)
    }

    /// Replace all three entries in one write.
    pub fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
        user_email: &str,
    ) -> Result<(), AuthError> {
        let next = StoredSession {
            access_token: Some(access_token.to_string()),
            refresh_token: Some(refresh_token.to_string()),
            user_email: Some(user_email.to_string()),
        };

        let mut session = self.lock();
        self.write(&next)?;
        *session = next;
        Ok(())
    }

    /// Remove all three entries. Clearing an empty store is a no-op.
    ///
    /// The in-memory mirror is cleared even when removing the file fails.
    pub fn clear(&self) -> Result<(), AuthError> {
        let mut session = self.lock();
        *session = StoredSession::default();

        if self.session_path.exists() {
            fs::remove_file(&self.session_path).map_err(|e| {
                AuthError::TokenStorage(format!("Failed to delete session: {}", e))
            })?;
        }
        Ok(())
    }

    /// True iff a non-empty access token is stored. Expiry is not checked.
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, StoredSession> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn read(path: &Path) -> Result<StoredSession, AuthError> {
        if !path.exists() {
            return Ok(StoredSession::default());
        }

        let json = fs::read_to_string(path)
            .map_err(|e| AuthError::TokenStorage(format!("Failed to read session: {}", e)))?;

        match serde_json::from_str(&json) {
            Ok(session) => Ok(session),
            Err(e) => {
                tracing::warn!("Discarding unreadable session file: {}", e);
                Ok(StoredSession::default())
            }
        }
    }

    fn write(&self, session: &StoredSession) -> Result<(), AuthError> {
        let json = serde_json::to_string_pretty(session)?;

        // Write next to the target and rename so readers never see a partial file
        let tmp_path = self.session_path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .map_err(|e| AuthError::TokenStorage(format!("Failed to save session: {}", e)))?;

        // Set permissions to 0600 (read/write for owner only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&tmp_path)
                .map_err(|e| {
                    AuthError::TokenStorage(format!("Failed to get file permissions: {}", e))
                })?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&tmp_path, perms).map_err(|e| {
                AuthError::TokenStorage(format!("Failed to set file permissions: {}", e))
            })?;
        }

        fs::rename(&tmp_path, &self.session_path)
            .map_err(|e| AuthError::TokenStorage(format!("Failed to save session: {}", e)))?;
        Ok(())
    }
}

/// File-name-safe key for the scheme, host and port of `api_url`.
fn origin_key(api_url: &str) -> String {
    let without_scheme = api_url.split("://").nth(1).unwrap_or(api_url);
    let scheme = api_url.split("://").next().filter(|_| api_url.contains("://"));
    let authority = without_scheme.split('/').next().unwrap_or_default();

    let origin = match scheme {
        Some(scheme) => format!("{}_{}", scheme, authority),
        None => authority.to_string(),
    };

    origin
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
