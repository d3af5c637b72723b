use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tokio::sync::watch;

use crate::error::{ApiError, ApiResult};
use crate::models::User;

const SESSION_FILE: &str = "session.json";
const TOKEN_FILE: &str = "token";

/// Observable session lifecycle. `Invalidated` is the forced teardown that
/// the HTTP layer triggers on an authorization failure; the shell treats it
/// as "navigate to the login screen".
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    SignedOut,
    SignedIn(User),
    Invalidated,
}

/// Holds the current authenticated identity and keeps it in sync with two
/// durable entries under the data directory: the serialized session and the
/// raw bearer token. The two entries are always written and cleared
/// together; a lone survivor on disk is treated as absent and removed.
pub struct SessionStore {
    session_path: PathBuf,
    token_path: PathBuf,
    inner: RwLock<Option<(User, String)>>,
    tx: watch::Sender<SessionState>,
}

impl SessionStore {
    /// Read persisted state from `data_dir`. No network call is made; if
    /// both entries are present the session is available synchronously.
    pub fn open(data_dir: &Path) -> Self {
        let session_path = data_dir.join(SESSION_FILE);
        let token_path = data_dir.join(TOKEN_FILE);

        let loaded = Self::read_entries(&session_path, &token_path);
        if loaded.is_none() {
            // Restore the both-or-neither invariant.
            remove_if_present(&session_path);
            remove_if_present(&token_path);
        }

        let state = match &loaded {
            Some((user, _)) => SessionState::SignedIn(user.clone()),
            None => SessionState::SignedOut,
        };
        let (tx, _) = watch::channel(state);

        Self {
            session_path,
            token_path,
            inner: RwLock::new(loaded),
            tx,
        }
    }

    fn read_entries(session_path: &Path, token_path: &Path) -> Option<(User, String)> {
        let raw_session = fs::read_to_string(session_path).ok()?;
        let token = fs::read_to_string(token_path).ok()?.trim().to_string();
        if token.is_empty() {
            return None;
        }
        match serde_json::from_str(&raw_session) {
            Ok(user) => Some((user, token)),
            Err(e) => {
                tracing::warn!("discarding unreadable session file: {}", e);
                None
            }
        }
    }

    /// Synchronous snapshot of the signed-in user, if any.
    pub fn current(&self) -> Option<User> {
        self.inner
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(|(user, _)| user.clone())
    }

    /// Snapshot of the bearer credential, if any.
    pub fn token(&self) -> Option<String> {
        self.inner
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(|(_, token)| token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .read()
            .expect("session lock poisoned")
            .is_some()
    }

    /// Persist both entries, then publish the new session. The disk write
    /// happens immediately; failure leaves the previous state in place.
    pub fn store(&self, user: User, token: String) -> ApiResult<()> {
        if let Some(parent) = self.session_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.session_path, serde_json::to_string(&user)?)?;
        fs::write(&self.token_path, &token)?;

        *self.inner.write().expect("session lock poisoned") = Some((user.clone(), token));
        self.tx.send_replace(SessionState::SignedIn(user));
        Ok(())
    }

    /// Replace the session entry while keeping the existing credential.
    /// Used after a successful profile update.
    pub fn update_user(&self, user: User) -> ApiResult<()> {
        let mut guard = self.inner.write().expect("session lock poisoned");
        match guard.as_mut() {
            Some((current, _)) => {
                fs::write(&self.session_path, serde_json::to_string(&user)?)?;
                *current = user.clone();
                drop(guard);
                self.tx.send_replace(SessionState::SignedIn(user));
                Ok(())
            }
            None => Err(ApiError::Unauthorized),
        }
    }

    /// Clear both entries unconditionally and publish absence. Never makes
    /// a network call and never fails; an undeletable file is only logged.
    pub fn clear(&self) {
        self.wipe();
        self.tx.send_replace(SessionState::SignedOut);
    }

    /// Forced teardown after an authorization failure. Identical cleanup to
    /// `clear`, but observers see `Invalidated` so the shell can report the
    /// expired session and navigate to login.
    pub fn invalidate(&self) {
        self.wipe();
        self.tx.send_replace(SessionState::Invalidated);
    }

    fn wipe(&self) {
        remove_if_present(&self.session_path);
        remove_if_present(&self.token_path);
        *self.inner.write().expect("session lock poisoned") = None;
    }

    /// Watch the session lifecycle. The receiver starts at the current
    /// state.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }
}

fn remove_if_present(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("failed to remove {}: {}", path.display(), e);
        }
    }
}
