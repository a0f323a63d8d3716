use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use crate::events::{AppEvent, EventBus, SessionChange};
use crate::models::{Session, UserProfile};

/// Durable storage for a remembered session. Exactly one vault backs a
/// session store; there is no second scope to reconcile against.
pub trait SessionVault: Send + Sync {
    fn load(&self) -> anyhow::Result<Option<Session>>;
    fn store(&self, session: &Session) -> anyhow::Result<()>;
    fn clear(&self) -> anyhow::Result<()>;
}

/// JSON file vault for remembered sessions.
#[derive(Debug)]
pub struct FsVault {
    path: PathBuf,
}

impl FsVault {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionVault for FsVault {
    fn load(&self) -> anyhow::Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        // A corrupt file is treated as no session rather than an error.
        Ok(serde_json::from_str(&raw).ok())
    }

    fn store(&self, session: &Session) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(session)?)?;
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-memory vault; the default when no session file is configured.
#[derive(Debug, Default)]
pub struct MemoryVault {
    slot: Mutex<Option<Session>>,
}

impl SessionVault for MemoryVault {
    fn load(&self) -> anyhow::Result<Option<Session>> {
        Ok(self.slot.lock().unwrap().clone())
    }

    fn store(&self, session: &Session) -> anyhow::Result<()> {
        *self.slot.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        *self.slot.lock().unwrap() = None;
        Ok(())
    }
}

/// Holds the current session and is the single source of truth for it.
/// `remember_me` decides whether the session outlives the process via the
/// vault; either way the in-memory copy is what requests read.
pub struct SessionStore {
    vault: Box<dyn SessionVault>,
    current: RwLock<Option<Session>>,
    expired: AtomicBool,
    bus: EventBus,
}

impl SessionStore {
    pub fn new(vault: Box<dyn SessionVault>, bus: EventBus) -> Self {
        Self {
            vault,
            current: RwLock::new(None),
            expired: AtomicBool::new(false),
            bus,
        }
    }

    /// Load a remembered session from the vault, if any.
    pub fn restore(&self) -> bool {
        match self.vault.load() {
            Ok(Some(session)) => {
                *self.current.write().unwrap() = Some(session);
                true
            }
            Ok(None) => false,
            Err(err) => {
                tracing::warn!(error = %err, "session restore failed");
                false
            }
        }
    }

    pub fn sign_in(&self, token: String, user: UserProfile, remember_me: bool) {
        let session = Session { token, user };
        let result = if remember_me {
            self.vault.store(&session)
        } else {
            self.vault.clear()
        };
        if let Err(err) = result {
            tracing::warn!(error = %err, "session vault write failed");
        }
        *self.current.write().unwrap() = Some(session);
        self.expired.store(false, Ordering::SeqCst);
        self.bus
            .publish(AppEvent::SessionChanged(SessionChange::SignedIn));
    }

    pub fn sign_out(&self) {
        self.clear();
        self.bus
            .publish(AppEvent::SessionChanged(SessionChange::SignedOut));
    }

    /// Global reaction to a 401: clear everything and announce the expiry
    /// exactly once, no matter how many in-flight requests fail together.
    pub fn invalidate(&self) {
        if self.expired.swap(true, Ordering::SeqCst) {
            return;
        }
        self.clear();
        self.bus
            .publish(AppEvent::SessionChanged(SessionChange::Expired));
    }

    fn clear(&self) {
        if let Err(err) = self.vault.clear() {
            tracing::warn!(error = %err, "session vault clear failed");
        }
        *self.current.write().unwrap() = None;
    }

    pub fn current(&self) -> Option<Session> {
        self.current.read().unwrap().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.current
            .read()
            .unwrap()
            .as_ref()
            .map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.current.read().unwrap().as_ref().map(|s| s.user.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.read().unwrap().is_some()
    }
}
