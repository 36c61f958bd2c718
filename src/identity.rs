use crate::error::{PlannerError, ValidationError};
use crate::persistence::{clear_session, load_session, save_session, SessionFile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use uuid::Uuid;

/// Namespace for deriving profile uids from display names
const PROFILE_NAMESPACE: Uuid = Uuid::from_u128(0x5d1f_0c3a_8e47_4b6e_9a51_2f7c_d4e8_b903);

const SESSION_FILE: &str = "session.json";

/// The signed-in user; all task data is scoped by `uid`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub display_name: String,
}

impl Identity {
    /// Identity for a local profile; the uid is stable for the same name
    /// regardless of case or surrounding whitespace.
    pub fn from_display_name(display_name: &str) -> Self {
        let name = display_name.trim();
        let uid = Uuid::new_v5(&PROFILE_NAMESPACE, name.to_lowercase().as_bytes());
        Self {
            uid: uid.to_string(),
            display_name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEvent {
    SignedIn(Identity),
    SignedOut,
}

/// Source of the current identity and of identity changes
pub trait IdentityProvider {
    fn current(&self) -> Option<Identity>;

    /// Receive every identity change from now on
    fn subscribe(&mut self) -> Receiver<IdentityEvent>;

    fn sign_in(&mut self, display_name: &str) -> Result<Identity, PlannerError>;

    fn sign_out(&mut self) -> Result<(), PlannerError>;
}

/// Local named profiles; the signed-in profile is remembered in `session.json`
pub struct LocalIdentityProvider {
    session_path: PathBuf,
    current: Option<Identity>,
    listeners: Vec<Sender<IdentityEvent>>,
}

impl LocalIdentityProvider {
    /// Open the provider, restoring the remembered session if there is one
    pub fn open(data_dir: &Path) -> Self {
        let session_path = data_dir.join(SESSION_FILE);
        let current = match load_session(&session_path) {
            Ok(session) => session.map(|s| s.identity),
            Err(e) => {
                log::warn!("ignoring unreadable session file: {:#}", e);
                None
            }
        };

        Self {
            session_path,
            current,
            listeners: Vec::new(),
        }
    }

    fn emit(&mut self, event: IdentityEvent) {
        self.listeners.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl IdentityProvider for LocalIdentityProvider {
    fn current(&self) -> Option<Identity> {
        self.current.clone()
    }

    fn subscribe(&mut self) -> Receiver<IdentityEvent> {
        let (tx, rx) = mpsc::channel();
        self.listeners.push(tx);
        rx
    }

    fn sign_in(&mut self, display_name: &str) -> Result<Identity, PlannerError> {
        if display_name.trim().is_empty() {
            return Err(ValidationError::EmptyDisplayName.into());
        }

        let identity = Identity::from_display_name(display_name);
        if let Some(current) = self.current.as_ref().filter(|c| c.uid == identity.uid) {
            return Ok(current.clone());
        }

        let session = SessionFile::new(identity.clone());
        save_session(&self.session_path, &session)
            .map_err(|e| PlannerError::Identity(format!("{:#}", e)))?;

        log::info!("signed in as {} ({})", identity.display_name, identity.uid);
        self.current = Some(identity.clone());
        self.emit(IdentityEvent::SignedIn(identity.clone()));
        Ok(identity)
    }

    fn sign_out(&mut self) -> Result<(), PlannerError> {
        let Some(previous) = self.current.take() else {
            return Ok(());
        };

        clear_session(&self.session_path).map_err(|e| PlannerError::Identity(format!("{:#}", e)))?;

        log::info!("signed out {}", previous.display_name);
        self.emit(IdentityEvent::SignedOut);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_uid_is_stable_per_name() {
        let a = Identity::from_display_name("Lan");
        let b = Identity::from_display_name("  lan ");
        let c = Identity::from_display_name("Minh");

        assert_eq!(a.uid, b.uid);
        assert_ne!(a.uid, c.uid);
        assert_eq!(b.display_name, "lan");
    }

    #[test]
    fn test_sign_in_emits_and_persists() {
        let dir = tempdir().unwrap();
        let mut provider = LocalIdentityProvider::open(dir.path());
        let events = provider.subscribe();
        assert!(provider.current().is_none());

        let identity = provider.sign_in("Lan").unwrap();
        assert_eq!(events.try_recv().unwrap(), IdentityEvent::SignedIn(identity.clone()));

        let reopened = LocalIdentityProvider::open(dir.path());
        assert_eq!(reopened.current(), Some(identity));
    }

    #[test]
    fn test_sign_in_same_identity_is_quiet() {
        let dir = tempdir().unwrap();
        let mut provider = LocalIdentityProvider::open(dir.path());
        provider.sign_in("Lan").unwrap();
        let events = provider.subscribe();

        let same = provider.sign_in("lan").unwrap();
        assert!(events.try_recv().is_err());
        assert_eq!(same.display_name, "Lan");
        assert_eq!(provider.current().map(|c| c.display_name), Some("Lan".to_string()));
    }

    #[test]
    fn test_sign_in_rejects_blank_name() {
        let dir = tempdir().unwrap();
        let mut provider = LocalIdentityProvider::open(dir.path());

        let err = provider.sign_in("   ").unwrap_err();
        assert!(matches!(err, PlannerError::Validation(ValidationError::EmptyDisplayName)));
        assert!(provider.current().is_none());
    }

    #[test]
    fn test_sign_out_clears_session() {
        let dir = tempdir().unwrap();
        let mut provider = LocalIdentityProvider::open(dir.path());
        provider.sign_in("Lan").unwrap();
        let events = provider.subscribe();

        provider.sign_out().unwrap();
        assert_eq!(events.try_recv().unwrap(), IdentityEvent::SignedOut);
        assert!(provider.current().is_none());
        assert!(LocalIdentityProvider::open(dir.path()).current().is_none());

        // Signing out twice is a no-op
        provider.sign_out().unwrap();
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_corrupt_session_is_ignored() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SESSION_FILE), "not json").unwrap();
        assert!(LocalIdentityProvider::open(dir.path()).current().is_none());
    }
}
