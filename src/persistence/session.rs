use crate::identity::Identity;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Remembered sign-in stored in session.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFile {
    pub identity: Identity,
    #[serde(default)]
    pub signed_in_at: Option<String>, // ISO8601 timestamp
}

impl SessionFile {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            signed_in_at: Some(chrono::Local::now().to_rfc3339()),
        }
    }
}

/// Load the session file; `None` if nobody is signed in
pub fn load_session<P: AsRef<Path>>(path: P) -> Result<Option<SessionFile>> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let session: SessionFile = serde_json::from_str(&content)
        .with_context(|| format!("Invalid session file: {}", path.display()))?;
    Ok(Some(session))
}

pub fn save_session<P: AsRef<Path>>(path: P, session: &SessionFile) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        crate::persistence::ensure_dir(dir)?;
    }
    let json = serde_json::to_string_pretty(session)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}

pub fn clear_session<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove session file: {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_session() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("session.json");

        assert!(load_session(&path).unwrap().is_none());
    }

    #[test]
    fn test_save_load_and_clear_session() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("session.json");
        let identity = Identity::from_display_name("Lan");

        save_session(&path, &SessionFile::new(identity.clone())).unwrap();
        let loaded = load_session(&path).unwrap().unwrap();
        assert_eq!(loaded.identity, identity);
        assert!(loaded.signed_in_at.is_some());

        clear_session(&path).unwrap();
        assert!(load_session(&path).unwrap().is_none());
        clear_session(&path).unwrap();
    }
}
