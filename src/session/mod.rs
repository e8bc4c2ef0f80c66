// src/session/mod.rs — Persisted login session
//
// Stores the current credential and identity in $PULSEDECK_HOME/session.json
// so a login survives process restarts. The file is written atomically and
// chmod 600 on Unix, the same way other CLI tools (gh, aws-cli) store
// credentials.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::api::types::UserProfile;
use crate::infra::paths;

/// The client's record of who is currently authenticated.
///
/// Invariant: `identity` is only present when `credential` is present.
/// `login` takes both and `logout` clears both, so the states cannot drift.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub credential: Option<String>,
    pub identity: Option<UserProfile>,
}

fn session_path() -> PathBuf {
    paths::session_file()
}

impl Session {
    /// Load the persisted session. Returns an empty (logged-out) session if
    /// the file doesn't exist or cannot be parsed.
    pub fn load() -> Self {
        let path = session_path();
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        match serde_json::from_str(&content) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Discarding unreadable session file: {e}");
                Self::default()
            }
        }
    }

    /// Set authenticated state and persist it.
    pub fn login(&mut self, credential: impl Into<String>, identity: UserProfile) -> Result<()> {
        self.credential = Some(credential.into());
        self.identity = Some(identity);
        self.save()
    }

    /// Clear authenticated state and remove the persisted copy.
    pub fn logout(&mut self) -> Result<()> {
        self.credential = None;
        self.identity = None;
        let path = session_path();
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    /// Bearer token for outbound requests, if logged in.
    pub fn token(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    /// Save session.json atomically (write to .tmp then rename, chmod 600).
    pub fn save(&self) -> Result<()> {
        let path = session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;

        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
        }

        std::fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_identity() -> UserProfile {
        UserProfile {
            id: "u-1".into(),
            email: "tester@example.com".into(),
            name: Some("Tester".into()),
            created_at: None,
        }
    }

    #[test]
    fn test_default_is_logged_out() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
        assert!(session.identity.is_none());
    }

    #[test]
    fn test_identity_cleared_with_credential() {
        // Construct via serde to simulate a logged-in session without disk IO
        let json = serde_json::json!({
            "credential": "tok-abc",
            "identity": test_identity(),
        });
        let mut session: Session = serde_json::from_value(json).unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("tok-abc"));

        session.credential = None;
        session.identity = None;
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::json!({
            "credential": "tok-xyz",
            "identity": test_identity(),
        });
        let session: Session = serde_json::from_value(json).unwrap();
        let serialized = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&serialized).unwrap();
        assert_eq!(back.token(), Some("tok-xyz"));
        assert_eq!(back.identity.unwrap().email, "tester@example.com");
    }

    #[test]
    fn test_missing_fields_tolerated() {
        let session: Session = serde_json::from_str("{}").unwrap();
        assert!(!session.is_authenticated());
    }
}
