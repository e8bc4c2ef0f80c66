// tests/session_test.rs — Persisted session lifecycle against a temp home

use std::sync::Mutex;

use pretty_assertions::assert_eq;
use pulsedeck::api::types::UserProfile;
use pulsedeck::session::Session;
use tempfile::TempDir;

// PULSEDECK_HOME is process-wide; serialize the tests that set it.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn with_temp_home<F: FnOnce(&TempDir)>(f: F) {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = TempDir::new().unwrap();
    std::env::set_var("PULSEDECK_HOME", dir.path());
    f(&dir);
    std::env::remove_var("PULSEDECK_HOME");
}

fn identity() -> UserProfile {
    UserProfile {
        id: "u-42".into(),
        email: "ops@example.com".into(),
        name: Some("Ops".into()),
        created_at: None,
    }
}

#[test]
fn test_login_persists_across_loads() {
    with_temp_home(|dir| {
        let mut session = Session::load();
        assert!(!session.is_authenticated());

        session.login("tok-123", identity()).unwrap();
        assert!(dir.path().join("session.json").exists());

        let reloaded = Session::load();
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.token(), Some("tok-123"));
        assert_eq!(reloaded.identity.unwrap().email, "ops@example.com");
    });
}

#[test]
fn test_logout_removes_file() {
    with_temp_home(|dir| {
        let mut session = Session::load();
        session.login("tok-123", identity()).unwrap();
        assert!(dir.path().join("session.json").exists());

        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert!(session.identity.is_none());
        assert!(!dir.path().join("session.json").exists());

        let reloaded = Session::load();
        assert!(!reloaded.is_authenticated());
    });
}

#[test]
fn test_corrupt_file_treated_as_logged_out() {
    with_temp_home(|dir| {
        std::fs::write(dir.path().join("session.json"), "not json {").unwrap();
        let session = Session::load();
        assert!(!session.is_authenticated());
    });
}

#[cfg(unix)]
#[test]
fn test_session_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    with_temp_home(|dir| {
        let mut session = Session::load();
        session.login("tok-123", identity()).unwrap();

        let meta = std::fs::metadata(dir.path().join("session.json")).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    });
}
