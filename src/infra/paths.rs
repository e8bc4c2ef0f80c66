// src/infra/paths.rs — Config and cache path management
//
// All paths respect the PULSEDECK_HOME environment variable for isolation
// (tests set it to a tempdir). When unset, config lives under ~/.pulsedeck/
// and cached query state under the platform cache dir.

use directories::ProjectDirs;
use std::path::PathBuf;
use std::sync::OnceLock;

static PROJECT_DIRS: OnceLock<ProjectDirs> = OnceLock::new();

fn project_dirs() -> &'static ProjectDirs {
    PROJECT_DIRS.get_or_init(|| {
        ProjectDirs::from("", "", "pulsedeck").expect("Could not determine home directory")
    })
}

/// Returns the PULSEDECK_HOME override, if set.
fn pulsedeck_home() -> Option<PathBuf> {
    std::env::var_os("PULSEDECK_HOME").map(PathBuf::from)
}

/// Configuration directory: $PULSEDECK_HOME/ or ~/.pulsedeck/
pub fn config_dir() -> PathBuf {
    if let Some(home) = pulsedeck_home() {
        return home;
    }
    directories::BaseDirs::new()
        .expect("Could not determine home directory")
        .home_dir()
        .join(".pulsedeck")
}

/// Cache directory: $PULSEDECK_HOME/cache/ or the platform cache dir.
pub fn cache_dir() -> PathBuf {
    if let Some(home) = pulsedeck_home() {
        return home.join("cache");
    }
    project_dirs().cache_dir().to_path_buf()
}

/// config.toml path
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Persisted session (credential + identity)
pub fn session_file() -> PathBuf {
    config_dir().join("session.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_file_under_config_dir() {
        let session = session_file();
        assert!(session.starts_with(config_dir()));
        assert_eq!(session.file_name().unwrap(), "session.json");
    }
}
