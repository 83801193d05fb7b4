use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use crate::state::Mode;

/// Runtime status written by the daemon to status.toml in the app data
/// directory. External UIs (tray icon, settings editor) read this file
/// read-only to show what the daemon is doing.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DaemonStatus {
    /// Daemon binary version (set from Cargo.toml at compile time).
    pub version: String,
    /// Current display profile mode.
    pub mode: Mode,
    /// Watch-list entry that triggered Game mode, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_process: Option<String>,
    /// RFC 3339 timestamp of the most recent mode transition, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition: Option<String>,
    /// Human-readable message for the most recent non-fatal error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DaemonStatus {
    /// Constructs the initial status on daemon startup: Desktop-assumed.
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            mode: Mode::Desktop,
            active_process: None,
            last_transition: None,
            error: None,
        }
    }
}

impl Default for DaemonStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializes `status` to TOML and writes it to `path`.
/// Creates the parent directory if it does not exist.
/// Failures are logged rather than propagated — a status write failure
/// should never crash the daemon.
pub fn write_status(path: &Path, status: &DaemonStatus) {
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            warn!("failed to create directory {}: {e}", parent.display());
            return;
        }
    }
    match toml::to_string_pretty(status) {
        Ok(content) => {
            if let Err(e) = std::fs::write(path, content) {
                warn!("failed to write status file: {e}");
            }
        }
        Err(e) => warn!("failed to serialize status: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── DaemonStatus::new ─────────────────────────────────────────────────────

    #[test]
    fn new_starts_in_desktop_mode() {
        let s = DaemonStatus::new();
        assert_eq!(s.mode, Mode::Desktop);
    }

    #[test]
    fn new_has_no_optional_fields() {
        let s = DaemonStatus::new();
        assert!(s.active_process.is_none());
        assert!(s.last_transition.is_none());
        assert!(s.error.is_none());
    }

    #[test]
    fn new_version_matches_cargo_pkg() {
        let s = DaemonStatus::new();
        assert_eq!(s.version, env!("CARGO_PKG_VERSION"));
    }

    // ── Mode serialization ────────────────────────────────────────────────────

    #[test]
    fn mode_serializes_to_lowercase() {
        let mut s = DaemonStatus::new();
        let desktop = toml::to_string_pretty(&s).unwrap();
        assert!(desktop.contains("mode = \"desktop\""));

        s.mode = Mode::Game;
        let game = toml::to_string_pretty(&s).unwrap();
        assert!(game.contains("mode = \"game\""));
    }

    #[test]
    fn status_round_trips_through_toml() {
        for mode in [Mode::Desktop, Mode::Game] {
            let mut status = DaemonStatus::new();
            status.mode = mode;
            let serialized = toml::to_string_pretty(&status).unwrap();
            let deserialized: DaemonStatus = toml::from_str(&serialized).unwrap();
            assert_eq!(deserialized.mode, mode);
        }
    }

    // ── write_status ──────────────────────────────────────────────────────────

    #[test]
    fn write_status_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.toml");
        write_status(&path, &DaemonStatus::new());
        assert!(path.exists());
    }

    #[test]
    fn write_status_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("status.toml");
        write_status(&path, &DaemonStatus::new());
        assert!(path.exists());
    }

    #[test]
    fn write_status_content_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.toml");

        let mut original = DaemonStatus::new();
        original.mode = Mode::Game;
        original.active_process = Some("EscapeFromTarkov.exe".to_string());

        write_status(&path, &original);

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: DaemonStatus = toml::from_str(&content).unwrap();

        assert_eq!(parsed.mode, Mode::Game);
        assert_eq!(parsed.active_process.as_deref(), Some("EscapeFromTarkov.exe"));
    }

    #[test]
    fn write_status_omits_none_optional_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.toml");
        write_status(&path, &DaemonStatus::new());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("active_process"));
        assert!(!content.contains("last_transition"));
        assert!(!content.contains("error"));
    }

    #[test]
    fn write_status_includes_populated_optional_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.toml");

        let mut status = DaemonStatus::new();
        status.active_process = Some("game.exe".to_string());
        status.last_transition = Some("2026-01-01T00:00:00+00:00".to_string());
        status.error = Some("no DDC/CI-capable display responded".to_string());

        write_status(&path, &status);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("active_process"));
        assert!(content.contains("last_transition"));
        assert!(content.contains("error"));
    }
}
