/// Canonical file paths for the swapper's data files.
///
/// All three live under the per-user config directory (e.g.
/// %APPDATA%\monitor-swapper\ on Windows, ~/.config/monitor-swapper/ on Linux):
///   - config.toml        Written by the user or an external editor, read once at startup.
///   - status.toml        Written by the daemon, read by external UIs.
///   - swapper-daemon.pid Single-instance guard.
use std::path::PathBuf;

const APP_DIR_NAME: &str = "monitor-swapper";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const STATUS_FILE_NAME: &str = "status.toml";
pub const PID_FILE_NAME: &str = "swapper-daemon.pid";

/// Returns the application data directory.
pub fn app_data_dir() -> PathBuf {
    let base = dirs::config_dir().expect("no per-user configuration directory on this platform");
    base.join(APP_DIR_NAME)
}

/// Returns the full path to the config file.
pub fn config_file_path() -> PathBuf {
    app_data_dir().join(CONFIG_FILE_NAME)
}

/// Returns the full path to the status file.
pub fn status_file_path() -> PathBuf {
    app_data_dir().join(STATUS_FILE_NAME)
}

/// Returns the full path to the pid file.
pub fn pid_file_path() -> PathBuf {
    app_data_dir().join(PID_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_ends_with_app_name() {
        let dir = app_data_dir();
        assert_eq!(dir.file_name().unwrap(), APP_DIR_NAME);
    }

    #[test]
    fn config_file_path_has_correct_name() {
        assert_eq!(config_file_path().file_name().unwrap(), CONFIG_FILE_NAME);
    }

    #[test]
    fn status_file_path_has_correct_name() {
        assert_eq!(status_file_path().file_name().unwrap(), STATUS_FILE_NAME);
    }

    #[test]
    fn pid_file_path_has_correct_name() {
        assert_eq!(pid_file_path().file_name().unwrap(), PID_FILE_NAME);
    }

    #[test]
    fn all_files_share_the_same_parent_dir() {
        assert_eq!(config_file_path().parent(), status_file_path().parent());
        assert_eq!(status_file_path().parent(), pid_file_path().parent());
    }
}
