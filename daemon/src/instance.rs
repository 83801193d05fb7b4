use std::fs;
use std::path::{Path, PathBuf};

use sysinfo::{Pid, ProcessesToUpdate, System};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("another instance is already running (pid {0})")]
    AlreadyRunning(u32),
    #[error("failed to write pid file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Single-instance guard backed by a pid file.
///
/// Two daemons polling the same display would fight over its settings, so
/// startup claims a pid file and refuses to proceed while the recorded pid
/// belongs to a live process. A stale or unparsable file (crashed previous
/// run) is reclaimed. The file is removed when the lock is dropped.
pub struct InstanceLock {
    path: PathBuf,
}

impl InstanceLock {
    pub fn acquire(path: &Path) -> Result<Self, InstanceError> {
        if let Ok(content) = fs::read_to_string(path) {
            if let Ok(pid) = content.trim().parse::<u32>() {
                if is_alive(pid) {
                    return Err(InstanceError::AlreadyRunning(pid));
                }
            }
        }
        fs::write(path, std::process::id().to_string()).map_err(|source| InstanceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn is_alive(pid: u32) -> bool {
    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]), false);
    sys.process(Pid::from_u32(pid)).is_some()
}
