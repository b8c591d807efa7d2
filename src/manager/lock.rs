use crate::config::Paths;
use crate::error::{ArsenalError, Result};
use fs_err::{self as fs, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

const MAX_ATTEMPTS: u32 = 50;
const RETRY_DELAY: Duration = Duration::from_millis(100);
const STALE_AFTER: Duration = Duration::from_secs(600);
const HEARTBEAT: Duration = Duration::from_secs(60);

/// Advisory per-tool lock held while install/use/uninstall mutate state.
///
/// The file records an owner token. While held, a heartbeat thread keeps its
/// mtime fresh so a long download never looks stale to other processes. On
/// drop the file is removed only if it still carries our token.
pub struct ToolLock {
    path: PathBuf,
    token: String,
    heartbeat: Option<(Sender<()>, JoinHandle<()>)>,
}

impl Drop for ToolLock {
    fn drop(&mut self) {
        if let Some((stop, handle)) = self.heartbeat.take() {
            let _ = stop.send(());
            let _ = handle.join();
        }
        match fs::read_to_string(&self.path) {
            Ok(owner) if owner == self.token => {
                let _ = fs::remove_file(&self.path);
            }
            Ok(_) => warn!("{} was taken over, leaving it in place", self.path.display()),
            Err(_) => {}
        }
    }
}

impl ToolLock {
    pub fn acquire(paths: &Paths, tool: &str) -> Result<Self> {
        Self::acquire_at(paths.tool_lock_path(tool), MAX_ATTEMPTS, HEARTBEAT)
    }

    fn acquire_at(path: PathBuf, attempts: u32, heartbeat: Duration) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let token = owner_token();
        for attempt in 0..attempts {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    if let Err(e) = file.write_all(token.as_bytes()) {
                        let _ = fs::remove_file(&path);
                        return Err(ArsenalError::LockFailed {
                            path,
                            reason: e.to_string(),
                        });
                    }
                    debug!("acquired {}", path.display());
                    let heartbeat = Some(spawn_heartbeat(path.clone(), heartbeat));
                    return Ok(Self {
                        path,
                        token,
                        heartbeat,
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if is_stale(&path) {
                        warn!("removing stale lock {}", path.display());
                        let _ = fs::remove_file(&path);
                        continue;
                    }
                    if attempt + 1 < attempts {
                        thread::sleep(RETRY_DELAY);
                    }
                }
                Err(e) => {
                    return Err(ArsenalError::LockFailed {
                        path,
                        reason: e.to_string(),
                    })
                }
            }
        }
        Err(ArsenalError::LockFailed {
            path,
            reason: "held by another arsenal process".into(),
        })
    }
}

fn owner_token() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{}:{nanos}", std::process::id())
}

fn spawn_heartbeat(path: PathBuf, every: Duration) -> (Sender<()>, JoinHandle<()>) {
    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    let handle = thread::spawn(move || loop {
        match stop_rx.recv_timeout(every) {
            Err(RecvTimeoutError::Timeout) => touch(&path),
            _ => break,
        }
    });
    (stop_tx, handle)
}

fn touch(path: &Path) {
    let res = std::fs::OpenOptions::new()
        .write(true)
        .open(path)
        .and_then(|f| f.set_modified(SystemTime::now()));
    if let Err(e) = res {
        debug!("refreshing {} failed: {e}", path.display());
    }
}

fn is_stale(path: &Path) -> bool {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|modified| SystemTime::now().duration_since(modified).ok())
        .is_some_and(|age| age > STALE_AFTER)
}
