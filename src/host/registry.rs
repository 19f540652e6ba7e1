//! Cross-instance open-file registry
//!
//! Shared between running instances through a directory (normally
//! `~/.config/mdview/registry/`):
//! - `open-files.json` lists which process shows which file
//! - `activate-<pid>-<stamp>.json` asks process `<pid>` to come forward
//!
//! Entries whose owner is no longer running are pruned on every write.
//! Writers serialize on `open-files.lock`, created exclusively and removed
//! when the edit is saved.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sysinfo::{Pid, PidExt, System, SystemExt};

use super::HostError;

const REGISTRY_FILE: &str = "open-files.json";
const ACTIVATION_PREFIX: &str = "activate-";
const LOCK_FILE: &str = "open-files.lock";

const LOCK_RETRY: Duration = Duration::from_millis(10);
const LOCK_ATTEMPTS: u32 = 200;
/// A lock older than this was left by a writer that died mid-edit
const LOCK_STALE_AFTER: Duration = Duration::from_secs(5);

/// Advisory lock held for one load-edit-save of the registry file
#[derive(Debug)]
struct RegistryLock {
    path: PathBuf,
}

impl RegistryLock {
    fn acquire(dir: &Path, pid: u32) -> Result<Self, HostError> {
        let path = dir.join(LOCK_FILE);
        for _ in 0..LOCK_ATTEMPTS {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    let _ = write!(file, "{}", pid);
                    return Ok(Self { path });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if lock_is_stale(&path) {
                        tracing::warn!("Breaking stale registry lock {}", path.display());
                        let _ = fs::remove_file(&path);
                        continue;
                    }
                    thread::sleep(LOCK_RETRY);
                }
                Err(e) => {
                    return Err(HostError::Registry(format!(
                        "Failed to lock {}: {}",
                        path.display(),
                        e
                    )))
                }
            }
        }
        Err(HostError::Registry(format!(
            "Timed out waiting for {}",
            path.display()
        )))
    }
}

impl Drop for RegistryLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!("Failed to remove {}: {}", self.path.display(), e);
        }
    }
}

fn lock_is_stale(path: &Path) -> bool {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|modified| modified.elapsed().ok())
        .is_some_and(|age| age > LOCK_STALE_AFTER)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct RegistryEntry {
    /// Canonicalized path
    path: String,
    pid: u32,
    /// Seconds since the Unix epoch
    registered_at: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    entries: Vec<RegistryEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ActivationRequest {
    path: String,
    from_pid: u32,
}

type LivenessCheck = Box<dyn Fn(u32) -> bool + Send + Sync>;

pub struct OpenRegistry {
    dir: PathBuf,
    pid: u32,
    is_alive: LivenessCheck,
}

impl std::fmt::Debug for OpenRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRegistry")
            .field("dir", &self.dir)
            .field("pid", &self.pid)
            .finish()
    }
}

fn process_is_running(pid: u32) -> bool {
    let mut system = System::new();
    system.refresh_process(Pid::from_u32(pid))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Registry key for a path: canonical when the file exists, verbatim otherwise
pub fn canonical_key(path: &str) -> String {
    fs::canonicalize(path)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl OpenRegistry {
    /// Registry for this process in `dir`, checking owners with sysinfo
    pub fn new(dir: PathBuf) -> Result<Self, HostError> {
        Self::with_liveness(dir, std::process::id(), Box::new(process_is_running))
    }

    /// Registry acting as process `pid` with a custom liveness check
    pub fn with_liveness(dir: PathBuf, pid: u32, is_alive: LivenessCheck) -> Result<Self, HostError> {
        fs::create_dir_all(&dir).map_err(|e| {
            HostError::Registry(format!("Failed to create {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir, pid, is_alive })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    fn registry_path(&self) -> PathBuf {
        self.dir.join(REGISTRY_FILE)
    }

    fn load(&self) -> RegistryFile {
        let path = self.registry_path();
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Discarding corrupt registry {}: {}", path.display(), e);
                RegistryFile::default()
            }),
            Err(_) => RegistryFile::default(),
        }
    }

    /// Write through a temp file in the same directory, then rename
    fn save(&self, registry: &RegistryFile) -> Result<(), HostError> {
        let json = serde_json::to_string_pretty(registry)
            .map_err(|e| HostError::Registry(format!("Failed to serialize registry: {}", e)))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)
            .map_err(|e| HostError::Registry(format!("Failed to create temp file: {}", e)))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| HostError::Registry(format!("Failed to write registry: {}", e)))?;
        tmp.persist(self.registry_path())
            .map_err(|e| HostError::Registry(format!("Failed to replace registry: {}", e)))?;
        Ok(())
    }

    fn lock(&self) -> Result<RegistryLock, HostError> {
        RegistryLock::acquire(&self.dir, self.pid)
    }

    fn prune(&self, registry: &mut RegistryFile) {
        let before = registry.entries.len();
        registry
            .entries
            .retain(|entry| entry.pid == self.pid || (self.is_alive)(entry.pid));
        let pruned = before - registry.entries.len();
        if pruned > 0 {
            tracing::debug!("Pruned {} stale registry entries", pruned);
        }
    }

    /// The live process, other than this one, that has `path` open
    pub fn owner_of(&self, path: &str) -> Option<u32> {
        let key = canonical_key(path);
        self.load()
            .entries
            .iter()
            .filter(|entry| entry.path == key && entry.pid != self.pid)
            .map(|entry| entry.pid)
            .find(|pid| (self.is_alive)(*pid))
    }

    pub fn is_open_elsewhere(&self, path: &str) -> bool {
        self.owner_of(path).is_some()
    }

    pub fn register(&self, path: &str) -> Result<(), HostError> {
        let key = canonical_key(path);
        let _lock = self.lock()?;
        let mut registry = self.load();
        self.prune(&mut registry);
        registry
            .entries
            .retain(|entry| !(entry.path == key && entry.pid == self.pid));
        registry.entries.push(RegistryEntry {
            path: key.clone(),
            pid: self.pid,
            registered_at: now_secs(),
        });
        self.save(&registry)?;
        tracing::debug!("Registered {} for pid {}", key, self.pid);
        Ok(())
    }

    pub fn unregister(&self, path: &str) -> Result<(), HostError> {
        let key = canonical_key(path);
        let _lock = self.lock()?;
        let mut registry = self.load();
        self.prune(&mut registry);
        registry
            .entries
            .retain(|entry| !(entry.path == key && entry.pid == self.pid));
        self.save(&registry)
    }

    /// Drop every entry owned by this process
    pub fn release_all(&self) -> Result<(), HostError> {
        let _lock = self.lock()?;
        let mut registry = self.load();
        let before = registry.entries.len();
        registry.entries.retain(|entry| entry.pid != self.pid);
        if registry.entries.len() == before {
            return Ok(());
        }
        self.save(&registry)
    }

    /// Ask the owner of `path` to bring its view forward
    pub fn request_activation(&self, path: &str) -> Result<(), HostError> {
        let owner = self
            .owner_of(path)
            .ok_or_else(|| HostError::Registry(format!("No running instance has {} open", path)))?;

        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let request = ActivationRequest {
            path: canonical_key(path),
            from_pid: self.pid,
        };
        let json = serde_json::to_string(&request)
            .map_err(|e| HostError::Registry(format!("Failed to serialize request: {}", e)))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)
            .map_err(|e| HostError::Registry(format!("Failed to create temp file: {}", e)))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| HostError::Registry(format!("Failed to write request: {}", e)))?;
        let target = self
            .dir
            .join(format!("{}{}-{}.json", ACTIVATION_PREFIX, owner, stamp));
        tmp.persist(&target)
            .map_err(|e| HostError::Registry(format!("Failed to place request: {}", e)))?;

        tracing::info!("Asked pid {} to activate {}", owner, path);
        Ok(())
    }

    /// Consume activation requests addressed to this process
    pub fn take_activation_requests(&self) -> Vec<String> {
        let prefix = format!("{}{}-", ACTIVATION_PREFIX, self.pid);
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        let mut paths = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !name.starts_with(&prefix) || !name.ends_with(".json") {
                continue;
            }
            let file = entry.path();
            match fs::read_to_string(&file)
                .ok()
                .and_then(|content| serde_json::from_str::<ActivationRequest>(&content).ok())
            {
                Some(request) => {
                    tracing::debug!("Activation request from pid {}", request.from_pid);
                    paths.push(request.path);
                }
                None => tracing::warn!("Ignoring unreadable activation request {}", file.display()),
            }
            if let Err(e) = fs::remove_file(&file) {
                tracing::warn!("Failed to remove {}: {}", file.display(), e);
            }
        }
        paths
    }
}
