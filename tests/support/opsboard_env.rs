use std::sync::{Mutex, MutexGuard, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Serializes environment mutation across tests and restores the previous
/// values on drop.
pub struct OpsboardEnvGuard {
    previous: Vec<(&'static str, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl OpsboardEnvGuard {
    pub fn new() -> Self {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        Self {
            previous: Vec::new(),
            _lock: lock,
        }
    }

    pub fn set(mut self, key: &'static str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.remember(key);
        // SAFETY: tests run under a global lock to prevent concurrent env mutations.
        unsafe {
            std::env::set_var(key, value);
        }
        self
    }

    pub fn unset(mut self, key: &'static str) -> Self {
        self.remember(key);
        // SAFETY: tests run under a global lock to prevent concurrent env mutations.
        unsafe {
            std::env::remove_var(key);
        }
        self
    }

    fn remember(&mut self, key: &'static str) {
        if self.previous.iter().all(|(existing, _)| *existing != key) {
            self.previous.push((key, std::env::var(key).ok()));
        }
    }
}

impl Drop for OpsboardEnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            // SAFETY: tests run under a global lock to prevent concurrent env mutations.
            unsafe {
                match value {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}
