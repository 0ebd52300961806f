//! Helpers for tests that touch process-wide environment variables.

use std::ffi::{OsStr, OsString};
use std::sync::{Mutex, MutexGuard, PoisonError};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serialize tests that read or write environment variables.
pub fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sets or removes env vars and restores their previous values on drop.
///
/// Hold [`lock_env`] for at least as long as the `ScopedEnv`.
#[derive(Default)]
pub struct ScopedEnv {
    saved: Vec<(OsString, Option<OsString>)>,
}

impl ScopedEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl AsRef<OsStr>) -> Self {
        self.save(key);
        unsafe { std::env::set_var(key, value) };
        self
    }

    pub fn remove(mut self, key: &str) -> Self {
        self.save(key);
        unsafe { std::env::remove_var(key) };
        self
    }

    fn save(&mut self, key: &str) {
        self.saved.push((OsString::from(key), std::env::var_os(key)));
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, value) in self.saved.drain(..).rev() {
            match value {
                Some(v) => unsafe { std::env::set_var(&key, v) },
                None => unsafe { std::env::remove_var(&key) },
            }
        }
    }
}
