//! Helpers shared by tests that touch process-wide state.

use std::sync::Mutex;

/// Serializes every test that reads or writes environment variables
pub static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Sets or removes environment variables and restores them on drop
pub struct EnvGuard {
    vars_to_restore: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub fn new() -> Self {
        Self {
            vars_to_restore: Vec::new(),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.vars_to_restore
            .push((key.to_string(), std::env::var(key).ok()));
        unsafe {
            std::env::set_var(key, value);
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.vars_to_restore
            .push((key.to_string(), std::env::var(key).ok()));
        unsafe {
            std::env::remove_var(key);
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // Reverse order so a key touched twice ends at its first saved value
        for (key, original_value) in self.vars_to_restore.iter().rev() {
            unsafe {
                match original_value {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}
