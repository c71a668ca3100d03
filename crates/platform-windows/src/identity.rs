//! Machine and user name from the process environment.

use snapshot::HostIdentity;

/// Environment-backed identity. The variables are set by the OS for
/// every interactive session, so absence is unexpected but still
/// degrades to the sentinel instead of failing the gather.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvHostIdentity;

impl HostIdentity for EnvHostIdentity {
    fn computer_name(&self) -> Option<String> {
        env_non_empty("COMPUTERNAME").or_else(|| env_non_empty("HOSTNAME"))
    }

    fn user_name(&self) -> Option<String> {
        env_non_empty("USERNAME").or_else(|| env_non_empty("USER"))
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    #[test]
    fn prefers_windows_variable_over_posix_fallback() {
        let _guard = env_lock().lock().expect("env lock");
        std::env::set_var("COMPUTERNAME", "WS-01");
        std::env::set_var("HOSTNAME", "ignored");
        assert_eq!(EnvHostIdentity.computer_name().as_deref(), Some("WS-01"));
        std::env::remove_var("COMPUTERNAME");
        std::env::remove_var("HOSTNAME");
    }

    #[test]
    fn blank_variables_count_as_absent() {
        let _guard = env_lock().lock().expect("env lock");
        std::env::set_var("USERNAME", "   ");
        std::env::remove_var("USER");
        assert_eq!(EnvHostIdentity.user_name(), None);
        std::env::remove_var("USERNAME");
    }
}
