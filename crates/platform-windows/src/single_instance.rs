//! Cross-process single-instance guard.
//!
//! A globally-named mutex is the sole arbiter of "only one widget may
//! run". The first acquirer holds it for the process lifetime; a
//! second process must exit before doing any other startup work. An
//! abandoned mutex (previous holder crashed) is granted to the next
//! acquirer so a crash can never permanently block future launches.
//! Any other failure reports "could not guarantee single instance",
//! failing safe toward not running.

use tracing::warn;

#[cfg(target_os = "windows")]
use windows::core::PCWSTR;
#[cfg(target_os = "windows")]
use windows::Win32::Foundation::{
    CloseHandle, GetLastError, ERROR_ALREADY_EXISTS, HANDLE, WAIT_ABANDONED, WAIT_OBJECT_0,
};
#[cfg(target_os = "windows")]
use windows::Win32::System::Threading::{CreateMutexW, ReleaseMutex, WaitForSingleObject};

/// Fixed global mutex name shared by every build of the widget.
pub const INSTANCE_MUTEX_NAME: &str =
    r"Global\deskinfo-widget-b4c7f2e1-8a9d-4f3b-9c2e-1a2b3c4d5e6f";

/// Holds the named mutex for the process lifetime; released exactly
/// once when dropped on normal exit.
#[derive(Debug)]
pub struct SingleInstanceGuard {
    #[cfg(target_os = "windows")]
    handle: HANDLE,
}

impl SingleInstanceGuard {
    /// `Some` when this process now owns the named mutex, `None` when
    /// another live instance holds it or ownership could not be
    /// established.
    pub fn acquire(name: &str) -> Option<Self> {
        #[cfg(target_os = "windows")]
        {
            let wide: Vec<u16> = name.encode_utf16().chain(std::iter::once(0)).collect();
            let handle = match unsafe { CreateMutexW(None, true, PCWSTR(wide.as_ptr())) } {
                Ok(handle) => handle,
                Err(err) => {
                    warn!(error = %err, "could not create the single-instance mutex");
                    return None;
                }
            };

            if unsafe { GetLastError() } != ERROR_ALREADY_EXISTS {
                return Some(Self { handle });
            }

            // The mutex pre-existed, so the create did not grant
            // ownership. A zero-timeout wait distinguishes a live
            // holder from an abandoned mutex, which is conventionally
            // granted to the next acquirer.
            match unsafe { WaitForSingleObject(handle, 0) } {
                event if event == WAIT_OBJECT_0 || event == WAIT_ABANDONED => {
                    Some(Self { handle })
                }
                _ => {
                    if let Err(err) = unsafe { CloseHandle(handle) } {
                        warn!(error = %err, "failed closing unowned mutex handle");
                    }
                    None
                }
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            warn!(name, "single-instance guard is a stub on non-Windows");
            Some(Self {})
        }
    }
}

impl Drop for SingleInstanceGuard {
    fn drop(&mut self) {
        #[cfg(target_os = "windows")]
        unsafe {
            if let Err(err) = ReleaseMutex(self.handle) {
                warn!(error = %err, "failed releasing the single-instance mutex");
            }
            if let Err(err) = CloseHandle(self.handle) {
                warn!(error = %err, "failed closing the single-instance mutex handle");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutex_name_is_global_and_stable() {
        assert!(INSTANCE_MUTEX_NAME.starts_with(r"Global\"));
        assert!(!INSTANCE_MUTEX_NAME.contains(' '));
    }

    // The live/abandoned cross-process cases need two real Windows
    // processes and are exercised manually; in-process we can at
    // least assert the same-process re-acquire behavior on Windows.
    #[cfg(target_os = "windows")]
    #[test]
    fn first_acquire_in_a_process_succeeds() {
        let name = format!(r"Local\deskinfo-widget-test-{}", std::process::id());
        let guard = SingleInstanceGuard::acquire(&name);
        assert!(guard.is_some());
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn stub_acquire_is_permissive_off_windows() {
        assert!(SingleInstanceGuard::acquire(INSTANCE_MUTEX_NAME).is_some());
    }
}
