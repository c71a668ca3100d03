//! Display, session and power notification subscriptions.
//!
//! WM_DISPLAYCHANGE is broadcast to every top-level window and needs
//! no registration; session unlock and resume-from-suspend must be
//! subscribed explicitly. All registrations are acquired when the
//! window is constructed and released unconditionally at teardown —
//! a failed channel never short-circuits the others.

#[cfg(target_os = "windows")]
use tracing::warn;

#[cfg(target_os = "windows")]
use windows::Win32::Foundation::{HANDLE, HWND};
#[cfg(target_os = "windows")]
use windows::Win32::System::Power::{
    RegisterSuspendResumeNotification, UnregisterSuspendResumeNotification, HPOWERNOTIFY,
};
#[cfg(target_os = "windows")]
use windows::Win32::System::RemoteDesktop::{
    WTSRegisterSessionNotification, WTSUnRegisterSessionNotification, NOTIFY_FOR_THIS_SESSION,
};
#[cfg(target_os = "windows")]
use windows::Win32::UI::WindowsAndMessaging::DEVICE_NOTIFY_WINDOW_HANDLE;

#[cfg(target_os = "windows")]
#[derive(Debug, Default)]
pub struct SessionSubscriptions {
    session_registered: bool,
    power_notify: Option<HPOWERNOTIFY>,
}

#[cfg(target_os = "windows")]
impl SessionSubscriptions {
    /// Register every channel, logging failures without aborting the
    /// remaining registrations.
    pub fn register(hwnd: HWND) -> Self {
        let mut subscriptions = Self::default();

        match unsafe { WTSRegisterSessionNotification(hwnd, NOTIFY_FOR_THIS_SESSION) } {
            Ok(()) => subscriptions.session_registered = true,
            Err(err) => warn!(error = %err, "failed registering session notifications"),
        }

        match unsafe {
            RegisterSuspendResumeNotification(HANDLE(hwnd.0), DEVICE_NOTIFY_WINDOW_HANDLE)
        } {
            Ok(handle) => subscriptions.power_notify = Some(handle),
            Err(err) => warn!(error = %err, "failed registering suspend/resume notifications"),
        }

        subscriptions
    }

    /// Release every channel unconditionally; a failure on one is
    /// logged and the next is still attempted.
    pub fn release(&mut self, hwnd: HWND) {
        if self.session_registered {
            self.session_registered = false;
            if let Err(err) = unsafe { WTSUnRegisterSessionNotification(hwnd) } {
                warn!(error = %err, "failed unregistering session notifications");
            }
        }
        if let Some(handle) = self.power_notify.take() {
            if let Err(err) = unsafe { UnregisterSuspendResumeNotification(handle) } {
                warn!(error = %err, "failed unregistering suspend/resume notifications");
            }
        }
    }
}
