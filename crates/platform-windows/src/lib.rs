//! Windows variants of the widget's platform capabilities.
//!
//! Telemetry probes query WMI through PowerShell CIM cmdlets with
//! JSON output; the parse helpers stay platform-independent so they
//! are unit-tested everywhere. The overlay window, z-order control,
//! session/power subscriptions and the named-mutex single-instance
//! guard talk to Win32 directly and compile to logging stubs on other
//! platforms.

pub mod identity;
pub mod network;
pub mod overlay;
pub mod session;
pub mod single_instance;
pub mod system;
pub mod window;
mod windows_cmd;

pub use identity::EnvHostIdentity;
pub use network::WindowsNetworkProbe;
pub use overlay::{run_overlay, OverlayOptions};
pub use single_instance::{SingleInstanceGuard, INSTANCE_MUTEX_NAME};
pub use system::WindowsSystemProbe;

pub fn platform_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "windows"
    } else {
        "unsupported"
    }
}
