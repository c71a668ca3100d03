//! Wires the platform capabilities into the overlay and runs it.

use anyhow::Result;

use platform_windows::{
    run_overlay, EnvHostIdentity, OverlayOptions, WindowsNetworkProbe, WindowsSystemProbe,
};

pub struct WidgetRuntime {
    options: OverlayOptions,
}

impl WidgetRuntime {
    /// The overlay's cadence, geometry and margin are product
    /// behaviour, not configuration.
    pub fn new() -> Self {
        Self {
            options: OverlayOptions::default(),
        }
    }

    pub fn refresh_interval_secs(&self) -> u64 {
        self.options.refresh_interval.as_secs()
    }

    /// Blocks until the overlay window is destroyed.
    pub fn run(self) -> Result<()> {
        run_overlay(
            self.options,
            Box::new(WindowsSystemProbe::default()),
            Box::new(WindowsNetworkProbe::default()),
            Box::new(EnvHostIdentity::default()),
        )
    }
}

impl Default for WidgetRuntime {
    fn default() -> Self {
        Self::new()
    }
}
