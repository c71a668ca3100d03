//! Overlay event policy.
//!
//! Maps the OS-level events the overlay window receives to the
//! actions the platform layer executes. The split keeps the one rule
//! that matters testable: display, session and power events reposition
//! the window but never re-gather telemetry.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayEvent {
    /// Periodic refresh tick (and the initial load at construction).
    RefreshTick,
    DisplayChanged,
    SessionUnlocked,
    ResumedFromSuspend,
    /// The OS tried to activate or raise the window.
    ActivationAttempt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayAction {
    /// Produce a fresh snapshot and re-render the text fields.
    GatherAndRender,
    /// Recompute the placement from the current work area and move.
    Reposition,
    /// Push the window to the bottom of the z-order.
    PinToBottom,
}

/// Actions for one event, in execution order.
pub fn actions_for(event: OverlayEvent) -> &'static [OverlayAction] {
    match event {
        OverlayEvent::RefreshTick => &[OverlayAction::GatherAndRender, OverlayAction::PinToBottom],
        OverlayEvent::DisplayChanged
        | OverlayEvent::SessionUnlocked
        | OverlayEvent::ResumedFromSuspend => {
            &[OverlayAction::Reposition, OverlayAction::PinToBottom]
        }
        OverlayEvent::ActivationAttempt => &[OverlayAction::PinToBottom],
    }
}
