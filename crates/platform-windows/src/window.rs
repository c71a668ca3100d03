//! Native window control: overlay styles, z-order, geometry.
//!
//! All operations are direct synchronous Win32 calls; failures are
//! logged and swallowed so the overlay keeps running in a degraded
//! visual state instead of crashing.

#[cfg(target_os = "windows")]
use anyhow::{Context, Result};
#[cfg(target_os = "windows")]
use tracing::warn;

#[cfg(target_os = "windows")]
use windows::Win32::Foundation::{HWND, RECT};
#[cfg(target_os = "windows")]
use windows::Win32::UI::WindowsAndMessaging::{
    GetWindowLongPtrW, SetWindowLongPtrW, SetWindowPos, SystemParametersInfoW, GWL_EXSTYLE,
    HWND_BOTTOM, SPI_GETWORKAREA, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER,
    SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_EX_TRANSPARENT,
};

#[cfg(target_os = "windows")]
use snapshot::{Point, Rect, Size};

/// OR the overlay style bits into the window's extended style:
/// non-activating, excluded from the task switcher, click-through.
/// Idempotent; applying twice yields the same style set.
#[cfg(target_os = "windows")]
pub fn apply_overlay_styles(hwnd: HWND) {
    let overlay_bits =
        (WS_EX_NOACTIVATE.0 | WS_EX_TOOLWINDOW.0 | WS_EX_TRANSPARENT.0) as isize;
    unsafe {
        let current = GetWindowLongPtrW(hwnd, GWL_EXSTYLE);
        if SetWindowLongPtrW(hwnd, GWL_EXSTYLE, current | overlay_bits) == 0 && current == 0 {
            warn!("failed applying overlay window styles");
        }
    }
}

/// Push the window to the bottom of the z-order without moving,
/// resizing or activating it. Safe to call repeatedly, including from
/// inside activation handling.
#[cfg(target_os = "windows")]
pub fn pin_to_bottom(hwnd: HWND) {
    let result = unsafe {
        SetWindowPos(
            hwnd,
            HWND_BOTTOM,
            0,
            0,
            0,
            0,
            SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
        )
    };
    if let Err(err) = result {
        warn!(error = %err, "failed pinning window to bottom of z-order");
    }
}

/// Move the window's top-left corner without resizing, activating or
/// disturbing the z-order.
#[cfg(target_os = "windows")]
pub fn move_to(hwnd: HWND, position: Point) {
    let result = unsafe {
        SetWindowPos(
            hwnd,
            HWND_BOTTOM,
            position.x,
            position.y,
            0,
            0,
            SWP_NOSIZE | SWP_NOACTIVATE | SWP_NOZORDER,
        )
    };
    if let Err(err) = result {
        warn!(error = %err, x = position.x, y = position.y, "failed moving window");
    }
}

/// Current work area: the primary display minus reserved system UI
/// such as the task bar.
#[cfg(target_os = "windows")]
pub fn work_area() -> Result<Rect> {
    let mut rect = RECT::default();
    unsafe {
        SystemParametersInfoW(
            SPI_GETWORKAREA,
            0,
            Some(&mut rect as *mut RECT as *mut _),
            SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS(0),
        )
        .context("SPI_GETWORKAREA failed")?;
    }
    Ok(Rect {
        left: rect.left,
        top: rect.top,
        right: rect.right,
        bottom: rect.bottom,
    })
}

/// Reposition into the top-right corner of the current work area.
#[cfg(target_os = "windows")]
pub fn reposition(hwnd: HWND, window: Size, margin: i32) {
    match work_area() {
        Ok(area) => {
            let position = snapshot::compute_position(area, window, margin);
            move_to(hwnd, position);
        }
        Err(err) => warn!(error = %err, "failed reading work area; keeping current position"),
    }
}
