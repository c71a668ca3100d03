//! The overlay window.
//!
//! Owns the current snapshot and its rendered lines, runs the message
//! pump, and drives the event policy: WM_TIMER refreshes, display/
//! session/power notifications reposition, activation attempts are
//! answered by re-asserting bottom z-order. Every message handler is
//! panic-isolated so a failure inside a callback is logged and
//! suppressed instead of unwinding across the FFI boundary.

use std::time::Duration;

use anyhow::Result;

use snapshot::{HostIdentity, NetworkProbe, Size, SystemProbe};

/// Fixed presentation parameters of the overlay.
#[derive(Debug, Clone)]
pub struct OverlayOptions {
    pub title: String,
    pub window_size: Size,
    pub margin: i32,
    pub refresh_interval: Duration,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            title: "deskinfo-widget".to_string(),
            window_size: Size {
                width: 340,
                height: 230,
            },
            margin: snapshot::placement::CORNER_MARGIN,
            refresh_interval: Duration::from_secs(30 * 60),
        }
    }
}

/// Create the overlay window and run its message loop until the
/// window is destroyed. Blocks the calling thread; everything the
/// window does afterwards happens on this thread.
#[cfg(target_os = "windows")]
pub fn run_overlay(
    options: OverlayOptions,
    system: Box<dyn SystemProbe>,
    network: Box<dyn NetworkProbe>,
    identity: Box<dyn HostIdentity>,
) -> Result<()> {
    imp::run(options, system, network, identity)
}

#[cfg(not(target_os = "windows"))]
pub fn run_overlay(
    _options: OverlayOptions,
    _system: Box<dyn SystemProbe>,
    _network: Box<dyn NetworkProbe>,
    _identity: Box<dyn HostIdentity>,
) -> Result<()> {
    tracing::warn!("overlay window is a stub on non-Windows");
    anyhow::bail!("the overlay window requires Windows")
}

#[cfg(target_os = "windows")]
mod imp {
    use std::cell::RefCell;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use anyhow::{bail, Context, Result};
    use tracing::{debug, error, info, warn};

    use windows::core::{w, PCWSTR};
    use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, LRESULT, RECT, WPARAM};
    use windows::Win32::Graphics::Gdi::{
        BeginPaint, CreateSolidBrush, DrawTextW, EndPaint, InvalidateRect, SetBkMode,
        SetTextColor, DT_END_ELLIPSIS, DT_LEFT, DT_NOPREFIX, DT_SINGLELINE, PAINTSTRUCT,
        TRANSPARENT,
    };
    use windows::Win32::System::LibraryLoader::GetModuleHandleW;
    use windows::Win32::System::Power::{PBT_APMRESUMEAUTOMATIC, PBT_APMRESUMESUSPEND};
    use windows::Win32::System::RemoteDesktop::{WM_WTSSESSION_CHANGE, WTS_SESSION_UNLOCK};
    use windows::Win32::UI::WindowsAndMessaging::{
        CreateWindowExW, DefWindowProcW, DispatchMessageW, GetMessageW, KillTimer, LoadCursorW,
        PostMessageW, PostQuitMessage, RegisterClassW, SetTimer, TranslateMessage, CS_HREDRAW,
        CS_VREDRAW, HWND_BOTTOM, IDC_ARROW, MSG, SWP_NOZORDER, WA_INACTIVE, WINDOWPOS,
        WM_ACTIVATE, WM_APP, WM_DESTROY, WM_DISPLAYCHANGE, WM_PAINT, WM_POWERBROADCAST, WM_TIMER,
        WM_WINDOWPOSCHANGING, WNDCLASSW, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_EX_TRANSPARENT,
        WS_POPUP, WS_VISIBLE,
    };

    use snapshot::{
        actions_for, gather, render_lines, OverlayAction, OverlayEvent, Rect, Size,
        SystemInfoSnapshot,
    };

    use crate::session::SessionSubscriptions;
    use crate::window;

    use super::OverlayOptions;

    const CLASS_NAME: PCWSTR = w!("DeskinfoOverlay");
    const REFRESH_TIMER_ID: usize = 1;
    /// Posted after a render so the pin runs behind any activation
    /// message already in the queue.
    const WM_APP_PIN_BOTTOM: u32 = WM_APP + 1;

    const BACKGROUND: COLORREF = COLORREF(0x0026_1607);
    const TEXT_COLOR: COLORREF = COLORREF(0x00F0_F0F0);
    const PADDING: i32 = 12;
    const LINE_HEIGHT: i32 = 20;

    struct OverlayState {
        system: Box<dyn SystemProbe>,
        network: Box<dyn NetworkProbe>,
        identity: Box<dyn HostIdentity>,
        window_size: Size,
        margin: i32,
        current: SystemInfoSnapshot,
        lines: Vec<String>,
        subscriptions: SessionSubscriptions,
    }

    thread_local! {
        // The pump and every callback run on this one thread; the
        // window state never crosses threads.
        static STATE: RefCell<Option<OverlayState>> = const { RefCell::new(None) };
    }

    pub fn run(
        options: OverlayOptions,
        system: Box<dyn SystemProbe>,
        network: Box<dyn NetworkProbe>,
        identity: Box<dyn HostIdentity>,
    ) -> Result<()> {
        let initial = SystemInfoSnapshot::default();
        let lines = render_lines(&initial);
        STATE.with(|cell| {
            *cell.borrow_mut() = Some(OverlayState {
                system,
                network,
                identity,
                window_size: options.window_size,
                margin: options.margin,
                current: initial,
                lines,
                subscriptions: SessionSubscriptions::default(),
            });
        });

        let hwnd = create_window(&options)?;

        STATE.with(|cell| {
            if let Some(state) = cell.borrow_mut().as_mut() {
                state.subscriptions = SessionSubscriptions::register(hwnd);
            }
        });

        // Initial load happens synchronously, before the first tick.
        handle_event(hwnd, OverlayEvent::RefreshTick);

        let interval_ms = options.refresh_interval.as_millis().min(u32::MAX as u128) as u32;
        if unsafe { SetTimer(hwnd, REFRESH_TIMER_ID, interval_ms, None) } == 0 {
            warn!("SetTimer failed; periodic refresh disabled");
        }

        info!(interval_secs = options.refresh_interval.as_secs(), "overlay running");

        let mut msg = MSG::default();
        unsafe {
            while GetMessageW(&mut msg, None, 0, 0).as_bool() {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }

        STATE.with(|cell| *cell.borrow_mut() = None);
        Ok(())
    }

    fn create_window(options: &OverlayOptions) -> Result<HWND> {
        unsafe {
            let instance = GetModuleHandleW(None).context("GetModuleHandleW failed")?;
            let class = WNDCLASSW {
                style: CS_HREDRAW | CS_VREDRAW,
                lpfnWndProc: Some(wndproc),
                hInstance: instance.into(),
                hCursor: LoadCursorW(None, IDC_ARROW).context("LoadCursorW failed")?,
                hbrBackground: CreateSolidBrush(BACKGROUND),
                lpszClassName: CLASS_NAME,
                ..Default::default()
            };
            if RegisterClassW(&class) == 0 {
                bail!("RegisterClassW failed");
            }

            let work_area = window::work_area().unwrap_or_else(|err| {
                warn!(error = %err, "work area unavailable; using a default rectangle");
                Rect {
                    left: 0,
                    top: 0,
                    right: 1024,
                    bottom: 768,
                }
            });
            let position =
                snapshot::compute_position(work_area, options.window_size, options.margin);

            let title: Vec<u16> = options.title.encode_utf16().chain(std::iter::once(0)).collect();
            let hwnd = CreateWindowExW(
                WS_EX_NOACTIVATE | WS_EX_TOOLWINDOW | WS_EX_TRANSPARENT,
                CLASS_NAME,
                PCWSTR(title.as_ptr()),
                WS_POPUP | WS_VISIBLE,
                position.x,
                position.y,
                options.window_size.width,
                options.window_size.height,
                None,
                None,
                instance,
                None,
            )
            .context("CreateWindowExW failed")?;

            // The creation styles already carry the overlay bits;
            // re-asserting through the style writer keeps the two
            // paths identical and is idempotent.
            window::apply_overlay_styles(hwnd);
            window::pin_to_bottom(hwnd);
            Ok(hwnd)
        }
    }

    extern "system" fn wndproc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
        match catch_unwind(AssertUnwindSafe(|| handle_message(hwnd, msg, wparam, lparam))) {
            Ok(Some(result)) => result,
            Ok(None) => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
            Err(_) => {
                error!(msg, "panic in overlay message handler suppressed");
                LRESULT(0)
            }
        }
    }

    fn handle_message(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> Option<LRESULT> {
        match msg {
            WM_WINDOWPOSCHANGING => {
                // Rewrite the pending z-order change in place instead
                // of posting another SetWindowPos, which would arrive
                // back here and loop.
                let pos = lparam.0 as *mut WINDOWPOS;
                if !pos.is_null() {
                    unsafe {
                        if !(*pos).flags.contains(SWP_NOZORDER) {
                            (*pos).hwndInsertAfter = HWND_BOTTOM;
                        }
                    }
                }
                Some(LRESULT(0))
            }
            WM_TIMER if wparam.0 == REFRESH_TIMER_ID => {
                handle_event(hwnd, OverlayEvent::RefreshTick);
                Some(LRESULT(0))
            }
            WM_DISPLAYCHANGE => {
                handle_event(hwnd, OverlayEvent::DisplayChanged);
                Some(LRESULT(0))
            }
            WM_WTSSESSION_CHANGE if wparam.0 == WTS_SESSION_UNLOCK as usize => {
                handle_event(hwnd, OverlayEvent::SessionUnlocked);
                Some(LRESULT(0))
            }
            WM_POWERBROADCAST
                if wparam.0 == PBT_APMRESUMEAUTOMATIC as usize
                    || wparam.0 == PBT_APMRESUMESUSPEND as usize =>
            {
                handle_event(hwnd, OverlayEvent::ResumedFromSuspend);
                Some(LRESULT(1))
            }
            WM_ACTIVATE if wparam.0 & 0xFFFF != WA_INACTIVE as usize => {
                handle_event(hwnd, OverlayEvent::ActivationAttempt);
                Some(LRESULT(0))
            }
            WM_PAINT => {
                paint(hwnd);
                Some(LRESULT(0))
            }
            WM_APP_PIN_BOTTOM => {
                window::pin_to_bottom(hwnd);
                Some(LRESULT(0))
            }
            WM_DESTROY => {
                shutdown(hwnd);
                Some(LRESULT(0))
            }
            _ => None,
        }
    }

    fn handle_event(hwnd: HWND, event: OverlayEvent) {
        debug!(?event, "overlay event");
        for action in actions_for(event) {
            match action {
                OverlayAction::GatherAndRender => gather_and_render(hwnd),
                OverlayAction::Reposition => STATE.with(|cell| {
                    if let Some(state) = cell.borrow().as_ref() {
                        window::reposition(hwnd, state.window_size, state.margin);
                    }
                }),
                OverlayAction::PinToBottom => unsafe {
                    // Deferred so a pending activation attempt is
                    // processed before the z-order is re-asserted.
                    if let Err(err) =
                        PostMessageW(hwnd, WM_APP_PIN_BOTTOM, WPARAM(0), LPARAM(0))
                    {
                        warn!(error = %err, "failed queueing z-order re-assertion");
                        window::pin_to_bottom(hwnd);
                    }
                },
            }
        }
    }

    fn gather_and_render(hwnd: HWND) {
        STATE.with(|cell| {
            if let Some(state) = cell.borrow_mut().as_mut() {
                let fresh = gather(
                    state.system.as_ref(),
                    state.network.as_ref(),
                    state.identity.as_ref(),
                );
                debug!(
                    snapshot = %serde_json::to_string(&fresh).unwrap_or_default(),
                    "snapshot gathered"
                );
                state.lines = render_lines(&fresh);
                // The previous snapshot is discarded; the window owns
                // exactly one at a time.
                state.current = fresh;
                info!(last_updated = %state.current.last_updated, "overlay refreshed");
            }
        });
        unsafe {
            let _ = InvalidateRect(hwnd, None, true);
        }
    }

    fn paint(hwnd: HWND) {
        let mut ps = PAINTSTRUCT::default();
        unsafe {
            let hdc = BeginPaint(hwnd, &mut ps);
            let _ = SetBkMode(hdc, TRANSPARENT);
            let _ = SetTextColor(hdc, TEXT_COLOR);
            STATE.with(|cell| {
                if let Some(state) = cell.borrow().as_ref() {
                    let mut top = PADDING;
                    for line in &state.lines {
                        let mut text: Vec<u16> = line.encode_utf16().collect();
                        let mut rect = RECT {
                            left: PADDING,
                            top,
                            right: state.window_size.width - PADDING,
                            bottom: top + LINE_HEIGHT,
                        };
                        DrawTextW(
                            hdc,
                            &mut text,
                            &mut rect,
                            DT_LEFT | DT_SINGLELINE | DT_NOPREFIX | DT_END_ELLIPSIS,
                        );
                        top += LINE_HEIGHT;
                    }
                }
            });
            let _ = EndPaint(hwnd, &ps);
        }
    }

    fn shutdown(hwnd: HWND) {
        unsafe {
            // Cancel the pending tick; no further refreshes fire.
            if let Err(err) = KillTimer(hwnd, REFRESH_TIMER_ID) {
                warn!(error = %err, "failed cancelling the refresh timer");
            }
        }
        STATE.with(|cell| {
            if let Some(state) = cell.borrow_mut().as_mut() {
                state.subscriptions.release(hwnd);
            }
        });
        info!("overlay window destroyed");
        unsafe { PostQuitMessage(0) };
    }
}
