//! Window placement math.
//!
//! The overlay is pinned inside the work area (the screen minus
//! reserved system UI such as the task bar), a fixed margin from the
//! top-right corner. Positions are recomputed from the current work
//! area on every display change, never cached.

use serde::{Deserialize, Serialize};

/// Margin between the window and the work-area edges, in pixels.
pub const CORNER_MARGIN: i32 = 15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Top-left coordinate placing the window `margin` units inside the
/// work area's top-right corner, clamped so the full window rectangle
/// stays inside the work area.
pub fn compute_position(work_area: Rect, window: Size, margin: i32) -> Point {
    let max_x = (work_area.right - window.width).max(work_area.left);
    let max_y = (work_area.bottom - window.height).max(work_area.top);
    Point {
        x: (work_area.right - window.width - margin).clamp(work_area.left, max_x),
        y: (work_area.top + margin).clamp(work_area.top, max_y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Size = Size {
        width: 280,
        height: 210,
    };

    fn work_area(width: i32, height: i32) -> Rect {
        Rect {
            left: 0,
            top: 0,
            right: width,
            bottom: height,
        }
    }

    #[test]
    fn pins_to_top_right_with_margin() {
        let position = compute_position(work_area(1920, 1040), WINDOW, CORNER_MARGIN);
        assert_eq!(position, Point { x: 1625, y: 15 });
    }

    #[test]
    fn resolution_change_keeps_right_edge_margin() {
        let before = compute_position(work_area(1920, 1080), WINDOW, 15);
        let after = compute_position(work_area(2560, 1440), WINDOW, 15);
        assert_eq!(before.x + WINDOW.width + 15, 1920);
        assert_eq!(after.x + WINDOW.width + 15, 2560);
    }

    #[test]
    fn work_area_offset_is_respected() {
        // Secondary monitor to the right of the primary, task bar on
        // top reserving 40 pixels.
        let area = Rect {
            left: 1920,
            top: 40,
            right: 3840,
            bottom: 1080,
        };
        let position = compute_position(area, WINDOW, CORNER_MARGIN);
        assert_eq!(position.x, 3840 - WINDOW.width - 15);
        assert_eq!(position.y, 55);
        assert!(position.x >= area.left);
    }

    #[test]
    fn window_rectangle_always_inside_work_area() {
        for (w, h) in [(310, 240), (500, 500), (1920, 1080), (2560, 1440)] {
            let area = work_area(w, h);
            let p = compute_position(area, WINDOW, CORNER_MARGIN);
            assert!(p.x >= area.left);
            assert!(p.y >= area.top);
            assert!(p.x + WINDOW.width <= area.right);
            assert!(p.y + WINDOW.height <= area.bottom);
        }
    }

    #[test]
    fn tiny_work_area_clamps_instead_of_going_negative() {
        let position = compute_position(work_area(200, 100), WINDOW, CORNER_MARGIN);
        assert_eq!(position, Point { x: 0, y: 0 });
    }
}
