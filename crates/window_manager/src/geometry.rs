//! Pure geometry: cascade placement, snap rectangles and constrained resizing.

use desktop_app_contract::{AppDescriptor, PixelSize};

use crate::{
    config::PlacementConfig,
    model::{ResizeEdge, SnapZone, WindowRect},
};

/// Clamps `n` into `[min, max]`; `min` wins when the range is inverted.
pub fn clamp(n: i32, min: i32, max: i32) -> i32 {
    n.min(max).max(min)
}

fn scaled(length: i32, fraction: f32) -> i32 {
    (length as f32 * fraction).round() as i32
}

/// Effective size range for a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeConstraints {
    pub min: PixelSize,
    /// `None` means unbounded.
    pub max: Option<PixelSize>,
}

impl SizeConstraints {
    /// Builds constraints from an app descriptor, falling back to `default_min` and no maximum.
    pub fn for_app(app: Option<&AppDescriptor>, default_min: PixelSize) -> Self {
        Self {
            min: app.and_then(|app| app.min_size).unwrap_or(default_min),
            max: app.and_then(|app| app.max_size),
        }
    }

    pub fn clamp_width(self, w: i32) -> i32 {
        clamp(w, self.min.w, self.max.map_or(i32::MAX, |max| max.w))
    }

    pub fn clamp_height(self, h: i32) -> i32 {
        clamp(h, self.min.h, self.max.map_or(i32::MAX, |max| max.h))
    }

    /// Clamps only the size of `rect`, keeping its origin.
    pub fn clamp_size(self, rect: WindowRect) -> WindowRect {
        WindowRect {
            w: self.clamp_width(rect.w),
            h: self.clamp_height(rect.h),
            ..rect
        }
    }
}

/// Bounds for a newly launched window when `existing` windows are already open.
///
/// Windows step diagonally by `cascade_step` and wrap every `cascade_slots` windows; the result
/// always stays inside `work_area` when it fits.
pub fn cascade_bounds(
    existing: usize,
    work_area: WindowRect,
    placement: &PlacementConfig,
) -> WindowRect {
    let w = placement
        .max_initial_size
        .w
        .min(scaled(work_area.w, placement.initial_fraction));
    let h = placement
        .max_initial_size
        .h
        .min(scaled(work_area.h, placement.initial_fraction));
    let slot = (existing % placement.cascade_slots.max(1)) as i32;
    let offset = placement.cascade_step * slot;

    WindowRect {
        x: clamp(work_area.x + offset, work_area.x, work_area.right() - w),
        y: clamp(work_area.y + offset, work_area.y, work_area.bottom() - h),
        w,
        h,
    }
}

/// Shifts `rect` (size unchanged) so it lies inside `area`; oversized rects align to the
/// top-left corner.
pub fn keep_inside(rect: WindowRect, area: WindowRect) -> WindowRect {
    WindowRect {
        x: clamp(rect.x, area.x, area.right() - rect.w),
        y: clamp(rect.y, area.y, area.bottom() - rect.h),
        ..rect
    }
}

/// Maps a snap zone to an exact partition of `work_area`.
///
/// Right and bottom parts take the odd remainder so that complementary zones tile the work area
/// without gaps. `None` yields the default floating rectangle.
pub fn compute_snap_rect(
    snap: Option<SnapZone>,
    work_area: WindowRect,
    placement: &PlacementConfig,
) -> WindowRect {
    let WindowRect { x, y, w, h } = work_area;
    let left_w = w / 2;
    let right_w = w - left_w;
    let top_h = h / 2;
    let bottom_h = h - top_h;

    match snap {
        Some(SnapZone::LeftHalf) => WindowRect::new(x, y, left_w, h),
        Some(SnapZone::RightHalf) => WindowRect::new(x + left_w, y, right_w, h),
        Some(SnapZone::TopHalf) => WindowRect::new(x, y, w, top_h),
        Some(SnapZone::BottomHalf) => WindowRect::new(x, y + top_h, w, bottom_h),
        Some(SnapZone::TlQuarter) => WindowRect::new(x, y, left_w, top_h),
        Some(SnapZone::TrQuarter) => WindowRect::new(x + left_w, y, right_w, top_h),
        Some(SnapZone::BlQuarter) => WindowRect::new(x, y + top_h, left_w, bottom_h),
        Some(SnapZone::BrQuarter) => WindowRect::new(x + left_w, y + top_h, right_w, bottom_h),
        None => WindowRect::new(
            x + placement.default_offset,
            y + placement.default_offset,
            scaled(w, placement.default_fraction),
            scaled(h, placement.default_fraction),
        ),
    }
}

/// Edges moved by a resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeEdges {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl From<ResizeEdge> for ResizeEdges {
    fn from(edge: ResizeEdge) -> Self {
        let (left, right, top, bottom) = match edge {
            ResizeEdge::North => (false, false, true, false),
            ResizeEdge::South => (false, false, false, true),
            ResizeEdge::East => (false, true, false, false),
            ResizeEdge::West => (true, false, false, false),
            ResizeEdge::NorthEast => (false, true, true, false),
            ResizeEdge::NorthWest => (true, false, true, false),
            ResizeEdge::SouthEast => (false, true, false, true),
            ResizeEdge::SouthWest => (true, false, false, true),
        };
        Self {
            left,
            right,
            top,
            bottom,
        }
    }
}

/// Applies a signed pointer delta to `start` for the dragged `edge`.
///
/// Width and height are clamped to `constraints`; the edge opposite the dragged one stays fixed.
pub fn resize_bounds(
    start: WindowRect,
    edge: ResizeEdge,
    dx: i32,
    dy: i32,
    constraints: SizeConstraints,
) -> WindowRect {
    let edges = ResizeEdges::from(edge);
    let mut next = start;

    if edges.right {
        next.w = constraints.clamp_width(start.w + dx);
    } else if edges.left {
        next.w = constraints.clamp_width(start.w - dx);
        next.x = start.right() - next.w;
    }

    if edges.bottom {
        next.h = constraints.clamp_height(start.h + dy);
    } else if edges.top {
        next.h = constraints.clamp_height(start.h - dy);
        next.y = start.bottom() - next.h;
    }

    next
}
