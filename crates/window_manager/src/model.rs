use std::collections::BTreeMap;

use desktop_app_contract::{AppDescriptor, ApplicationId};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SCREEN_WIDTH: i32 = 1280;
pub const DEFAULT_SCREEN_HEIGHT: i32 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    pub fn right(self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(self) -> i32 {
        self.y + self.h
    }

    pub fn center_x(self) -> i32 {
        self.x + self.w / 2
    }
}

/// Partial geometry update merged into existing bounds by [`crate::WindowApi::move_window`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoundsPatch {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub w: Option<i32>,
    pub h: Option<i32>,
}

impl BoundsPatch {
    pub fn position(x: i32, y: i32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn rect(rect: WindowRect) -> Self {
        Self {
            x: Some(rect.x),
            y: Some(rect.y),
            w: Some(rect.w),
            h: Some(rect.h),
        }
    }

    pub fn apply(self, rect: WindowRect) -> WindowRect {
        WindowRect {
            x: self.x.unwrap_or(rect.x),
            y: self.y.unwrap_or(rect.y),
            w: self.w.unwrap_or(rect.w),
            h: self.h.unwrap_or(rect.h),
        }
    }
}

/// Desktop geometry the window manager lays windows out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopViewport {
    /// Area available to windows (excludes menu bar and dock). Used for maximize, snapping and
    /// cascade placement.
    pub work_area: WindowRect,
    /// Full browser window, used for fullscreen.
    pub screen: WindowRect,
}

impl DesktopViewport {
    /// Viewport whose work area covers the whole screen.
    pub fn uniform(width: i32, height: i32) -> Self {
        let rect = WindowRect::new(0, 0, width, height);
        Self {
            work_area: rect,
            screen: rect,
        }
    }
}

impl Default for DesktopViewport {
    fn default() -> Self {
        Self::uniform(DEFAULT_SCREEN_WIDTH, DEFAULT_SCREEN_HEIGHT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowState {
    #[default]
    Normal,
    Minimized,
    Maximized,
    Fullscreen,
    Hidden,
}

impl WindowState {
    pub fn is_zoomed(self) -> bool {
        matches!(self, Self::Maximized | Self::Fullscreen)
    }

    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Minimized | Self::Hidden)
    }
}

/// Named viewport partitions a window can be pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapZone {
    LeftHalf,
    RightHalf,
    TopHalf,
    BottomHalf,
    TlQuarter,
    TrQuarter,
    BlQuarter,
    BrQuarter,
}

impl SnapZone {
    pub const ALL: [SnapZone; 8] = [
        Self::LeftHalf,
        Self::RightHalf,
        Self::TopHalf,
        Self::BottomHalf,
        Self::TlQuarter,
        Self::TrQuarter,
        Self::BlQuarter,
        Self::BrQuarter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeftHalf => "left-half",
            Self::RightHalf => "right-half",
            Self::TopHalf => "top-half",
            Self::BottomHalf => "bottom-half",
            Self::TlQuarter => "tl-quarter",
            Self::TrQuarter => "tr-quarter",
            Self::BlQuarter => "bl-quarter",
            Self::BrQuarter => "br-quarter",
        }
    }

    /// Parses a snap identifier; unknown names yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|zone| zone.as_str() == raw)
    }
}

/// Transient animation phase, orthogonal to [`WindowState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationPhase {
    #[default]
    Idle,
    Opening,
    Closing,
    Minimizing,
    Restoring,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowInstance {
    pub id: WindowId,
    pub app_id: ApplicationId,
    pub title: String,
    pub state: WindowState,
    pub snap: Option<SnapZone>,
    pub bounds: WindowRect,
    pub restore_bounds: Option<WindowRect>,
    pub z: u64,
    pub focused: bool,
    /// Store-local creation sequence number.
    pub created_at: u64,
    pub animation_state: AnimationPhase,
}

/// Optional overrides for [`crate::WindowApi::launch`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LaunchOptions {
    /// Explicit bounds; cascade placement is used when absent.
    pub bounds: Option<WindowRect>,
    /// Title override; the app title is used when absent.
    pub title: Option<String>,
}

impl LaunchOptions {
    pub fn with_bounds(bounds: WindowRect) -> Self {
        Self {
            bounds: Some(bounds),
            title: None,
        }
    }
}

/// Snapshot held by [`crate::WindowStore`].
#[derive(Debug, Clone, Default)]
pub struct WindowManagerState {
    pub apps: BTreeMap<ApplicationId, AppDescriptor>,
    pub windows: BTreeMap<WindowId, WindowInstance>,
    /// Window ids, most recently focused or launched first.
    pub order: Vec<WindowId>,
    pub active_id: Option<WindowId>,
    pub dock_rects: BTreeMap<ApplicationId, WindowRect>,
    pub viewport: DesktopViewport,
    pub next_window_id: u64,
    pub next_z: u64,
    pub next_sequence: u64,
}

impl WindowManagerState {
    pub fn window(&self, window_id: WindowId) -> Option<&WindowInstance> {
        self.windows.get(&window_id)
    }

    pub fn app(&self, app_id: &ApplicationId) -> Option<&AppDescriptor> {
        self.apps.get(app_id)
    }

    /// Windows sorted bottom-to-top for painting.
    pub fn paint_order(&self) -> Vec<&WindowInstance> {
        let mut windows = self.windows.values().collect::<Vec<_>>();
        windows.sort_by_key(|window| window.z);
        windows
    }

    pub fn max_z(&self) -> Option<u64> {
        self.windows.values().map(|window| window.z).max()
    }

    pub fn windows_for_app<'a>(
        &'a self,
        app_id: &'a ApplicationId,
    ) -> impl Iterator<Item = &'a WindowInstance> + 'a {
        self.order
            .iter()
            .filter_map(|id| self.windows.get(id))
            .filter(move |window| &window.app_id == app_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

impl PointerPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeEdge {
    pub const ALL: [ResizeEdge; 8] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn bounds_patch_merges_only_present_fields() {
        let rect = WindowRect::new(10, 20, 300, 200);
        assert_eq!(
            BoundsPatch::position(40, 50).apply(rect),
            WindowRect::new(40, 50, 300, 200)
        );
        let widen = BoundsPatch {
            w: Some(480),
            ..BoundsPatch::default()
        };
        assert_eq!(widen.apply(rect), WindowRect::new(10, 20, 480, 200));
    }

    #[test]
    fn snap_zone_names_round_trip_through_parse() {
        for zone in SnapZone::ALL {
            assert_eq!(SnapZone::parse(zone.as_str()), Some(zone));
        }
        assert_eq!(SnapZone::parse("middle"), None);
    }

    #[test]
    fn snap_zone_serializes_with_kebab_case_names() {
        let encoded = serde_json::to_string(&SnapZone::TlQuarter).unwrap();
        assert_eq!(encoded, "\"tl-quarter\"");
        let state = serde_json::to_string(&WindowState::Fullscreen).unwrap();
        assert_eq!(state, "\"fullscreen\"");
    }
}
