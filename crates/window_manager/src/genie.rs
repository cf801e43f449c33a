//! Genie minimize/restore geometry.
//!
//! A genie sequence is a list of clip polygons in percentages of the window's own box, so the
//! same sequence works at any resolution. Minimizing funnels the window into its dock icon:
//! the lower bands (tail, then neck) collapse early on an ease-out curve while the top corners
//! only start moving in on an ease-in curve, which makes the window read as fabric pulled to a
//! point. Restoring plays the same frames backwards.

use serde::{Deserialize, Serialize};

use crate::model::{DesktopViewport, WindowRect};

/// Number of time steps in a genie sequence (offsets 0, .25, .5, .75, 1).
pub const GENIE_STEPS: usize = 5;

/// Half-width, in percent, of the collapsed funnel tip.
const TIP_HALF_WIDTH: f32 = 1.0;
/// Vertical position of the belly and neck bands between the top edge and the tail.
const BELLY_BAND: f32 = 0.35;
const NECK_BAND: f32 = 0.7;
/// How far each band leans toward the ease-out curve (1.0) versus the ease-in curve (0.0).
const BELLY_LEAN: f32 = 0.35;
const NECK_LEAN: f32 = 0.8;

/// Anchor in pixels relative to the window's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorPoint {
    pub x: f32,
    pub y: f32,
}

/// Polygon vertex in percent of the window box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolygonPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeniePolygon {
    /// Clockwise from the top-left corner: top, belly, neck and tail on the right side, then
    /// back up the left side.
    pub points: Vec<PolygonPoint>,
}

impl GeniePolygon {
    /// CSS `clip-path` value.
    pub fn to_css(&self) -> String {
        let points = self
            .points
            .iter()
            .map(|point| format!("{}% {}%", css_number(point.x), css_number(point.y)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("polygon({points})")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenieSequence {
    pub frames: Vec<GeniePolygon>,
}

impl GenieSequence {
    /// Evenly spaced time offsets in `[0, 1]`, one per frame.
    pub fn offsets(&self) -> Vec<f32> {
        let last = self.frames.len().saturating_sub(1).max(1) as f32;
        (0..self.frames.len()).map(|i| i as f32 / last).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenieAnimation {
    pub minimize: GenieSequence,
    pub restore: GenieSequence,
}

/// Formats `value` rounded to two decimals without a trailing `.0` or a negative zero.
pub(crate) fn css_number(value: f32) -> String {
    format!("{}", round2(value) + 0.0)
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

fn ease_in_cubic(t: f32) -> f32 {
    t * t * t
}

/// One horizontal slice of the funnel silhouette.
struct Band {
    y: f32,
    center: f32,
    half_width: f32,
}

impl Band {
    fn at(y: f32, blend: f32, anchor_x: f32) -> Self {
        Self {
            y,
            center: lerp(50.0, anchor_x, blend),
            half_width: lerp(50.0, TIP_HALF_WIDTH, blend),
        }
    }

    fn left(&self) -> PolygonPoint {
        PolygonPoint {
            x: round2((self.center - self.half_width).clamp(0.0, 100.0)),
            y: round2(self.y),
        }
    }

    fn right(&self) -> PolygonPoint {
        PolygonPoint {
            x: round2((self.center + self.half_width).clamp(0.0, 100.0)),
            y: round2(self.y),
        }
    }
}

fn funnel_frame(t: f32, anchor_x: f32, anchor_y: f32) -> GeniePolygon {
    let out = ease_out_cubic(t);
    let inward = ease_in_cubic(t);

    let top_y = lerp(0.0, anchor_y, inward);
    let tail_y = lerp(100.0, anchor_y, out);

    let top = Band::at(top_y, inward, anchor_x);
    let belly = Band::at(
        lerp(top_y, tail_y, BELLY_BAND),
        lerp(inward, out, BELLY_LEAN),
        anchor_x,
    );
    let neck = Band::at(
        lerp(top_y, tail_y, NECK_BAND),
        lerp(inward, out, NECK_LEAN),
        anchor_x,
    );
    let tail = Band::at(tail_y, out, anchor_x);

    GeniePolygon {
        points: vec![
            top.left(),
            top.right(),
            belly.right(),
            neck.right(),
            tail.right(),
            tail.left(),
            neck.left(),
            belly.left(),
        ],
    }
}

/// Builds the minimize and restore clip sequences for a `width` × `height` window whose dock
/// anchor sits at `anchor` (pixels relative to the window's top-left corner).
pub fn genie_frames(width: f32, height: f32, anchor: AnchorPoint) -> GenieAnimation {
    let anchor_x = (anchor.x / width.max(1.0) * 100.0).clamp(0.0, 100.0);
    let anchor_y = (anchor.y / height.max(1.0) * 100.0).clamp(0.0, 100.0);
    let last = (GENIE_STEPS - 1) as f32;

    let frames = (0..GENIE_STEPS)
        .map(|step| funnel_frame(step as f32 / last, anchor_x, anchor_y))
        .collect::<Vec<_>>();
    let mut reversed = frames.clone();
    reversed.reverse();

    GenieAnimation {
        minimize: GenieSequence { frames },
        restore: GenieSequence { frames: reversed },
    }
}

/// Anchor for a window's genie effect: the top-center of its dock icon, or the lower-center of
/// the screen when the app has no dock icon.
pub fn genie_anchor(
    bounds: WindowRect,
    dock_rect: Option<WindowRect>,
    viewport: &DesktopViewport,
) -> AnchorPoint {
    let (x, y) = match dock_rect {
        Some(rect) => (rect.center_x(), rect.y),
        None => (viewport.screen.center_x(), viewport.screen.bottom()),
    };
    AnchorPoint {
        x: (x - bounds.x) as f32,
        y: (y - bounds.y) as f32,
    }
}
