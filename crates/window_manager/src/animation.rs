//! Animation phase transitions and data-described keyframe timelines.
//!
//! Timelines are plain data (offset plus property values) so any rendering technology can play
//! them; [`AnimationTimeline::to_css_keyframes`] covers the browser case.

use serde::{Deserialize, Serialize};

use crate::{
    config::{AnimationConfig, TimingCurve, WindowManagerConfig},
    genie::{css_number, genie_anchor, genie_frames, AnchorPoint, GeniePolygon, GenieSequence},
    model::{AnimationPhase, WindowId, WindowManagerState, WindowRect},
};

impl AnimationPhase {
    /// Phase to enter once the current animation finishes.
    ///
    /// `None` means the phase is terminal: a finished closing animation leaves removal to the
    /// caller.
    pub fn on_complete(self) -> Option<Self> {
        match self {
            Self::Idle | Self::Opening | Self::Minimizing | Self::Restoring => Some(Self::Idle),
            Self::Closing => None,
        }
    }

    pub fn is_animating(self) -> bool {
        self != Self::Idle
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Opening => "opening",
            Self::Closing => "closing",
            Self::Minimizing => "minimizing",
            Self::Restoring => "restoring",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Position in the timeline, `0.0..=1.0`.
    pub offset: f32,
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
    pub opacity: f32,
    pub blur_px: f32,
    pub rotate_deg: f32,
    pub clip: Option<GeniePolygon>,
}

impl Keyframe {
    /// Untransformed, fully visible frame.
    pub fn rest(offset: f32) -> Self {
        Self {
            offset,
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            opacity: 1.0,
            blur_px: 0.0,
            rotate_deg: 0.0,
            clip: None,
        }
    }

    /// CSS declarations for this frame.
    pub fn to_css_declarations(&self) -> String {
        let mut css = format!(
            "transform: translate({}px, {}px) scale({}) rotate({}deg); opacity: {}; filter: blur({}px);",
            css_number(self.translate_x),
            css_number(self.translate_y),
            css_number(self.scale),
            css_number(self.rotate_deg),
            css_number(self.opacity),
            css_number(self.blur_px),
        );
        if let Some(clip) = &self.clip {
            css.push_str(&format!(" clip-path: {};", clip.to_css()));
        }
        css
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationTimeline {
    pub phase: AnimationPhase,
    pub duration_ms: u32,
    pub curve: TimingCurve,
    pub keyframes: Vec<Keyframe>,
}

impl AnimationTimeline {
    /// Timeline for `phase` on a window with `bounds`; `None` for [`AnimationPhase::Idle`].
    ///
    /// `anchor` is only used by the minimizing and restoring phases.
    pub fn for_phase(
        phase: AnimationPhase,
        bounds: WindowRect,
        anchor: AnchorPoint,
        config: &AnimationConfig,
    ) -> Option<Self> {
        let timing = config.timing(phase)?;
        let keyframes = match phase {
            AnimationPhase::Idle => return None,
            AnimationPhase::Opening => vec![
                Keyframe {
                    scale: 0.92,
                    translate_y: 12.0,
                    opacity: 0.0,
                    blur_px: 6.0,
                    ..Keyframe::rest(0.0)
                },
                Keyframe {
                    scale: 1.01,
                    ..Keyframe::rest(0.6)
                },
                Keyframe::rest(1.0),
            ],
            AnimationPhase::Closing => vec![
                Keyframe::rest(0.0),
                Keyframe {
                    scale: 0.9,
                    translate_y: 8.0,
                    opacity: 0.0,
                    blur_px: 4.0,
                    ..Keyframe::rest(1.0)
                },
            ],
            AnimationPhase::Minimizing => minimize_keyframes(bounds, anchor),
            AnimationPhase::Restoring => reverse_keyframes(minimize_keyframes(bounds, anchor)),
        };

        Some(Self {
            phase,
            duration_ms: timing.duration_ms,
            curve: timing.curve,
            keyframes,
        })
    }

    /// `@keyframes` rule named `name`.
    pub fn to_css_keyframes(&self, name: &str) -> String {
        let frames = self
            .keyframes
            .iter()
            .map(|frame| {
                format!(
                    "{}% {{ {} }}",
                    css_number(frame.offset * 100.0),
                    frame.to_css_declarations()
                )
            })
            .collect::<Vec<_>>()
            .join(" ");
        format!("@keyframes {name} {{ {frames} }}")
    }

    /// `animation` shorthand playing the `name` rule once and holding its last frame.
    pub fn css_animation(&self, name: &str) -> String {
        format!(
            "{name} {}ms {} forwards",
            self.duration_ms,
            self.curve.css()
        )
    }
}

fn minimize_keyframes(bounds: WindowRect, anchor: AnchorPoint) -> Vec<Keyframe> {
    let GenieSequence { frames } =
        genie_frames(bounds.w as f32, bounds.h as f32, anchor).minimize;
    // The clip funnel ends at the bottom edge; the remaining distance to an icon below the
    // window is covered by translation.
    let overshoot = (anchor.y - bounds.h as f32).max(0.0);
    let last = frames.len().saturating_sub(1).max(1) as f32;

    frames
        .into_iter()
        .enumerate()
        .map(|(step, clip)| {
            let t = step as f32 / last;
            let pull = t * t * t;
            Keyframe {
                translate_y: overshoot * pull,
                opacity: 1.0 - pull,
                blur_px: 2.0 * pull,
                clip: Some(clip),
                ..Keyframe::rest(t)
            }
        })
        .collect()
}

fn reverse_keyframes(keyframes: Vec<Keyframe>) -> Vec<Keyframe> {
    keyframes
        .into_iter()
        .rev()
        .map(|frame| Keyframe {
            offset: 1.0 - frame.offset,
            ..frame
        })
        .collect()
}

/// Timeline for the window's current animation phase, anchored on its app's dock icon.
pub fn timeline_for_window(
    state: &WindowManagerState,
    config: &WindowManagerConfig,
    window_id: WindowId,
) -> Option<AnimationTimeline> {
    let window = state.window(window_id)?;
    let anchor = genie_anchor(
        window.bounds,
        state.dock_rects.get(&window.app_id).copied(),
        &state.viewport,
    );
    AnimationTimeline::for_phase(
        window.animation_state,
        window.bounds,
        anchor,
        &config.animation,
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const ANCHOR: AnchorPoint = AnchorPoint { x: 300.0, y: 520.0 };

    fn bounds() -> WindowRect {
        WindowRect::new(100, 80, 600, 400)
    }

    #[test]
    fn completion_returns_to_idle_except_closing() {
        assert_eq!(AnimationPhase::Opening.on_complete(), Some(AnimationPhase::Idle));
        assert_eq!(AnimationPhase::Minimizing.on_complete(), Some(AnimationPhase::Idle));
        assert_eq!(AnimationPhase::Restoring.on_complete(), Some(AnimationPhase::Idle));
        assert_eq!(AnimationPhase::Idle.on_complete(), Some(AnimationPhase::Idle));
        assert_eq!(AnimationPhase::Closing.on_complete(), None);
    }

    #[test]
    fn idle_has_no_timeline() {
        assert_eq!(
            AnimationTimeline::for_phase(
                AnimationPhase::Idle,
                bounds(),
                ANCHOR,
                &AnimationConfig::default()
            ),
            None
        );
    }

    #[test]
    fn opening_fades_in_and_settles_at_rest() {
        let timeline = AnimationTimeline::for_phase(
            AnimationPhase::Opening,
            bounds(),
            ANCHOR,
            &AnimationConfig::default(),
        )
        .unwrap();
        assert_eq!(timeline.duration_ms, 220);
        assert_eq!(timeline.keyframes.first().unwrap().opacity, 0.0);
        assert_eq!(timeline.keyframes.last().unwrap(), &Keyframe::rest(1.0));
    }

    #[test]
    fn minimize_embeds_genie_clips_and_travels_to_the_icon() {
        let timeline = AnimationTimeline::for_phase(
            AnimationPhase::Minimizing,
            bounds(),
            ANCHOR,
            &AnimationConfig::default(),
        )
        .unwrap();
        let offsets = timeline
            .keyframes
            .iter()
            .map(|frame| frame.offset)
            .collect::<Vec<_>>();
        assert_eq!(offsets, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert!(timeline.keyframes.iter().all(|frame| frame.clip.is_some()));
        let last = timeline.keyframes.last().unwrap();
        assert_eq!(last.translate_y, 120.0);
        assert_eq!(last.opacity, 0.0);
    }

    #[test]
    fn restore_mirrors_minimize() {
        let config = AnimationConfig::default();
        let minimize =
            AnimationTimeline::for_phase(AnimationPhase::Minimizing, bounds(), ANCHOR, &config)
                .unwrap();
        let restore =
            AnimationTimeline::for_phase(AnimationPhase::Restoring, bounds(), ANCHOR, &config)
                .unwrap();
        let n = minimize.keyframes.len();
        for (i, frame) in restore.keyframes.iter().enumerate() {
            let mirrored = &minimize.keyframes[n - 1 - i];
            assert_eq!(frame.clip, mirrored.clip);
            assert_eq!(frame.offset, 1.0 - mirrored.offset);
        }
    }

    #[test]
    fn css_keyframes_render_every_offset() {
        let timeline = AnimationTimeline::for_phase(
            AnimationPhase::Closing,
            bounds(),
            ANCHOR,
            &AnimationConfig::default(),
        )
        .unwrap();
        let css = timeline.to_css_keyframes("wm-close-4");
        assert!(css.starts_with("@keyframes wm-close-4 { 0% { transform: translate(0px, 0px)"));
        assert!(css.contains("100% { transform: translate(0px, 8px) scale(0.9) rotate(0deg); opacity: 0; filter: blur(4px); }"));
        assert_eq!(
            timeline.css_animation("wm-close-4"),
            "wm-close-4 180ms ease-in forwards"
        );
    }
}
