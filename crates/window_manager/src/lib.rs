//! Headless window manager for the browser desktop.
//!
//! The crate owns the observable window store, the window state machine, interactive geometry
//! (cascade placement, snapping, drag and resize controllers) and the minimize/restore genie
//! geometry. It never touches the DOM; the `desktop_runtime` crate wires it to Leptos.

pub mod animation;
pub mod api;
pub mod config;
pub mod error;
pub mod genie;
pub mod geometry;
pub mod interaction;
pub mod model;
pub mod reducer;
pub mod store;

pub use animation::{AnimationTimeline, Keyframe};
pub use api::WindowApi;
pub use config::{AnimationConfig, PlacementConfig, TimingCurve, WindowManagerConfig};
pub use error::WindowManagerError;
pub use genie::{genie_anchor, genie_frames, AnchorPoint, GenieAnimation, GeniePolygon};
pub use geometry::{
    cascade_bounds, clamp, compute_snap_rect, keep_inside, resize_bounds, SizeConstraints,
};
pub use interaction::{DragController, FrameRequest, ResizeController};
pub use model::*;
pub use reducer::{reduce_window_manager, Transition, WindowAction};
pub use store::{Subscription, WindowStore};
