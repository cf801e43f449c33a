//! Leptos renderer for the window manager: session provider, window chrome and dock anchors.

pub mod components;
pub mod host;
pub mod runtime_context;

pub use components::{dock_anchor_dom_id, DesktopWindowLayer, DockAnchor};
pub use runtime_context::{load_config, use_window_manager, DesktopProvider, WindowManagerContext};
