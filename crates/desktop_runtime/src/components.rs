//! Desktop window layer and dock anchors.

mod window;

use desktop_app_contract::ApplicationId;
use leptos::*;
use window_manager::{ResizeEdge, WindowId, WindowInstance, WindowManagerState};

use self::window::DesktopWindow;
use crate::{host, runtime_context::use_window_manager};

pub use self::window::{animation_name, window_style};

/// DOM id of the dock element registered for `app_id`.
pub fn dock_anchor_dom_id(app_id: &ApplicationId) -> String {
    format!("dock-anchor-{}", app_id.as_str().replace('.', "-"))
}

fn paint_order_ids(state: &WindowManagerState) -> Vec<WindowId> {
    state
        .paint_order()
        .into_iter()
        .map(|window| window.id)
        .collect()
}

#[component]
/// Renders every window of the session, bottom to top.
pub fn DesktopWindowLayer() -> impl IntoView {
    let wm = use_window_manager();

    view! {
        <div class="desktop-window-layer">
            <For
                each=move || wm.state.with(paint_order_ids)
                key=|window_id| window_id.0
                let:window_id
            >
                <DesktopWindow window_id=window_id />
            </For>
        </div>
    }
}

#[component]
/// Wraps a dock icon and registers its on-screen rectangle as the genie anchor for `app_id`.
///
/// The rectangle is re-measured whenever the viewport changes and cleared on unmount.
pub fn DockAnchor(app_id: ApplicationId, children: Children) -> impl IntoView {
    let wm = use_window_manager();
    let dom_id = dock_anchor_dom_id(&app_id);

    let viewport = create_memo(move |_| wm.state.with(|state| state.viewport));
    {
        let app_id = app_id.clone();
        let dom_id = dom_id.clone();
        create_effect(move |_| {
            viewport.track();
            let app_id = app_id.clone();
            let dom_id = dom_id.clone();
            request_animation_frame(move || {
                let rect = host::element_rect_by_id(&dom_id);
                wm.with_api(|api| {
                    api.register_dock_app_rect(app_id, rect);
                });
            });
        });
    }
    on_cleanup(move || {
        wm.with_api(|api| {
            api.register_dock_app_rect(app_id, None);
        });
    });

    view! {
        <div id=dom_id class="dock-anchor">
            {children()}
        </div>
    }
}

pub(crate) fn visible_or_animating(window: &WindowInstance) -> bool {
    window.state.is_visible() || window.animation_state.is_animating()
}

pub(crate) fn resize_edge_class(edge: ResizeEdge) -> &'static str {
    match edge {
        ResizeEdge::North => "edge-n",
        ResizeEdge::South => "edge-s",
        ResizeEdge::East => "edge-e",
        ResizeEdge::West => "edge-w",
        ResizeEdge::NorthEast => "edge-ne",
        ResizeEdge::NorthWest => "edge-nw",
        ResizeEdge::SouthEast => "edge-se",
        ResizeEdge::SouthWest => "edge-sw",
    }
}
