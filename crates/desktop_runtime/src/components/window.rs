use desktop_app_contract::{AppMountContext, ChromeHints};
use leptos::*;
use window_manager::{
    animation::timeline_for_window, AnimationPhase, DragController, FrameRequest,
    ResizeController, ResizeEdge, WindowId, WindowInstance, WindowState,
};

use super::{resize_edge_class, visible_or_animating};
use crate::{host, runtime_context::use_window_manager};

/// `@keyframes` name for `phase` on `window_id`; unique per window so concurrent animations never
/// share a rule.
pub fn animation_name(phase: AnimationPhase, window_id: WindowId) -> String {
    format!("wm-{}-{}", phase.as_str(), window_id)
}

/// Inline style positioning `window`, hiding it once it is minimized or hidden and no
/// animation is left to play.
pub fn window_style(window: &WindowInstance, animation: Option<&str>) -> String {
    let bounds = window.bounds;
    let mut style = format!(
        "left:{}px;top:{}px;width:{}px;height:{}px;z-index:{};",
        bounds.x, bounds.y, bounds.w, bounds.h, window.z
    );
    if !visible_or_animating(window) {
        style.push_str("display:none;");
    }
    if let Some(animation) = animation {
        style.push_str(&format!("animation:{animation};"));
    }
    style
}

fn state_class(state: WindowState) -> &'static str {
    match state {
        WindowState::Normal => "normal",
        WindowState::Minimized => "minimized",
        WindowState::Maximized => "maximized",
        WindowState::Fullscreen => "fullscreen",
        WindowState::Hidden => "hidden",
    }
}

fn stop_pointer_event(ev: &web_sys::PointerEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

fn stop_mouse_event(ev: &web_sys::MouseEvent) {
    ev.prevent_default();
    ev.stop_propagation();
}

#[component]
pub(super) fn DesktopWindow(window_id: WindowId) -> impl IntoView {
    let wm = use_window_manager();
    let window = create_memo(move |_| wm.state.with(|state| state.window(window_id).cloned()));
    let timeline = create_memo(move |_| {
        wm.state.with(|state| {
            wm.with_api(|api| timeline_for_window(state, api.config(), window_id))
        })
    });
    let drag = store_value(DragController::new(window_id));

    // App metadata is immutable per registration; the content is mounted exactly once.
    let (chrome, resizable, mount) = wm.state.with_untracked(|state| {
        let window = state.window(window_id);
        let app = window.and_then(|window| state.app(&window.app_id));
        let mount = window.zip(app).map(|(window, app)| {
            (
                app.module,
                AppMountContext {
                    app_id: window.app_id.clone(),
                    window_id: window_id.0,
                    title: window.title.clone(),
                },
            )
        });
        (
            app.map(|app| app.chrome).unwrap_or_default(),
            app.map_or(true, |app| app.resizable),
            mount,
        )
    });
    let contents = match mount {
        Some((module, context)) => module.mount(context),
        None => view! { <p>"Unavailable"</p> }.into_view(),
    };
    let ChromeHints {
        floating_action_bar,
        ..
    } = chrome;
    let titlebar_style = format!("height:{}px;", chrome.titlebar_height_px());

    let focus = move |_: web_sys::PointerEvent| {
        let needs_focus = window.with_untracked(|w| w.as_ref().is_some_and(|w| !w.focused));
        if needs_focus {
            wm.with_api(|api| {
                api.focus(window_id);
            });
        }
    };
    let begin_move = move |ev: web_sys::PointerEvent| {
        if !host::is_primary_press(&ev) {
            return;
        }
        let began = wm
            .with_api(|api| {
                drag.try_update_value(|drag| {
                    drag.begin(api, ev.pointer_id(), host::pointer_position(&ev))
                })
            })
            .unwrap_or(false);
        if began {
            host::try_set_pointer_capture(&ev);
            stop_pointer_event(&ev);
        }
    };
    let update_move = move |ev: web_sys::PointerEvent| {
        let request = drag.try_update_value(|drag| {
            drag.update(ev.pointer_id(), host::pointer_position(&ev))
        });
        if request == Some(FrameRequest::Schedule) {
            request_animation_frame(move || {
                wm.with_api(|api| {
                    drag.try_update_value(|drag| drag.commit_frame(api));
                });
            });
        }
    };
    let end_move = move |ev: web_sys::PointerEvent| {
        drag.try_update_value(|drag| drag.end(ev.pointer_id()));
    };
    let cancel_move = move |ev: web_sys::PointerEvent| {
        drag.try_update_value(|drag| drag.cancel(ev.pointer_id()));
    };
    let toggle_zoom = move || {
        wm.with_api(|api| {
            api.toggle_zoom(window_id);
        });
    };
    let on_animation_end = move |ev: web_sys::AnimationEvent| {
        // Animations inside the app content bubble up here too.
        if ev.target() != ev.current_target() {
            return;
        }
        wm.with_api(|api| {
            api.finish_animation(window_id);
        });
    };

    let section_class = move || {
        window.with(|w| match w {
            Some(w) => format!(
                "desktop-window {}{}",
                state_class(w.state),
                if w.focused { " focused" } else { "" }
            ),
            None => "desktop-window".to_string(),
        })
    };
    let section_style = move || {
        let animation = timeline
            .get()
            .map(|timeline| timeline.css_animation(&animation_name(timeline.phase, window_id)));
        window.with(|w| {
            w.as_ref()
                .map(|w| window_style(w, animation.as_deref()))
                .unwrap_or_default()
        })
    };
    let keyframes = move || {
        timeline
            .get()
            .map(|timeline| timeline.to_css_keyframes(&animation_name(timeline.phase, window_id)))
            .unwrap_or_default()
    };
    let title = move || {
        window.with(|w| w.as_ref().map(|w| w.title.clone()).unwrap_or_default())
    };
    let is_zoomed = move || window.with(|w| w.as_ref().is_some_and(|w| w.state.is_zoomed()));
    let can_resize = move || {
        resizable && window.with(|w| w.as_ref().is_some_and(|w| w.state == WindowState::Normal))
    };

    view! {
        <section
            class=section_class
            style=section_style
            role="dialog"
            aria-label=title
            on:pointerdown=focus
            on:animationend=on_animation_end
        >
            <style>{keyframes}</style>
            <header
                class=if floating_action_bar { "titlebar floating" } else { "titlebar" }
                style=titlebar_style
                on:pointerdown=begin_move
                on:pointermove=update_move
                on:pointerup=end_move
                on:pointercancel=cancel_move
                on:lostpointercapture=cancel_move
                on:dblclick=move |ev: web_sys::MouseEvent| {
                    stop_mouse_event(&ev);
                    toggle_zoom();
                }
            >
                <div class="titlebar-controls">
                    <button
                        class="titlebar-close"
                        aria-label="Close window"
                        on:pointerdown=move |ev: web_sys::PointerEvent| stop_pointer_event(&ev)
                        on:click=move |ev| {
                            stop_mouse_event(&ev);
                            wm.with_api(|api| {
                                api.set_animation_state(window_id, AnimationPhase::Closing);
                            });
                        }
                    />
                    <button
                        class="titlebar-minimize"
                        aria-label="Minimize window"
                        on:pointerdown=move |ev: web_sys::PointerEvent| stop_pointer_event(&ev)
                        on:click=move |ev| {
                            stop_mouse_event(&ev);
                            wm.with_api(|api| {
                                api.minimize(window_id);
                            });
                        }
                    />
                    <button
                        class="titlebar-zoom"
                        aria-label=move || if is_zoomed() { "Restore window" } else { "Zoom window" }
                        on:pointerdown=move |ev: web_sys::PointerEvent| stop_pointer_event(&ev)
                        on:click=move |ev| {
                            stop_mouse_event(&ev);
                            toggle_zoom();
                        }
                    />
                </div>
                <div class="titlebar-title">{title}</div>
            </header>
            <div class="window-body">{contents}</div>
            <Show when=can_resize fallback=|| ()>
                {ResizeEdge::ALL
                    .map(|edge| view! { <WindowResizeHandle window_id=window_id edge=edge /> })
                    .to_vec()}
            </Show>
        </section>
    }
}

#[component]
fn WindowResizeHandle(window_id: WindowId, edge: ResizeEdge) -> impl IntoView {
    let wm = use_window_manager();
    let resize = store_value(ResizeController::new(window_id, edge));

    let on_pointerdown = move |ev: web_sys::PointerEvent| {
        if !host::is_primary_press(&ev) {
            return;
        }
        let began = wm
            .with_api(|api| {
                resize.try_update_value(|resize| {
                    resize.begin(api, ev.pointer_id(), host::pointer_position(&ev))
                })
            })
            .unwrap_or(false);
        if began {
            host::try_set_pointer_capture(&ev);
            stop_pointer_event(&ev);
        }
    };
    let on_pointermove = move |ev: web_sys::PointerEvent| {
        wm.with_api(|api| {
            resize.try_update_value(|resize| {
                resize.update(api, ev.pointer_id(), host::pointer_position(&ev))
            });
        });
    };
    let on_pointerup = move |ev: web_sys::PointerEvent| {
        resize.try_update_value(|resize| resize.end(ev.pointer_id()));
    };
    let on_pointercancel = move |ev: web_sys::PointerEvent| {
        resize.try_update_value(|resize| resize.cancel(ev.pointer_id()));
    };

    view! {
        <div
            class=format!("window-resize-handle {}", resize_edge_class(edge))
            aria-hidden="true"
            on:pointerdown=on_pointerdown
            on:pointermove=on_pointermove
            on:pointerup=on_pointerup
            on:pointercancel=on_pointercancel
            on:lostpointercapture=on_pointercancel
        />
    }
}
