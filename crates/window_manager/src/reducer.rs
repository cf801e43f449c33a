//! Window manager actions and the transition logic that applies them to a snapshot.

use desktop_app_contract::{AppDescriptor, ApplicationId};
use leptos::logging;

use crate::{
    config::WindowManagerConfig,
    error::WindowManagerError,
    geometry::{cascade_bounds, compute_snap_rect, keep_inside, SizeConstraints},
    model::{
        AnimationPhase, BoundsPatch, DesktopViewport, LaunchOptions, SnapZone, WindowId,
        WindowInstance, WindowManagerState, WindowRect, WindowState,
    },
};

#[derive(Debug, Clone)]
/// Actions accepted by [`reduce_window_manager`].
pub enum WindowAction {
    /// Upsert app descriptors by id.
    RegisterApps(Vec<AppDescriptor>),
    /// Record (or clear, with `None`) an app's dock icon rectangle.
    RegisterDockAppRect {
        app_id: ApplicationId,
        rect: Option<WindowRect>,
    },
    /// Replace the desktop viewport.
    SetViewport(DesktopViewport),
    /// Open a new window for a registered app.
    Launch {
        app_id: ApplicationId,
        options: LaunchOptions,
    },
    /// Raise and focus a window.
    Focus { window_id: WindowId },
    /// Drive the window state machine.
    SetState {
        window_id: WindowId,
        target: WindowState,
    },
    /// Remove a window.
    Close { window_id: WindowId },
    /// Merge geometry fields into a window's bounds without constraint checks. A window whose
    /// bounds change this way is no longer snapped.
    Move {
        window_id: WindowId,
        patch: BoundsPatch,
    },
    /// Pin a window to a viewport partition.
    SnapTo {
        window_id: WindowId,
        snap: SnapZone,
    },
    /// Clear a window's snap zone, keeping its bounds.
    Unsnap { window_id: WindowId },
    /// Set the transient animation phase.
    SetAnimationState {
        window_id: WindowId,
        phase: AnimationPhase,
    },
    /// Complete the current animation phase.
    FinishAnimation { window_id: WindowId },
}

impl WindowAction {
    fn label(&self) -> &'static str {
        match self {
            Self::RegisterApps(_) => "register_apps",
            Self::RegisterDockAppRect { .. } => "register_dock_app_rect",
            Self::SetViewport(_) => "set_viewport",
            Self::Launch { .. } => "launch",
            Self::Focus { .. } => "focus",
            Self::SetState { .. } => "set_state",
            Self::Close { .. } => "close",
            Self::Move { .. } => "move",
            Self::SnapTo { .. } => "snap_to",
            Self::Unsnap { .. } => "unsnap",
            Self::SetAnimationState { .. } => "set_animation_state",
            Self::FinishAnimation { .. } => "finish_animation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Outcome of a successfully reduced action.
pub enum Transition {
    /// The snapshot changed.
    Applied,
    /// A window was launched.
    Launched(WindowId),
    /// Nothing changed (unknown window id or the action was already satisfied).
    Ignored,
}

impl Transition {
    pub fn is_applied(self) -> bool {
        !matches!(self, Self::Ignored)
    }

    fn from_changed(changed: bool) -> Self {
        if changed {
            Self::Applied
        } else {
            Self::Ignored
        }
    }
}

/// Applies `action` to `state`.
///
/// Actions that reference unknown window ids are ignored rather than rejected, since windows can
/// be closed out from under asynchronous callers.
///
/// # Errors
///
/// Returns [`WindowManagerError::UnknownApp`] when launching an unregistered app.
pub fn reduce_window_manager(
    state: &mut WindowManagerState,
    config: &WindowManagerConfig,
    action: WindowAction,
) -> Result<Transition, WindowManagerError> {
    let label = action.label();
    let window_id = match &action {
        WindowAction::Focus { window_id }
        | WindowAction::SetState { window_id, .. }
        | WindowAction::Close { window_id }
        | WindowAction::Move { window_id, .. }
        | WindowAction::SnapTo { window_id, .. }
        | WindowAction::Unsnap { window_id }
        | WindowAction::SetAnimationState { window_id, .. }
        | WindowAction::FinishAnimation { window_id } => Some(*window_id),
        _ => None,
    };
    if let Some(window_id) = window_id {
        if !state.windows.contains_key(&window_id) {
            logging::debug_warn!("{label} ignored: window {window_id} not found");
            return Ok(Transition::Ignored);
        }
    }

    let transition = match action {
        WindowAction::RegisterApps(apps) => {
            let changed = !apps.is_empty();
            for app in apps {
                state.apps.insert(app.id.clone(), app);
            }
            Transition::from_changed(changed)
        }
        WindowAction::RegisterDockAppRect { app_id, rect } => {
            let previous = match rect {
                Some(rect) => state.dock_rects.insert(app_id, rect),
                None => state.dock_rects.remove(&app_id),
            };
            Transition::from_changed(previous != rect)
        }
        WindowAction::SetViewport(viewport) => {
            if state.viewport == viewport {
                Transition::Ignored
            } else {
                state.viewport = viewport;
                refit_zoomed_and_snapped(state, config);
                Transition::Applied
            }
        }
        WindowAction::Launch { app_id, options } => {
            Transition::Launched(launch_window(state, config, app_id, options)?)
        }
        WindowAction::Focus { window_id } => {
            Transition::from_changed(focus_window_internal(state, window_id))
        }
        WindowAction::SetState { window_id, target } => {
            let viewport = state.viewport;
            let constraints = constraints_for(state, config, window_id);
            update_window(state, window_id, |window| {
                apply_state_transition(window, target, viewport, constraints)
            })
        }
        WindowAction::Close { window_id } => {
            state.windows.remove(&window_id);
            state.order.retain(|id| *id != window_id);
            if state.active_id == Some(window_id) {
                state.active_id = None;
            }
            Transition::Applied
        }
        WindowAction::Move { window_id, patch } => update_window(state, window_id, |window| {
            let bounds = patch.apply(window.bounds);
            if bounds != window.bounds {
                window.bounds = bounds;
                window.snap = None;
            }
        }),
        WindowAction::SnapTo { window_id, snap } => {
            let constraints = constraints_for(state, config, window_id);
            let work_area = state.viewport.work_area;
            let rect = keep_inside(
                constraints.clamp_size(compute_snap_rect(Some(snap), work_area, &config.placement)),
                work_area,
            );
            update_window(state, window_id, |window| {
                window.state = WindowState::Normal;
                window.restore_bounds = None;
                window.snap = Some(snap);
                window.bounds = rect;
            })
        }
        WindowAction::Unsnap { window_id } => update_window(state, window_id, |window| {
            window.snap = None;
        }),
        WindowAction::SetAnimationState { window_id, phase } => {
            update_window(state, window_id, |window| {
                window.animation_state = phase;
            })
        }
        WindowAction::FinishAnimation { window_id } => {
            let phase = state
                .window(window_id)
                .map(|window| window.animation_state)
                .unwrap_or_default();
            match phase.on_complete() {
                Some(next) => update_window(state, window_id, |window| {
                    window.animation_state = next;
                }),
                None => reduce_window_manager(state, config, WindowAction::Close { window_id })?,
            }
        }
    };

    Ok(transition)
}

fn next_window_id(state: &mut WindowManagerState) -> WindowId {
    state.next_window_id = state.next_window_id.saturating_add(1);
    WindowId(state.next_window_id)
}

fn next_z(state: &mut WindowManagerState) -> u64 {
    state.next_z = state.next_z.saturating_add(1);
    state.next_z
}

fn constraints_for(
    state: &WindowManagerState,
    config: &WindowManagerConfig,
    window_id: WindowId,
) -> SizeConstraints {
    let app = state
        .window(window_id)
        .and_then(|window| state.app(&window.app_id));
    SizeConstraints::for_app(app, config.default_min_size)
}

fn update_window(
    state: &mut WindowManagerState,
    window_id: WindowId,
    apply: impl FnOnce(&mut WindowInstance),
) -> Transition {
    let Some(window) = state.windows.get_mut(&window_id) else {
        return Transition::Ignored;
    };
    let before = window.clone();
    apply(window);
    Transition::from_changed(*window != before)
}

fn launch_window(
    state: &mut WindowManagerState,
    config: &WindowManagerConfig,
    app_id: ApplicationId,
    options: LaunchOptions,
) -> Result<WindowId, WindowManagerError> {
    let app = state
        .app(&app_id)
        .ok_or_else(|| WindowManagerError::UnknownApp(app_id.clone()))?;
    let constraints = SizeConstraints::for_app(Some(app), config.default_min_size);
    let title = options.title.unwrap_or_else(|| app.title.clone());
    let bounds = constraints.clamp_size(options.bounds.unwrap_or_else(|| {
        cascade_bounds(
            state.windows.len(),
            state.viewport.work_area,
            &config.placement,
        )
    }));

    let window_id = next_window_id(state);
    let z = next_z(state);
    state.next_sequence = state.next_sequence.saturating_add(1);
    for window in state.windows.values_mut() {
        window.focused = false;
    }
    state.windows.insert(
        window_id,
        WindowInstance {
            id: window_id,
            app_id,
            title,
            state: WindowState::Normal,
            snap: None,
            bounds,
            restore_bounds: None,
            z,
            focused: true,
            created_at: state.next_sequence,
            animation_state: AnimationPhase::Opening,
        },
    );
    state.order.insert(0, window_id);
    state.active_id = Some(window_id);
    Ok(window_id)
}

/// Raises `window_id` above every other window and makes it the only focused one.
///
/// Returns `false` when the window is missing or already the focused top window.
fn focus_window_internal(state: &mut WindowManagerState, window_id: WindowId) -> bool {
    let Some(current_z) = state.window(window_id).map(|window| window.z) else {
        return false;
    };
    let already_focused_top = state.active_id == Some(window_id)
        && state.order.first() == Some(&window_id)
        && state.max_z() == Some(current_z)
        && state.windows.values().all(|w| w.focused == (w.id == window_id));
    if already_focused_top {
        return false;
    }

    let z = next_z(state);
    for window in state.windows.values_mut() {
        window.focused = window.id == window_id;
        if window.id == window_id {
            window.z = z;
        }
    }
    state.order.retain(|id| *id != window_id);
    state.order.insert(0, window_id);
    state.active_id = Some(window_id);
    true
}

fn zoom_rect(target: WindowState, viewport: DesktopViewport) -> WindowRect {
    if target == WindowState::Fullscreen {
        viewport.screen
    } else {
        viewport.work_area
    }
}

fn apply_state_transition(
    window: &mut WindowInstance,
    target: WindowState,
    viewport: DesktopViewport,
    constraints: SizeConstraints,
) {
    let previous = window.state;
    match target {
        WindowState::Maximized | WindowState::Fullscreen => {
            if previous == WindowState::Normal {
                window.restore_bounds = Some(window.bounds);
            }
            window.snap = None;
            window.bounds = constraints.clamp_size(zoom_rect(target, viewport));
        }
        WindowState::Minimized | WindowState::Hidden => {
            window.snap = None;
        }
        WindowState::Normal if previous.is_zoomed() => {
            window.bounds = window.restore_bounds.take().unwrap_or(window.bounds);
        }
        WindowState::Normal => {
            window.restore_bounds = None;
        }
    }
    window.state = target;
}

fn refit_zoomed_and_snapped(state: &mut WindowManagerState, config: &WindowManagerConfig) {
    let viewport = state.viewport;
    let ids = state.windows.keys().copied().collect::<Vec<_>>();
    for window_id in ids {
        let constraints = constraints_for(state, config, window_id);
        let Some(window) = state.windows.get_mut(&window_id) else {
            continue;
        };
        if window.state.is_zoomed() {
            window.bounds = constraints.clamp_size(zoom_rect(window.state, viewport));
        } else if window.state == WindowState::Normal {
            if let Some(snap) = window.snap {
                window.bounds = keep_inside(
                    constraints.clamp_size(compute_snap_rect(
                        Some(snap),
                        viewport.work_area,
                        &config.placement,
                    )),
                    viewport.work_area,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::{AppModule, AppMountContext, PixelSize};
    use leptos::{IntoView, View};
    use pretty_assertions::assert_eq;

    use super::*;

    fn blank(_: AppMountContext) -> View {
        ().into_view()
    }

    fn app(id: &str) -> AppDescriptor {
        AppDescriptor::new(ApplicationId::trusted(id), id, id, AppModule::new(blank))
    }

    fn state_with_apps() -> WindowManagerState {
        let mut state = WindowManagerState {
            viewport: DesktopViewport::uniform(1200, 800),
            ..WindowManagerState::default()
        };
        reduce(
            &mut state,
            WindowAction::RegisterApps(vec![app("calculator"), app("terminal")]),
        );
        state
    }

    fn reduce(state: &mut WindowManagerState, action: WindowAction) -> Transition {
        reduce_window_manager(state, &WindowManagerConfig::default(), action).expect("reduce")
    }

    fn launch(state: &mut WindowManagerState, app_id: &str) -> WindowId {
        match reduce(
            state,
            WindowAction::Launch {
                app_id: ApplicationId::trusted(app_id),
                options: LaunchOptions::default(),
            },
        ) {
            Transition::Launched(id) => id,
            other => panic!("expected launch, got {other:?}"),
        }
    }

    #[test]
    fn launch_rejects_unregistered_apps() {
        let mut state = state_with_apps();
        let result = reduce_window_manager(
            &mut state,
            &WindowManagerConfig::default(),
            WindowAction::Launch {
                app_id: ApplicationId::trusted("paint"),
                options: LaunchOptions::default(),
            },
        );
        assert_eq!(
            result,
            Err(WindowManagerError::UnknownApp(ApplicationId::trusted("paint")))
        );
        assert!(state.windows.is_empty());
    }

    #[test]
    fn launch_cascades_focuses_and_prepends() {
        let mut state = state_with_apps();
        let first = launch(&mut state, "calculator");
        let second = launch(&mut state, "terminal");

        assert_eq!(state.order, vec![second, first]);
        assert_eq!(state.active_id, Some(second));
        let a = &state.windows[&first];
        let b = &state.windows[&second];
        assert!(!a.focused);
        assert!(b.focused);
        assert!(b.z > a.z);
        assert_eq!(b.bounds.x - a.bounds.x, 28);
        assert_eq!(b.bounds.y - a.bounds.y, 28);
        assert_eq!(b.animation_state, AnimationPhase::Opening);
        assert_eq!(b.title, "terminal");
    }

    #[test]
    fn launch_clamps_explicit_bounds_to_app_constraints() {
        let mut state = state_with_apps();
        let pinned = app("calculator")
            .with_min_size(PixelSize::new(200, 350))
            .with_max_size(PixelSize::new(200, 350));
        reduce(&mut state, WindowAction::RegisterApps(vec![pinned]));
        let id = match reduce(
            &mut state,
            WindowAction::Launch {
                app_id: ApplicationId::trusted("calculator"),
                options: LaunchOptions {
                    bounds: Some(WindowRect::new(10, 10, 640, 90)),
                    title: Some("Calc".to_string()),
                },
            },
        ) {
            Transition::Launched(id) => id,
            other => panic!("expected launch, got {other:?}"),
        };
        let window = &state.windows[&id];
        assert_eq!(window.bounds, WindowRect::new(10, 10, 200, 350));
        assert_eq!(window.title, "Calc");
    }

    #[test]
    fn focusing_the_focused_top_window_is_ignored() {
        let mut state = state_with_apps();
        let first = launch(&mut state, "calculator");
        let second = launch(&mut state, "terminal");

        assert_eq!(
            reduce(&mut state, WindowAction::Focus { window_id: second }),
            Transition::Ignored
        );
        assert_eq!(
            reduce(&mut state, WindowAction::Focus { window_id: first }),
            Transition::Applied
        );
        assert_eq!(state.order, vec![first, second]);
        assert_eq!(state.max_z(), Some(state.windows[&first].z));
    }

    #[test]
    fn repeated_maximize_keeps_the_first_restore_snapshot() {
        let mut state = state_with_apps();
        let id = launch(&mut state, "terminal");
        let original = state.windows[&id].bounds;

        for target in [WindowState::Maximized, WindowState::Maximized, WindowState::Fullscreen] {
            reduce(&mut state, WindowAction::SetState { window_id: id, target });
            assert_eq!(state.windows[&id].restore_bounds, Some(original));
        }
        assert_eq!(state.windows[&id].bounds, state.viewport.screen);

        reduce(
            &mut state,
            WindowAction::SetState {
                window_id: id,
                target: WindowState::Normal,
            },
        );
        let window = &state.windows[&id];
        assert_eq!(window.bounds, original);
        assert_eq!(window.restore_bounds, None);
    }

    #[test]
    fn maximize_clears_snap_and_minimize_keeps_bounds() {
        let mut state = state_with_apps();
        let id = launch(&mut state, "terminal");
        reduce(
            &mut state,
            WindowAction::SnapTo {
                window_id: id,
                snap: SnapZone::LeftHalf,
            },
        );
        let snapped = state.windows[&id].bounds;

        reduce(
            &mut state,
            WindowAction::SetState {
                window_id: id,
                target: WindowState::Minimized,
            },
        );
        let window = &state.windows[&id];
        assert_eq!(window.snap, None);
        assert_eq!(window.bounds, snapped);

        reduce(
            &mut state,
            WindowAction::SnapTo {
                window_id: id,
                snap: SnapZone::RightHalf,
            },
        );
        assert_eq!(state.windows[&id].state, WindowState::Normal);
        reduce(
            &mut state,
            WindowAction::SetState {
                window_id: id,
                target: WindowState::Maximized,
            },
        );
        let window = &state.windows[&id];
        assert_eq!(window.snap, None);
        assert_eq!(window.bounds, state.viewport.work_area);
    }

    #[test]
    fn close_clears_active_id_without_refocusing() {
        let mut state = state_with_apps();
        let first = launch(&mut state, "calculator");
        let second = launch(&mut state, "terminal");

        reduce(&mut state, WindowAction::Close { window_id: second });
        assert_eq!(state.active_id, None);
        assert_eq!(state.order, vec![first]);
        assert!(!state.windows[&first].focused);
    }

    #[test]
    fn unknown_window_ids_are_ignored() {
        let mut state = state_with_apps();
        let ghost = WindowId(99);
        for action in [
            WindowAction::Focus { window_id: ghost },
            WindowAction::Close { window_id: ghost },
            WindowAction::Unsnap { window_id: ghost },
            WindowAction::Move {
                window_id: ghost,
                patch: BoundsPatch::position(1, 1),
            },
            WindowAction::SetState {
                window_id: ghost,
                target: WindowState::Maximized,
            },
        ] {
            assert_eq!(reduce(&mut state, action), Transition::Ignored);
        }
    }

    #[test]
    fn finish_animation_idles_or_closes() {
        let mut state = state_with_apps();
        let id = launch(&mut state, "terminal");
        reduce(&mut state, WindowAction::FinishAnimation { window_id: id });
        assert_eq!(state.windows[&id].animation_state, AnimationPhase::Idle);

        reduce(
            &mut state,
            WindowAction::SetAnimationState {
                window_id: id,
                phase: AnimationPhase::Closing,
            },
        );
        reduce(&mut state, WindowAction::FinishAnimation { window_id: id });
        assert!(state.windows.is_empty());
        assert!(state.order.is_empty());
    }

    #[test]
    fn viewport_change_refits_maximized_and_snapped_windows() {
        let mut state = state_with_apps();
        let maximized = launch(&mut state, "terminal");
        let snapped = launch(&mut state, "calculator");
        reduce(
            &mut state,
            WindowAction::SetState {
                window_id: maximized,
                target: WindowState::Maximized,
            },
        );
        reduce(
            &mut state,
            WindowAction::SnapTo {
                window_id: snapped,
                snap: SnapZone::RightHalf,
            },
        );

        reduce(
            &mut state,
            WindowAction::SetViewport(DesktopViewport::uniform(1600, 1000)),
        );
        assert_eq!(
            state.windows[&maximized].bounds,
            WindowRect::new(0, 0, 1600, 1000)
        );
        assert_eq!(
            state.windows[&snapped].bounds,
            WindowRect::new(800, 0, 800, 1000)
        );
    }

    #[test]
    fn moving_a_snapped_window_unsnaps_it() {
        let mut state = state_with_apps();
        let id = launch(&mut state, "terminal");
        reduce(
            &mut state,
            WindowAction::SnapTo {
                window_id: id,
                snap: SnapZone::LeftHalf,
            },
        );
        let snapped = state.windows[&id].bounds;
        assert_eq!(
            reduce(
                &mut state,
                WindowAction::Move {
                    window_id: id,
                    patch: BoundsPatch::position(snapped.x, snapped.y),
                },
            ),
            Transition::Ignored
        );
        assert_eq!(state.windows[&id].snap, Some(SnapZone::LeftHalf));

        reduce(
            &mut state,
            WindowAction::Move {
                window_id: id,
                patch: BoundsPatch::position(600, 290),
            },
        );
        reduce(
            &mut state,
            WindowAction::SetViewport(DesktopViewport::uniform(1210, 800)),
        );
        let window = &state.windows[&id];
        assert_eq!(window.snap, None);
        assert_eq!(window.bounds, WindowRect::new(600, 290, snapped.w, snapped.h));
    }

    #[test]
    fn snapping_an_oversized_window_keeps_it_inside_the_work_area() {
        let mut state = state_with_apps();
        let wide = app("terminal").with_min_size(PixelSize::new(800, 300));
        reduce(&mut state, WindowAction::RegisterApps(vec![wide]));
        let id = launch(&mut state, "terminal");

        reduce(
            &mut state,
            WindowAction::SnapTo {
                window_id: id,
                snap: SnapZone::RightHalf,
            },
        );
        assert_eq!(state.windows[&id].bounds, WindowRect::new(400, 0, 800, 800));

        reduce(
            &mut state,
            WindowAction::SetViewport(DesktopViewport::uniform(1000, 700)),
        );
        assert_eq!(state.windows[&id].bounds, WindowRect::new(200, 0, 800, 700));
    }

    #[test]
    fn dock_rects_are_recorded_and_cleared() {
        let mut state = state_with_apps();
        let app_id = ApplicationId::trusted("terminal");
        let rect = WindowRect::new(600, 760, 48, 48);
        assert_eq!(
            reduce(
                &mut state,
                WindowAction::RegisterDockAppRect {
                    app_id: app_id.clone(),
                    rect: Some(rect),
                },
            ),
            Transition::Applied
        );
        assert_eq!(state.dock_rects.get(&app_id), Some(&rect));
        reduce(
            &mut state,
            WindowAction::RegisterDockAppRect {
                app_id: app_id.clone(),
                rect: None,
            },
        );
        assert!(!state.dock_rects.contains_key(&app_id));
    }
}
