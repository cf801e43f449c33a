//! Command surface over a [`WindowStore`].

use std::rc::Rc;

use desktop_app_contract::{AppDescriptor, ApplicationId};
use leptos::logging;

use crate::{
    animation::{timeline_for_window, AnimationTimeline},
    config::WindowManagerConfig,
    error::WindowManagerError,
    geometry::SizeConstraints,
    model::{
        AnimationPhase, BoundsPatch, DesktopViewport, LaunchOptions, SnapZone, WindowId,
        WindowManagerState, WindowRect, WindowState,
    },
    reducer::{reduce_window_manager, Transition, WindowAction},
    store::{Subscription, WindowStore},
};

/// Cheap-to-clone handle that turns commands into reducer actions and commits them to the
/// store.
///
/// Commands addressed to windows that no longer exist return [`Transition::Ignored`].
#[derive(Clone)]
pub struct WindowApi {
    store: WindowStore,
    config: Rc<WindowManagerConfig>,
}

impl WindowApi {
    pub fn new(store: WindowStore) -> Self {
        Self::with_config(store, WindowManagerConfig::default())
    }

    pub fn with_config(store: WindowStore, config: WindowManagerConfig) -> Self {
        Self {
            store,
            config: Rc::new(config),
        }
    }

    pub fn store(&self) -> &WindowStore {
        &self.store
    }

    pub fn config(&self) -> &WindowManagerConfig {
        &self.config
    }

    pub fn get_state(&self) -> WindowManagerState {
        self.store.get()
    }

    pub fn subscribe(&self, listener: impl Fn(&WindowManagerState) + 'static) -> Subscription {
        self.store.subscribe(listener)
    }

    /// Reduces `action` against the current snapshot and commits the result if it changed
    /// anything.
    ///
    /// # Errors
    ///
    /// Propagates reducer errors; the store is left untouched.
    pub fn dispatch(&self, action: WindowAction) -> Result<Transition, WindowManagerError> {
        let config = Rc::clone(&self.config);
        let mut transition = Transition::Ignored;
        self.store.update(|current| -> Result<_, WindowManagerError> {
            let mut next = current.clone();
            transition = reduce_window_manager(&mut next, &config, action)?;
            Ok(transition.is_applied().then_some(next))
        })?;
        Ok(transition)
    }

    fn command(&self, action: WindowAction) -> Transition {
        match self.dispatch(action) {
            Ok(transition) => transition,
            Err(err) => {
                logging::warn!("window command failed: {err}");
                Transition::Ignored
            }
        }
    }

    pub fn register_apps(&self, apps: Vec<AppDescriptor>) -> Transition {
        self.command(WindowAction::RegisterApps(apps))
    }

    /// Records the dock icon rectangle used as the genie anchor for `app_id`; `None` clears it.
    pub fn register_dock_app_rect(
        &self,
        app_id: ApplicationId,
        rect: Option<WindowRect>,
    ) -> Transition {
        self.command(WindowAction::RegisterDockAppRect { app_id, rect })
    }

    pub fn set_viewport(&self, viewport: DesktopViewport) -> Transition {
        self.command(WindowAction::SetViewport(viewport))
    }

    /// Opens a new focused window for a registered app.
    ///
    /// # Errors
    ///
    /// Returns [`WindowManagerError::UnknownApp`] when `app_id` was never registered.
    pub fn launch(
        &self,
        app_id: &ApplicationId,
        options: Option<LaunchOptions>,
    ) -> Result<WindowId, WindowManagerError> {
        let transition = self.dispatch(WindowAction::Launch {
            app_id: app_id.clone(),
            options: options.unwrap_or_default(),
        })?;
        match transition {
            Transition::Launched(window_id) => Ok(window_id),
            _ => Err(WindowManagerError::UnknownApp(app_id.clone())),
        }
    }

    /// Like [`Self::launch`] for an unvalidated app id string.
    ///
    /// # Errors
    ///
    /// Returns [`WindowManagerError::InvalidApplicationId`] for malformed ids and
    /// [`WindowManagerError::UnknownApp`] for unregistered ones.
    pub fn launch_named(
        &self,
        raw_app_id: &str,
        options: Option<LaunchOptions>,
    ) -> Result<WindowId, WindowManagerError> {
        let app_id =
            ApplicationId::new(raw_app_id).map_err(WindowManagerError::InvalidApplicationId)?;
        self.launch(&app_id, options)
    }

    pub fn focus(&self, window_id: WindowId) -> Transition {
        self.command(WindowAction::Focus { window_id })
    }

    pub fn set_state(&self, window_id: WindowId, target: WindowState) -> Transition {
        self.command(WindowAction::SetState { window_id, target })
    }

    pub fn close(&self, window_id: WindowId) -> Transition {
        self.command(WindowAction::Close { window_id })
    }

    /// Merges `patch` into the window's bounds. Size constraints are not applied.
    pub fn move_window(&self, window_id: WindowId, patch: BoundsPatch) -> Transition {
        self.command(WindowAction::Move { window_id, patch })
    }

    pub fn snap_to(&self, window_id: WindowId, snap: SnapZone) -> Transition {
        self.command(WindowAction::SnapTo { window_id, snap })
    }

    pub fn unsnap(&self, window_id: WindowId) -> Transition {
        self.command(WindowAction::Unsnap { window_id })
    }

    pub fn set_animation_state(&self, window_id: WindowId, phase: AnimationPhase) -> Transition {
        self.command(WindowAction::SetAnimationState { window_id, phase })
    }

    /// Completes the window's current animation; a finished closing animation removes it.
    pub fn finish_animation(&self, window_id: WindowId) -> Transition {
        self.command(WindowAction::FinishAnimation { window_id })
    }

    /// Starts the minimize animation and records the minimized state.
    pub fn minimize(&self, window_id: WindowId) -> Transition {
        let animated = self.set_animation_state(window_id, AnimationPhase::Minimizing);
        let state = self.set_state(window_id, WindowState::Minimized);
        merge(animated, state)
    }

    /// Brings a window back to normal and focuses it. Only minimized or hidden windows play the
    /// restore animation.
    pub fn restore(&self, window_id: WindowId) -> Transition {
        let was_hidden = self.store.with(|state| {
            state
                .window(window_id)
                .is_some_and(|window| !window.state.is_visible())
        });
        let state = self.set_state(window_id, WindowState::Normal);
        let animated = if was_hidden {
            self.set_animation_state(window_id, AnimationPhase::Restoring)
        } else {
            Transition::Ignored
        };
        let focused = self.focus(window_id);
        merge(merge(state, animated), focused)
    }

    /// Maximizes a normal window, or returns a zoomed one to normal.
    pub fn toggle_zoom(&self, window_id: WindowId) -> Transition {
        let current = self
            .store
            .with(|state| state.window(window_id).map(|window| window.state));
        match current {
            Some(state) if state.is_zoomed() => self.set_state(window_id, WindowState::Normal),
            Some(_) => self.set_state(window_id, WindowState::Maximized),
            None => Transition::Ignored,
        }
    }

    /// Effective size range for the window's app, with defaults applied.
    pub fn size_constraints(&self, window_id: WindowId) -> SizeConstraints {
        self.store.with(|state| {
            let app = state
                .window(window_id)
                .and_then(|window| state.app(&window.app_id));
            SizeConstraints::for_app(app, self.config.default_min_size)
        })
    }

    /// Keyframes for the window's current animation phase, if any.
    pub fn animation_timeline(&self, window_id: WindowId) -> Option<AnimationTimeline> {
        self.store
            .with(|state| timeline_for_window(state, &self.config, window_id))
    }
}

fn merge(first: Transition, second: Transition) -> Transition {
    if first.is_applied() || second.is_applied() {
        Transition::Applied
    } else {
        Transition::Ignored
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use desktop_app_contract::{AppModule, AppMountContext, PixelSize};
    use leptos::{IntoView, View};
    use pretty_assertions::assert_eq;

    use super::*;

    fn blank(_: AppMountContext) -> View {
        ().into_view()
    }

    fn api() -> WindowApi {
        let api = WindowApi::new(WindowStore::new(WindowManagerState {
            viewport: DesktopViewport::uniform(1200, 800),
            ..WindowManagerState::default()
        }));
        api.register_apps(vec![AppDescriptor::new(
            ApplicationId::trusted("notepad"),
            "Notepad",
            "notepad",
            AppModule::new(blank),
        )
        .with_min_size(PixelSize::new(320, 240))]);
        api
    }

    #[test]
    fn ignored_commands_do_not_notify() {
        let api = api();
        let id = api.launch(&ApplicationId::trusted("notepad"), None).unwrap();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let _subscription = api.subscribe(move |_| counter.set(counter.get() + 1));

        assert_eq!(api.focus(id), Transition::Ignored);
        assert_eq!(api.close(WindowId(42)), Transition::Ignored);
        assert_eq!(calls.get(), 0);

        assert_eq!(api.unsnap(id), Transition::Ignored);
        assert_eq!(api.snap_to(id, SnapZone::LeftHalf), Transition::Applied);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn launch_named_validates_ids() {
        let api = api();
        assert!(matches!(
            api.launch_named("Not An Id", None),
            Err(WindowManagerError::InvalidApplicationId(_))
        ));
        assert_eq!(
            api.launch_named("paint", None),
            Err(WindowManagerError::UnknownApp(ApplicationId::trusted("paint")))
        );
        assert!(api.launch_named("notepad", None).is_ok());
    }

    #[test]
    fn minimize_then_restore_animates_and_refocuses() {
        let api = api();
        let id = api.launch(&ApplicationId::trusted("notepad"), None).unwrap();
        api.finish_animation(id);

        api.minimize(id);
        let window = api.get_state().windows[&id].clone();
        assert_eq!(window.state, WindowState::Minimized);
        assert_eq!(window.animation_state, AnimationPhase::Minimizing);
        assert!(api.animation_timeline(id).is_some());

        api.restore(id);
        let state = api.get_state();
        let window = &state.windows[&id];
        assert_eq!(window.state, WindowState::Normal);
        assert_eq!(window.animation_state, AnimationPhase::Restoring);
        assert_eq!(state.active_id, Some(id));

        api.finish_animation(id);
        assert_eq!(api.animation_timeline(id), None);
    }

    #[test]
    fn restoring_a_visible_window_only_refocuses() {
        let api = api();
        let first = api.launch(&ApplicationId::trusted("notepad"), None).unwrap();
        let second = api.launch(&ApplicationId::trusted("notepad"), None).unwrap();
        api.finish_animation(first);
        api.finish_animation(second);
        api.set_state(first, WindowState::Maximized);

        assert_eq!(api.restore(first), Transition::Applied);
        let state = api.get_state();
        let window = &state.windows[&first];
        assert_eq!(window.state, WindowState::Normal);
        assert_eq!(window.animation_state, AnimationPhase::Idle);
        assert_eq!(state.active_id, Some(first));
        assert_eq!(api.animation_timeline(first), None);

        assert_eq!(api.restore(first), Transition::Ignored);
    }

    #[test]
    fn toggle_zoom_round_trips_bounds() {
        let api = api();
        let id = api.launch(&ApplicationId::trusted("notepad"), None).unwrap();
        let original = api.get_state().windows[&id].bounds;

        api.toggle_zoom(id);
        assert_eq!(api.get_state().windows[&id].state, WindowState::Maximized);
        api.toggle_zoom(id);
        let window = api.get_state().windows[&id].clone();
        assert_eq!(window.state, WindowState::Normal);
        assert_eq!(window.bounds, original);
        assert_eq!(api.toggle_zoom(WindowId(999)), Transition::Ignored);
    }

    #[test]
    fn size_constraints_fall_back_to_defaults() {
        let api = api();
        let id = api.launch(&ApplicationId::trusted("notepad"), None).unwrap();
        assert_eq!(
            api.size_constraints(id),
            SizeConstraints {
                min: PixelSize::new(320, 240),
                max: None,
            }
        );
        assert_eq!(
            api.size_constraints(WindowId(999)).min,
            api.config().default_min_size
        );
    }
}
