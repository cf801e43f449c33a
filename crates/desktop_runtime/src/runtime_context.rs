//! Provider and context wiring between the window manager store and Leptos.
//!
//! The store stays the source of truth; a signal mirrors each committed snapshot so components
//! re-render reactively. The mirror subscription lives as long as the provider's owner.

use desktop_app_contract::AppDescriptor;
use leptos::*;
use window_manager::{WindowApi, WindowManagerConfig, WindowManagerState, WindowStore};

use crate::host;

#[derive(Clone, Copy)]
/// Leptos context for reading window manager state and issuing commands.
pub struct WindowManagerContext {
    /// Command surface shared by every component of this desktop session.
    pub api: StoredValue<WindowApi>,
    /// Reactive mirror of the store snapshot.
    pub state: RwSignal<WindowManagerState>,
}

impl WindowManagerContext {
    /// Runs `f` with the command surface.
    pub fn with_api<R>(&self, f: impl FnOnce(&WindowApi) -> R) -> R {
        self.api.with_value(f)
    }
}

/// Parses a JSON window manager config, falling back to defaults when it is malformed.
pub fn load_config(raw: &str) -> WindowManagerConfig {
    WindowManagerConfig::from_json(raw).unwrap_or_else(|err| {
        logging::warn!("{err}; using default window manager config");
        WindowManagerConfig::default()
    })
}

#[component]
/// Owns one window manager session and provides [`WindowManagerContext`] to descendants.
pub fn DesktopProvider(
    /// Apps available for launch.
    apps: Vec<AppDescriptor>,
    /// Placement and animation tuning; defaults apply when absent.
    #[prop(optional)]
    config: Option<WindowManagerConfig>,
    children: Children,
) -> impl IntoView {
    let store = WindowStore::new(WindowManagerState {
        viewport: host::desktop_viewport(),
        ..WindowManagerState::default()
    });
    let api = WindowApi::with_config(store, config.unwrap_or_default());
    api.register_apps(apps);

    let state = create_rw_signal(api.get_state());
    let subscription = api.subscribe(move |snapshot| state.set(snapshot.clone()));
    on_cleanup(move || subscription.unsubscribe());

    let context = WindowManagerContext {
        api: store_value(api),
        state,
    };

    let resize_listener = window_event_listener(ev::resize, move |_| {
        context.with_api(|api| api.set_viewport(host::desktop_viewport()));
    });
    on_cleanup(move || resize_listener.remove());

    provide_context(context);

    children().into_view()
}

/// Returns the current [`WindowManagerContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_window_manager() -> WindowManagerContext {
    use_context::<WindowManagerContext>().expect("WindowManagerContext not provided")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use window_manager::PlacementConfig;

    use super::*;

    #[test]
    fn malformed_config_falls_back_to_defaults() {
        assert_eq!(load_config("{ nope"), WindowManagerConfig::default());
        assert_eq!(
            load_config(r#"{ "placement": { "cascade_slots": 0 } }"#),
            WindowManagerConfig::default()
        );
    }

    #[test]
    fn valid_config_is_used() {
        let config = load_config(r#"{ "placement": { "cascade_step": 16 } }"#);
        assert_eq!(
            config.placement,
            PlacementConfig {
                cascade_step: 16,
                ..PlacementConfig::default()
            }
        );
    }
}
