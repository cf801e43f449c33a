//! Shared contract types between the desktop window manager and the apps it hosts.
//!
//! Apps describe themselves with an [`AppDescriptor`]; the window manager stores the descriptor in
//! its registry and the renderer mounts [`AppDescriptor::module`] exactly once per window.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use leptos::View;
use serde::{Deserialize, Serialize};

/// Stable identifier for a runtime-managed window.
pub type WindowRuntimeId = u64;

/// Default titlebar height in CSS pixels when an app does not override it.
pub const DEFAULT_TITLEBAR_HEIGHT_PX: i32 = 32;

/// Stable identifier for an app package/module.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(String);

impl ApplicationId {
    /// Returns an app identifier when `raw` conforms to the lowercase `segment[.segment]` policy.
    pub fn new(raw: impl Into<String>) -> Result<Self, String> {
        let raw = raw.into();
        if is_valid_application_id(&raw) {
            Ok(Self(raw))
        } else {
            Err(format!(
                "invalid application id `{raw}`; expected lowercase dotted segments"
            ))
        }
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Creates an id without validation for compile-time/runtime trusted constants.
    pub fn trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn is_valid_application_id(raw: &str) -> bool {
    if raw.is_empty() || raw.len() > 120 {
        return false;
    }

    raw.split('.').all(|part| {
        let bytes = part.as_bytes();
        !part.is_empty()
            && part.len() <= 32
            && bytes[0].is_ascii_lowercase()
            && bytes
                .iter()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
            && !part.ends_with('-')
    })
}

/// Width/height pair in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelSize {
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl PixelSize {
    /// Creates a size from width and height.
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }
}

/// Window chrome hints declared by an app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChromeHints {
    /// Render the titlebar controls as a floating action bar over the content.
    pub floating_action_bar: bool,
    /// Titlebar height override in pixels.
    pub titlebar_height: Option<i32>,
}

impl ChromeHints {
    /// Effective titlebar height.
    pub fn titlebar_height_px(self) -> i32 {
        self.titlebar_height.unwrap_or(DEFAULT_TITLEBAR_HEIGHT_PX)
    }
}

#[derive(Debug, Clone)]
/// Mount context handed to an app's content renderer for one window.
pub struct AppMountContext {
    /// App id from the registry.
    pub app_id: ApplicationId,
    /// Runtime window id the content is mounted into.
    pub window_id: WindowRuntimeId,
    /// Window title at mount time.
    pub title: String,
}

/// Static app mount function used by the runtime registry.
pub type AppMountFn = fn(AppMountContext) -> View;

#[derive(Debug, Clone, Copy)]
/// Content renderer reference for a registered app.
pub struct AppModule {
    mount_fn: AppMountFn,
}

impl AppModule {
    /// Creates a module from a mount function.
    pub const fn new(mount_fn: AppMountFn) -> Self {
        Self { mount_fn }
    }

    /// Mounts the app view with a runtime-provided context.
    pub fn mount(self, context: AppMountContext) -> View {
        (self.mount_fn)(context)
    }
}

#[derive(Debug, Clone)]
/// Registration entry for one application.
///
/// Descriptors are immutable once registered; registering the same id again replaces the entry.
pub struct AppDescriptor {
    /// Canonical app id.
    pub id: ApplicationId,
    /// Human-readable title used for new windows.
    pub title: String,
    /// Icon reference understood by the renderer (icon name or asset URL).
    pub icon: String,
    /// Content renderer.
    pub module: AppModule,
    /// Smallest allowed window size.
    pub min_size: Option<PixelSize>,
    /// Largest allowed window size.
    pub max_size: Option<PixelSize>,
    /// Whether the window exposes resize handles.
    pub resizable: bool,
    /// Window chrome hints.
    pub chrome: ChromeHints,
}

impl AppDescriptor {
    /// Creates a resizable descriptor with no size constraints and default chrome.
    pub fn new(
        id: ApplicationId,
        title: impl Into<String>,
        icon: impl Into<String>,
        module: AppModule,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            icon: icon.into(),
            module,
            min_size: None,
            max_size: None,
            resizable: true,
            chrome: ChromeHints::default(),
        }
    }

    /// Sets the minimum window size.
    pub fn with_min_size(mut self, size: PixelSize) -> Self {
        self.min_size = Some(size);
        self
    }

    /// Sets the maximum window size.
    pub fn with_max_size(mut self, size: PixelSize) -> Self {
        self.max_size = Some(size);
        self
    }

    /// Sets the resizable flag.
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Sets chrome hints.
    pub fn with_chrome(mut self, chrome: ChromeHints) -> Self {
        self.chrome = chrome;
        self
    }
}

#[cfg(test)]
mod tests {
    use leptos::IntoView;
    use pretty_assertions::assert_eq;

    use super::*;

    fn blank(_: AppMountContext) -> View {
        ().into_view()
    }

    #[test]
    fn application_id_accepts_plain_and_dotted_names() {
        assert!(ApplicationId::new("calculator").is_ok());
        assert!(ApplicationId::new("system.settings").is_ok());
        assert!(ApplicationId::new("image-editor").is_ok());
        assert!(ApplicationId::new("Calculator").is_err());
        assert!(ApplicationId::new("system..calc").is_err());
        assert!(ApplicationId::new("calc-").is_err());
        assert!(ApplicationId::new("").is_err());
    }

    #[test]
    fn descriptor_builders_set_constraints() {
        let descriptor = AppDescriptor::new(
            ApplicationId::trusted("calculator"),
            "Calculator",
            "calculator",
            AppModule::new(blank),
        )
        .with_min_size(PixelSize::new(200, 350))
        .with_max_size(PixelSize::new(200, 350))
        .with_resizable(false);

        assert_eq!(descriptor.min_size, Some(PixelSize::new(200, 350)));
        assert_eq!(descriptor.max_size, Some(PixelSize::new(200, 350)));
        assert!(!descriptor.resizable);
        assert_eq!(
            descriptor.chrome.titlebar_height_px(),
            DEFAULT_TITLEBAR_HEIGHT_PX
        );
    }
}
