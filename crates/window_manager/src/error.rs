use desktop_app_contract::ApplicationId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors returned by the window manager command surface.
///
/// Commands addressed to unknown window ids are not errors; they are ignored.
pub enum WindowManagerError {
    /// `launch` referenced an app id that was never registered.
    #[error("app `{0}` is not registered")]
    UnknownApp(ApplicationId),
    /// A raw app id failed validation.
    #[error("{0}")]
    InvalidApplicationId(String),
    /// Configuration failed to parse or validate.
    #[error("invalid window manager config: {0}")]
    InvalidConfig(String),
}
