use crate::locator::LocatorSpec;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("Session error: {0}")]
    Session(String),

    #[error("Command failed: {0}")]
    Command(String),

    #[error("Script error: {0}")]
    Script(String),

    #[error("Frame switch failed: {0}")]
    Frame(String),

    #[error("Window switch failed: {0}")]
    Window(String),
}

/// The interaction surface of a live browser session.
///
/// Implementations wrap one session and never manage the browser process
/// itself. Elements are only valid until the page they came from changes;
/// callers re-query instead of holding on to them.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Opaque reference to a DOM element in the current browsing context.
    type Element: Clone + Send + Sync + std::fmt::Debug;

    /// Navigate the current top-level context to `url`.
    async fn goto(&self, url: &str) -> Result<(), DriverError>;

    /// URL of the current top-level context.
    async fn current_url(&self) -> Result<String, DriverError>;

    /// All elements matching `locator` in the current browsing context,
    /// in document order. An empty vector is not an error.
    async fn find_all(&self, locator: &LocatorSpec) -> Result<Vec<Self::Element>, DriverError>;

    /// Whether the element is displayed, enabled and not covered by another element.
    async fn is_interactable(&self, element: &Self::Element) -> Result<bool, DriverError>;

    async fn click(&self, element: &Self::Element) -> Result<(), DriverError>;

    async fn clear(&self, element: &Self::Element) -> Result<(), DriverError>;

    /// Type into the element. For file inputs this is the native way of
    /// choosing a path.
    async fn send_keys(&self, element: &Self::Element, text: &str) -> Result<(), DriverError>;

    /// Evaluate `script` in the page. `arguments[0..]` are `args`.
    async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value, DriverError>;

    /// Evaluate `script` with `element` bound to `arguments[0]`, followed by `args`.
    async fn execute_on(
        &self,
        script: &str,
        element: &Self::Element,
        args: Vec<Value>,
    ) -> Result<Value, DriverError>;

    /// Make the frame `element` refers to the current browsing context.
    async fn enter_frame(&self, element: &Self::Element) -> Result<(), DriverError>;

    /// Return to the top-level document of the current window.
    async fn enter_root(&self) -> Result<(), DriverError>;

    /// Handle of the current window.
    async fn window(&self) -> Result<String, DriverError>;

    /// Handles of every open window, in the order the browser reports them.
    async fn windows(&self) -> Result<Vec<String>, DriverError>;

    async fn switch_to_window(&self, handle: &str) -> Result<(), DriverError>;

    /// Close the current window.
    async fn close_window(&self) -> Result<(), DriverError>;

    /// End the session.
    async fn quit(&self) -> Result<(), DriverError>;
}
