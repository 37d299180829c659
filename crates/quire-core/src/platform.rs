//! Host abstraction for side effects the preview can't perform itself.
//!
//! The decoration engine never touches the outside world. Opening a link
//! target is delegated to whatever embeds the editor (desktop shell,
//! browser, test harness).

/// Error type for platform operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformError(pub String);

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PlatformError {}

/// Side effects provided by the embedding application.
pub trait PreviewHost {
    /// Open a link target outside the editor.
    fn open_url(&self, url: &str) -> Result<(), PlatformError>;
}

/// Unit type implementation - no way to open links.
impl PreviewHost for () {
    fn open_url(&self, url: &str) -> Result<(), PlatformError> {
        Err(PlatformError(format!("no url opener available for {url}")))
    }
}

impl<T: PreviewHost> PreviewHost for &T {
    fn open_url(&self, url: &str) -> Result<(), PlatformError> {
        (*self).open_url(url)
    }
}
