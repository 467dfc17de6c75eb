use thiserror::Error;

/// Rejections reported by the window core. None of these are fatal to the
/// session; the store is left unchanged when one is returned.
#[derive(Debug, Error)]
pub enum WindowError {
    #[error("App \"{0}\" is not installed. Use 'apt install {0}' in the terminal.")]
    NotInstalled(String),

    #[error("Unknown app: {0}")]
    UnknownApp(String),

    #[error("A gesture is already in progress on window {0}")]
    GestureActive(String),

    #[error("{0} is a system app and cannot be removed")]
    ProtectedApp(String),

    #[error("Invalid layout data: {0}")]
    Persistence(#[from] serde_json::Error),

    #[error("Layout file error: {0}")]
    Io(#[from] std::io::Error),
}

impl WindowError {
    /// True for rejections the shell should surface as a user notification
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            WindowError::NotInstalled(_) | WindowError::UnknownApp(_) | WindowError::ProtectedApp(_)
        )
    }
}
