use crate::config::loader::ConfigError;
use crate::driver::DriverError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum FielError {
    #[error("Credential file missing or unreadable: {}", path.display())]
    InvalidCredentialPath { path: PathBuf },

    #[error("No element matched '{chain}'")]
    ElementNotFound { chain: String },

    #[error("No file input accepted the {what} file")]
    UploadFailed { what: String },

    #[error("Login page not reached within {timeout:?}")]
    LoginSurfaceTimeout { timeout: Duration },

    #[error("Authenticated return to '{marker}' not observed within {timeout:?}")]
    AuthenticationTimeout { marker: String, timeout: Duration },

    #[error("No download appeared in {} within {timeout:?}", dir.display())]
    DownloadTimeout { dir: PathBuf, timeout: Duration },

    #[error("Run already failed; start a new one")]
    Aborted,

    #[error("Failed to start WebDriver session: {0}")]
    DriverInit(String),

    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Reporting taxonomy. Codes are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidCredentialPath,
    ElementNotFound,
    FrameNotFound,
    UploadFailed,
    LoginSurfaceTimeout,
    AuthenticationTimeout,
    DownloadTimeout,
    Aborted,
    DriverInitError,
    DriverError,
    IoError,
    ConfigError,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidCredentialPath => "InvalidCredentialPath",
            ErrorKind::ElementNotFound => "ElementNotFound",
            ErrorKind::FrameNotFound => "FrameNotFound",
            ErrorKind::UploadFailed => "UploadFailed",
            ErrorKind::LoginSurfaceTimeout => "LoginSurfaceTimeout",
            ErrorKind::AuthenticationTimeout => "AuthenticationTimeout",
            ErrorKind::DownloadTimeout => "DownloadTimeout",
            ErrorKind::Aborted => "Aborted",
            ErrorKind::DriverInitError => "DriverInitError",
            ErrorKind::DriverError => "DriverError",
            ErrorKind::IoError => "IoError",
            ErrorKind::ConfigError => "ConfigError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FielError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FielError::InvalidCredentialPath { .. } => ErrorKind::InvalidCredentialPath,
            FielError::ElementNotFound { .. } => ErrorKind::ElementNotFound,
            FielError::UploadFailed { .. } => ErrorKind::UploadFailed,
            FielError::LoginSurfaceTimeout { .. } => ErrorKind::LoginSurfaceTimeout,
            FielError::AuthenticationTimeout { .. } => ErrorKind::AuthenticationTimeout,
            FielError::DownloadTimeout { .. } => ErrorKind::DownloadTimeout,
            FielError::Aborted => ErrorKind::Aborted,
            FielError::DriverInit(_) => ErrorKind::DriverInitError,
            FielError::Driver(DriverError::Frame(_)) => ErrorKind::FrameNotFound,
            FielError::Driver(_) => ErrorKind::DriverError,
            FielError::Io(_) => ErrorKind::IoError,
            FielError::Config(_) => ErrorKind::ConfigError,
        }
    }

    /// What the operator can do about it, when there is something to do.
    pub fn guidance(&self) -> Option<&'static str> {
        match self.kind() {
            ErrorKind::InvalidCredentialPath => Some(
                "Check that the certificate and key paths are absolute and that both files exist.",
            ),
            ErrorKind::ElementNotFound | ErrorKind::FrameNotFound | ErrorKind::UploadFailed => {
                Some("The portal may have changed its page structure; review the locator chains.")
            }
            ErrorKind::DriverInitError => Some(
                "Make sure Google Chrome is installed and ChromeDriver is running and reachable at the WebDriver URL.",
            ),
            _ => None,
        }
    }
}
