use crate::error::FielError;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The e.firma credential pair and the private key's passphrase.
#[derive(Clone)]
pub struct Credentials {
    pub certificate: PathBuf,
    pub private_key: PathBuf,
    pub passphrase: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("certificate", &self.certificate)
            .field("private_key", &self.private_key)
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(
        certificate: impl Into<PathBuf>,
        private_key: impl Into<PathBuf>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            certificate: certificate.into(),
            private_key: private_key.into(),
            passphrase: passphrase.into(),
        }
    }

    /// Both files must exist and be readable. Returns a copy with absolute
    /// paths, which is what file inputs need.
    pub fn validate(&self) -> Result<Credentials, FielError> {
        Ok(Credentials {
            certificate: readable_file(&self.certificate)?,
            private_key: readable_file(&self.private_key)?,
            passphrase: self.passphrase.clone(),
        })
    }
}

fn readable_file(path: &Path) -> Result<PathBuf, FielError> {
    let invalid = || FielError::InvalidCredentialPath {
        path: path.to_path_buf(),
    };
    let absolute = std::path::absolute(path).map_err(|_| invalid())?;
    if !absolute.is_file() {
        return Err(invalid());
    }
    File::open(&absolute).map_err(|_| invalid())?;
    Ok(absolute)
}

/// Everything a single run needs besides configuration.
#[derive(Debug, Clone)]
pub struct WorkflowInput {
    pub credentials: Credentials,
    pub download_dir: PathBuf,
}
