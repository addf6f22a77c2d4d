use crate::error::{ErrorKind, FielError};
use crate::workflow::ArtifactResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Outcome of one run, ready to print or serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunReport {
    Success { path: PathBuf },
    Failure { code: ErrorKind, detail: String },
}

impl RunReport {
    pub fn from_result(result: &Result<ArtifactResult, FielError>) -> Self {
        match result {
            Ok(artifact) => RunReport::Success {
                path: artifact.path.clone(),
            },
            Err(e) => RunReport::failure(e),
        }
    }

    pub fn failure(error: &FielError) -> Self {
        let detail = match error.guidance() {
            Some(hint) => format!("{} {}", error, hint),
            None => error.to_string(),
        };
        RunReport::Failure {
            code: error.kind(),
            detail,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunReport::Success { .. })
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunReport::Success { path } => {
                writeln!(f, "Status: SUCCESS")?;
                writeln!(f, "Message: Constancia generated and saved.")?;
                write!(f, "PDF: {}", path.display())
            }
            RunReport::Failure { code, detail } => {
                writeln!(f, "Status: FAILURE")?;
                writeln!(f, "Code: {}", code)?;
                write!(f, "Detail: {}", detail)
            }
        }
    }
}
