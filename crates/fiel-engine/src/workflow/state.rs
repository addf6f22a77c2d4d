use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Position of a run in the fixed login-to-download sequence.
///
/// Each state has exactly one successor; any failed guard moves the run to
/// [`WorkflowState::Failed`] and ends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowState {
    Initial,
    OnLoginSurface,
    MethodSelected,
    CredentialsUploaded,
    Authenticated,
    GenerationTriggered,
    NewContextResolved,
    ArtifactDownloaded,
    Failed,
}

impl WorkflowState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkflowState::ArtifactDownloaded | WorkflowState::Failed
        )
    }

    /// The state a successful guard leads to.
    pub fn successor(&self) -> Option<WorkflowState> {
        use WorkflowState::*;
        match self {
            Initial => Some(OnLoginSurface),
            OnLoginSurface => Some(MethodSelected),
            MethodSelected => Some(CredentialsUploaded),
            CredentialsUploaded => Some(Authenticated),
            Authenticated => Some(GenerationTriggered),
            GenerationTriggered => Some(NewContextResolved),
            NewContextResolved => Some(ArtifactDownloaded),
            ArtifactDownloaded | Failed => None,
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The renamed artifact of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactResult {
    pub path: PathBuf,
}
