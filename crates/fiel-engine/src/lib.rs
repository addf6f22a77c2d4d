pub mod config;
pub mod credentials;
pub mod download;
pub mod driver;
pub mod error;
pub mod frames;
pub mod locator;
pub mod report;
pub mod resolver;
pub mod scripts;
pub mod strategy;
pub mod workflow;

pub use credentials::{Credentials, WorkflowInput};
pub use driver::{Driver, DriverError};
pub use error::{ErrorKind, FielError};
pub use locator::{LocatorChain, LocatorSpec, ReadinessMode};
pub use workflow::{ArtifactResult, Workflow, WorkflowState, prepare_input, run_workflow};
