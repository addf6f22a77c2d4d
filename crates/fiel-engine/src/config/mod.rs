pub mod loader;
pub mod locators;
pub mod schema;

pub use loader::{ConfigError, ConfigLoader};
pub use locators::PortalLocators;
pub use schema::{DownloadConfig, FielConfig, PauseConfig, PortalConfig, TimeoutConfig};
