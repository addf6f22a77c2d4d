use crate::driver::{Driver, DriverError};
use crate::frames::{FrameProbe, FrameTraverser};
use crate::locator::{LocatorChain, ReadinessMode};
use crate::resolver::Resolver;
use crate::scripts::REVEAL_FILE_INPUT_JS;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Injects an absolute path into a file input found through `chain`.
///
/// Inputs only need to exist: the portal styles them hidden, so each hit is
/// forced visible and enabled before the path is typed into it. The path is
/// sent through the driver's native key input because browsers reject
/// scripted value assignment on file inputs.
pub struct FileUpload<'a> {
    pub chain: &'a LocatorChain,
    pub path: &'a Path,
    pub probe_timeout: Duration,
    pub poll_interval: Duration,
    pub pause_after: Duration,
}

impl FileUpload<'_> {
    /// Try the current context, then every frame of the root document.
    pub async fn run<D: Driver + ?Sized>(
        &self,
        driver: &D,
        frames: &FrameTraverser<'_, D>,
    ) -> Result<bool, DriverError> {
        if self.upload_in_current_context(driver).await? {
            return Ok(true);
        }
        debug!(chain = %self.chain.label, "No file input in current context, trying frames");
        frames.with_each_frame(self).await
    }

    pub async fn upload_in_current_context<D: Driver + ?Sized>(
        &self,
        driver: &D,
    ) -> Result<bool, DriverError> {
        let resolver = Resolver::new(driver, self.poll_interval);
        let path = self.path.display().to_string();

        for spec in self.chain.iter() {
            let Some(input) = resolver
                .wait_for(spec, ReadinessMode::Present, self.probe_timeout)
                .await
            else {
                continue;
            };
            match self.inject(driver, &input, &path).await {
                Ok(()) => {
                    info!(chain = %self.chain.label, locator = %spec, "File injected");
                    sleep(self.pause_after).await;
                    return Ok(true);
                }
                Err(e) => debug!(locator = %spec, "Injection failed: {}", e),
            }
        }
        Ok(false)
    }

    async fn inject<D: Driver + ?Sized>(
        &self,
        driver: &D,
        input: &D::Element,
        path: &str,
    ) -> Result<(), DriverError> {
        driver
            .execute_on(REVEAL_FILE_INPUT_JS, input, vec![])
            .await?;
        driver.send_keys(input, path).await
    }
}

#[async_trait]
impl<D: Driver + ?Sized> FrameProbe<D> for FileUpload<'_> {
    async fn probe(&self, driver: &D) -> Result<bool, DriverError> {
        self.upload_in_current_context(driver).await
    }
}
