//! Frame-aware search.
//!
//! Every routine here that switches into a frame switches back to the root
//! document before returning, whatever the outcome. The one exception is
//! [`FrameTraverser::enter_login_frame`], whose whole purpose is to leave the
//! login frame current; the workflow restores the root after each step.

use crate::driver::{Driver, DriverError};
use crate::locator::LocatorSpec;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

/// Frames visited by [`FrameTraverser::with_each_frame`].
pub const FRAME_SELECTOR: &str = "iframe, frame";

/// Frames considered by [`FrameTraverser::enter_login_frame`].
pub const LOGIN_FRAME_SELECTOR: &str = "iframe";

/// Input shapes that mark a frame as hosting the login form.
pub const CREDENTIAL_INPUTS_XPATH: &str =
    "//input[@type='text' or @type='email' or @type='password' or @type='file']";

/// An operation run inside one frame at a time.
///
/// `Ok(true)` stops the traversal. `Ok(false)` and `Err` both move on to the
/// next frame.
#[async_trait]
pub trait FrameProbe<D: Driver + ?Sized>: Send + Sync {
    async fn probe(&self, driver: &D) -> Result<bool, DriverError>;
}

pub struct FrameTraverser<'d, D: Driver + ?Sized> {
    driver: &'d D,
    switch_timeout: Duration,
    poll_interval: Duration,
}

impl<'d, D: Driver + ?Sized> FrameTraverser<'d, D> {
    pub fn new(driver: &'d D, switch_timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            driver,
            switch_timeout,
            poll_interval,
        }
    }

    /// Make the first root-level iframe that contains a credential input the
    /// current context. Returns `false`, with the root current, if none does.
    pub async fn enter_login_frame(&self) -> Result<bool, DriverError> {
        self.driver.enter_root().await?;
        let frames = self
            .driver
            .find_all(&LocatorSpec::Css(LOGIN_FRAME_SELECTOR.to_string()))
            .await?;
        let inputs = LocatorSpec::XPath(CREDENTIAL_INPUTS_XPATH.to_string());

        for (index, frame) in frames.iter().enumerate() {
            if let Err(e) = self.driver.enter_frame(frame).await {
                debug!(frame = index, "Skipping frame: {}", e);
                self.driver.enter_root().await?;
                continue;
            }
            match self.driver.find_all(&inputs).await {
                Ok(found) if !found.is_empty() => {
                    info!(frame = index, "Entered login frame");
                    return Ok(true);
                }
                Ok(_) => {}
                Err(e) => debug!(frame = index, "Credential probe failed: {}", e),
            }
            self.driver.enter_root().await?;
        }

        debug!("No login frame found, staying in root document");
        Ok(false)
    }

    /// Run `probe` inside each root-level frame in document order until one
    /// reports success. The root document is current again on return.
    pub async fn with_each_frame<P>(&self, probe: &P) -> Result<bool, DriverError>
    where
        P: FrameProbe<D> + ?Sized,
    {
        self.driver.enter_root().await?;
        let frames = self
            .driver
            .find_all(&LocatorSpec::Css(FRAME_SELECTOR.to_string()))
            .await?;
        debug!(count = frames.len(), "Traversing frames");

        for (index, frame) in frames.iter().enumerate() {
            let outcome = match self.switch_into(frame).await {
                Ok(()) => probe.probe(self.driver).await,
                Err(e) => Err(e),
            };
            self.driver.enter_root().await?;

            match outcome {
                Ok(true) => {
                    debug!(frame = index, "Frame probe succeeded");
                    return Ok(true);
                }
                Ok(false) => debug!(frame = index, "Frame probe found nothing"),
                Err(e) => debug!(frame = index, "Frame skipped: {}", e),
            }
        }
        Ok(false)
    }

    /// Enter `frame`, retrying until it becomes available or the switch
    /// timeout elapses.
    async fn switch_into(&self, frame: &D::Element) -> Result<(), DriverError> {
        let deadline = Instant::now() + self.switch_timeout;
        loop {
            match self.driver.enter_frame(frame).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(e);
                    }
                    self.driver.enter_root().await?;
                    sleep(self.poll_interval.min(deadline - now)).await;
                }
            }
        }
    }
}
