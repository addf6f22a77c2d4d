//! Locator chain resolution with bounded waits.

use crate::driver::Driver;
use crate::locator::{LocatorChain, LocatorSpec, ReadinessMode};
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::debug;

/// Walks a [`LocatorChain`] in order, giving each spec up to its own timeout.
///
/// Resolution never caches: every call queries the live document, so a
/// reference gone stale after a navigation is never handed out twice.
pub struct Resolver<'d, D: Driver + ?Sized> {
    driver: &'d D,
    poll_interval: Duration,
}

impl<'d, D: Driver + ?Sized> Resolver<'d, D> {
    pub fn new(driver: &'d D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    /// First element satisfying `mode` for the earliest spec in `chain` that
    /// produces one, or `None` once every spec has had its full wait.
    pub async fn resolve(
        &self,
        chain: &LocatorChain,
        mode: ReadinessMode,
        per_locator_timeout: Duration,
    ) -> Option<D::Element> {
        for spec in chain.iter() {
            if let Some(element) = self.wait_for(spec, mode, per_locator_timeout).await {
                debug!(chain = %chain.label, locator = %spec, ?mode, "Locator matched");
                return Some(element);
            }
            debug!(chain = %chain.label, locator = %spec, ?mode, "Locator timed out");
        }
        None
    }

    /// Poll a single spec until `mode` is met or `timeout` elapses.
    ///
    /// A zero timeout checks exactly once.
    pub async fn wait_for(
        &self,
        spec: &LocatorSpec,
        mode: ReadinessMode,
        timeout: Duration,
    ) -> Option<D::Element> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(element) = self.probe(spec, mode).await {
                return Some(element);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            sleep(self.poll_interval.min(deadline - now)).await;
        }
    }

    async fn probe(&self, spec: &LocatorSpec, mode: ReadinessMode) -> Option<D::Element> {
        let elements = match self.driver.find_all(spec).await {
            Ok(elements) => elements,
            Err(e) => {
                debug!(locator = %spec, "Lookup failed: {}", e);
                return None;
            }
        };

        match mode {
            ReadinessMode::Present => elements.into_iter().next(),
            ReadinessMode::Interactable => {
                for element in elements {
                    // A stale or detached element just means "not yet".
                    if let Ok(true) = self.driver.is_interactable(&element).await {
                        return Some(element);
                    }
                }
                None
            }
        }
    }
}
