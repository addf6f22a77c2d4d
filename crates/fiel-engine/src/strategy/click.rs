use crate::driver::{Driver, DriverError};
use crate::frames::FrameProbe;
use crate::locator::{LocatorChain, ReadinessMode};
use crate::resolver::Resolver;
use crate::scripts::{CLICK_CANDIDATE_JS, SCRIPT_CLICK_JS, SCROLL_INTO_VIEW_JS, TEXT_CANDIDATES_JS};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Elements that can carry a clickable label on the portal.
pub const TEXT_CANDIDATE_SELECTOR: &str = r#"button,a,[role="button"],input[type="button"],input[type="submit"],div,span,label"#;

/// Both box edges must exceed this many pixels.
const MIN_VISIBLE_EDGE_PX: f64 = 1.0;

/// A text-bearing element as reported by the candidate scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextCandidate {
    pub index: usize,
    pub text: String,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub display: String,
    #[serde(default)]
    pub visibility: String,
    #[serde(default)]
    pub opacity: String,
}

impl TextCandidate {
    pub fn is_visible(&self) -> bool {
        let opaque = self
            .opacity
            .trim()
            .parse::<f64>()
            .map(|o| o > 0.0)
            .unwrap_or(true);
        self.width > MIN_VISIBLE_EDGE_PX
            && self.height > MIN_VISIBLE_EDGE_PX
            && self.visibility != "hidden"
            && self.display != "none"
            && opaque
    }

    /// Case-insensitive containment of any non-blank needle.
    pub fn matches(&self, needles: &[String]) -> bool {
        let text = self.text.trim().to_lowercase();
        needles
            .iter()
            .map(|n| n.trim().to_lowercase())
            .any(|n| !n.is_empty() && text.contains(&n))
    }
}

/// Visible matches in document order.
pub fn visible_matches<'a>(
    candidates: &'a [TextCandidate],
    needles: &'a [String],
) -> impl Iterator<Item = &'a TextCandidate> + 'a {
    candidates
        .iter()
        .filter(move |c| c.is_visible() && c.matches(needles))
}

/// Click the first visible element whose rendered text contains any needle.
///
/// Returns `Ok(false)` when nothing visible matches.
pub async fn click_by_text<D: Driver + ?Sized>(
    driver: &D,
    needles: &[String],
) -> Result<bool, DriverError> {
    let raw = driver
        .execute(TEXT_CANDIDATES_JS, vec![json!(TEXT_CANDIDATE_SELECTOR)])
        .await?;
    let candidates: Vec<TextCandidate> = serde_json::from_value(raw)
        .map_err(|e| DriverError::Script(format!("Unexpected candidate scan result: {}", e)))?;
    debug!(count = candidates.len(), "Scanned text candidates");

    for candidate in visible_matches(&candidates, needles) {
        let clicked = driver
            .execute(
                CLICK_CANDIDATE_JS,
                vec![
                    json!(TEXT_CANDIDATE_SELECTOR),
                    json!(candidate.index),
                    json!(candidate.text),
                ],
            )
            .await?;
        if clicked.as_bool().unwrap_or(false) {
            info!(text = %candidate.text, "Clicked by visible text");
            return Ok(true);
        }
        debug!(index = candidate.index, "Candidate changed before click, trying next");
    }
    Ok(false)
}

/// Native click, falling back to a script click when the driver refuses
/// (overlays, zero-size wrappers).
pub async fn click_with_fallback<D: Driver + ?Sized>(
    driver: &D,
    element: &D::Element,
) -> Result<(), DriverError> {
    if let Err(e) = driver.click(element).await {
        warn!("Native click failed ({}), using script click", e);
        driver.execute_on(SCRIPT_CLICK_JS, element, vec![]).await?;
    }
    Ok(())
}

/// Resolve a chain as interactable in the current context, scroll the hit
/// into view, pause, and click it.
pub struct ChainClick<'a> {
    pub chain: &'a LocatorChain,
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub pause_before_click: Duration,
}

impl ChainClick<'_> {
    pub async fn click_in_current_context<D: Driver + ?Sized>(
        &self,
        driver: &D,
    ) -> Result<bool, DriverError> {
        let resolver = Resolver::new(driver, self.poll_interval);
        let Some(element) = resolver
            .resolve(self.chain, ReadinessMode::Interactable, self.timeout)
            .await
        else {
            return Ok(false);
        };

        if let Err(e) = driver
            .execute_on(SCROLL_INTO_VIEW_JS, &element, vec![])
            .await
        {
            debug!(chain = %self.chain.label, "Scroll into view failed: {}", e);
        }
        sleep(self.pause_before_click).await;
        click_with_fallback(driver, &element).await?;
        info!(chain = %self.chain.label, "Clicked");
        Ok(true)
    }
}

#[async_trait]
impl<D: Driver + ?Sized> FrameProbe<D> for ChainClick<'_> {
    async fn probe(&self, driver: &D) -> Result<bool, DriverError> {
        self.click_in_current_context(driver).await
    }
}
