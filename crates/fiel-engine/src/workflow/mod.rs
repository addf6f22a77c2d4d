//! The login → generate → download sequence.
//!
//! A run is a closed chain of guarded steps. Each guard is one engine call
//! (resolver, frame traverser, strategy, watcher); the first failing guard
//! ends the run. Frame switches made inside a step are undone before the
//! next step starts.

pub mod state;

pub use state::{ArtifactResult, WorkflowState};

use crate::config::FielConfig;
use crate::credentials::{Credentials, WorkflowInput};
use crate::download::{ArtifactFilter, DownloadSnapshot, DownloadWatcher, promote_artifact};
use crate::driver::Driver;
use crate::error::FielError;
use crate::frames::FrameTraverser;
use crate::locator::{LocatorChain, ReadinessMode};
use crate::resolver::Resolver;
use crate::scripts::SCROLL_HORIZONTAL_JS;
use crate::strategy::{ChainClick, FileUpload, click_by_text, click_with_fallback};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

pub struct Workflow<'a, D: Driver + ?Sized> {
    driver: &'a D,
    config: &'a FielConfig,
    input: &'a WorkflowInput,
    state: WorkflowState,
    main_window: Option<String>,
    known_downloads: DownloadSnapshot,
    artifact: Option<ArtifactResult>,
}

impl<'a, D: Driver + ?Sized> Workflow<'a, D> {
    pub fn new(driver: &'a D, config: &'a FielConfig, input: &'a WorkflowInput) -> Self {
        Self {
            driver,
            config,
            input,
            state: WorkflowState::Initial,
            main_window: None,
            known_downloads: DownloadSnapshot::default(),
            artifact: None,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Window that was current when generation was triggered.
    pub fn main_window(&self) -> Option<&str> {
        self.main_window.as_deref()
    }

    /// Drive the run to a terminal state.
    pub async fn run(&mut self) -> Result<ArtifactResult, FielError> {
        while let Some(next) = self.state.successor() {
            let outcome = match self.state {
                WorkflowState::Initial => self.reach_login_surface().await,
                WorkflowState::OnLoginSurface => self.select_method().await,
                WorkflowState::MethodSelected => self.upload_credentials().await,
                WorkflowState::CredentialsUploaded => self.authenticate().await,
                WorkflowState::Authenticated => self.trigger_generation().await,
                WorkflowState::GenerationTriggered => self.resolve_new_context().await,
                WorkflowState::NewContextResolved => self.collect_artifact().await,
                WorkflowState::ArtifactDownloaded | WorkflowState::Failed => break,
            };

            if let Err(e) = self.driver.enter_root().await {
                debug!("Could not restore root context: {}", e);
            }

            match outcome {
                Ok(()) => {
                    info!(from = %self.state, to = %next, "Transition");
                    self.state = next;
                }
                Err(e) => {
                    warn!(at = %self.state, "Workflow failed: {}", e);
                    self.state = WorkflowState::Failed;
                    return Err(e);
                }
            }
        }

        match (&self.state, &self.artifact) {
            (WorkflowState::ArtifactDownloaded, Some(artifact)) => Ok(artifact.clone()),
            _ => Err(FielError::Aborted),
        }
    }

    fn resolver(&self) -> Resolver<'a, D> {
        Resolver::new(self.driver, self.config.timeouts.poll_interval())
    }

    fn frames(&self) -> FrameTraverser<'a, D> {
        FrameTraverser::new(
            self.driver,
            self.config.timeouts.frame_switch(),
            self.config.timeouts.poll_interval(),
        )
    }

    fn credentials(&self) -> &Credentials {
        &self.input.credentials
    }

    async fn reach_login_surface(&mut self) -> Result<(), FielError> {
        let portal = &self.config.portal;
        let global = self.config.timeouts.global();
        let on_login = |url: &str| portal.login_url_markers.iter().any(|m| url.contains(m));

        info!(url = %portal.login_url, "Opening login page");
        self.driver.goto(&portal.login_url).await?;
        if self.wait_for_url(on_login, global).await {
            return Ok(());
        }

        warn!(url = %portal.landing_url, "Login redirect not observed, going through landing page");
        self.driver.goto(&portal.landing_url).await?;
        let link = self
            .resolver()
            .resolve(
                &self.config.locators.run_online_link,
                ReadinessMode::Interactable,
                global,
            )
            .await
            .ok_or_else(|| not_found(&self.config.locators.run_online_link))?;
        click_with_fallback(self.driver, &link).await?;

        if self.wait_for_url(on_login, global).await {
            Ok(())
        } else {
            Err(FielError::LoginSurfaceTimeout { timeout: global })
        }
    }

    async fn select_method(&mut self) -> Result<(), FielError> {
        let locators = &self.config.locators;
        let pauses = &self.config.pauses;
        self.frames().enter_login_frame().await?;

        // The tab is either already rendered or not coming; no per-locator wait.
        let tab = self
            .resolver()
            .resolve(&locators.method_tab, ReadinessMode::Present, Duration::ZERO)
            .await;

        if let Some(tab) = tab {
            click_with_fallback(self.driver, &tab).await?;
            info!("Authentication method selected by locator");
        } else if click_by_text(self.driver, &locators.method_needles).await? {
            info!("Authentication method selected by visible text");
        } else {
            return Err(not_found(&locators.method_tab));
        }

        sleep(pauses.after_method_click()).await;
        sleep(pauses.after_method_select()).await;
        Ok(())
    }

    async fn upload_credentials(&mut self) -> Result<(), FielError> {
        let locators = &self.config.locators;
        let credentials = self.credentials();
        self.upload(&locators.certificate_input, &credentials.certificate, "certificate")
            .await?;
        self.upload(&locators.key_input, &credentials.private_key, "private key")
            .await
    }

    async fn upload(&self, chain: &LocatorChain, path: &Path, what: &str) -> Result<(), FielError> {
        let frames = self.frames();
        frames.enter_login_frame().await?;

        let upload = FileUpload {
            chain,
            path,
            probe_timeout: Duration::ZERO,
            poll_interval: self.config.timeouts.poll_interval(),
            pause_after: self.config.pauses.after_upload(),
        };
        if upload.run(self.driver, &frames).await? {
            Ok(())
        } else {
            Err(FielError::UploadFailed {
                what: what.to_string(),
            })
        }
    }

    async fn authenticate(&mut self) -> Result<(), FielError> {
        let locators = &self.config.locators;
        let timeouts = &self.config.timeouts;
        let resolver = self.resolver();
        self.frames().enter_login_frame().await?;

        let password = resolver
            .resolve(
                &locators.password_input,
                ReadinessMode::Present,
                timeouts.element(),
            )
            .await
            .ok_or_else(|| not_found(&locators.password_input))?;
        self.driver.clear(&password).await?;
        self.driver
            .send_keys(&password, &self.credentials().passphrase)
            .await?;

        let sign = resolver
            .resolve(
                &locators.sign_button,
                ReadinessMode::Interactable,
                timeouts.element(),
            )
            .await
            .ok_or_else(|| not_found(&locators.sign_button))?;
        click_with_fallback(self.driver, &sign).await?;
        sleep(self.config.pauses.after_submit()).await;
        self.driver.enter_root().await?;

        let portal = &self.config.portal;
        let returned = |url: &str| {
            url.contains(&portal.home_url_marker)
                && !portal.login_url_markers.iter().any(|m| url.contains(m))
        };
        if self.wait_for_url(returned, timeouts.global()).await {
            info!("Signed in with e.firma");
            Ok(())
        } else {
            Err(FielError::AuthenticationTimeout {
                marker: portal.home_url_marker.clone(),
                timeout: timeouts.global(),
            })
        }
    }

    async fn trigger_generation(&mut self) -> Result<(), FielError> {
        // Taken before the click so a fast download still counts as new.
        self.known_downloads = DownloadSnapshot::capture(&self.input.download_dir).await;

        if let Err(e) = self.driver.execute(SCROLL_HORIZONTAL_JS, vec![]).await {
            debug!("Horizontal scroll failed: {}", e);
        }
        sleep(self.config.pauses.after_scroll()).await;
        self.main_window = Some(self.driver.window().await?);

        let chain = &self.config.locators.generate_button;
        let click = ChainClick {
            chain,
            timeout: self.config.timeouts.element(),
            poll_interval: self.config.timeouts.poll_interval(),
            pause_before_click: self.config.pauses.before_click(),
        };

        self.driver.enter_root().await?;
        if click.click_in_current_context(self.driver).await? {
            return Ok(());
        }
        debug!("Generate button not in root document, searching frames");
        if self.frames().with_each_frame(&click).await? {
            return Ok(());
        }
        Err(not_found(chain))
    }

    async fn resolve_new_context(&mut self) -> Result<(), FielError> {
        let timeouts = &self.config.timeouts;
        let deadline = Instant::now() + timeouts.new_window();
        let main = self.main_window.clone();

        let opened = loop {
            if let Ok(handles) = self.driver.windows().await
                && let Some(handle) = handles.into_iter().find(|h| Some(h) != main.as_ref())
            {
                break Some(handle);
            }
            let now = Instant::now();
            if now >= deadline {
                break None;
            }
            sleep(timeouts.poll_interval().min(deadline - now)).await;
        };

        match opened {
            Some(handle) => {
                self.driver.switch_to_window(&handle).await?;
                let url = self.driver.current_url().await.unwrap_or_default();
                info!(%url, "Switched to newly opened window");
            }
            None => info!("No new window opened, staying in main window"),
        }
        Ok(())
    }

    async fn collect_artifact(&mut self) -> Result<(), FielError> {
        let download = &self.config.download;
        let dir = &self.input.download_dir;
        let filter = ArtifactFilter::new(&download.extension, &download.partial_marker);

        let downloaded = DownloadWatcher::new(self.config.timeouts.download_poll())
            .await_new_artifact(
                dir,
                &self.known_downloads,
                &filter,
                self.config.timeouts.download(),
            )
            .await?;
        let path = promote_artifact(&downloaded, &dir.join(&download.final_name)).await?;
        info!(path = %path.display(), "Artifact saved");
        self.artifact = Some(ArtifactResult { path });
        Ok(())
    }

    /// Poll the top-level URL until `accept` holds or `timeout` elapses.
    async fn wait_for_url<F>(&self, accept: F, timeout: Duration) -> bool
    where
        F: Fn(&str) -> bool,
    {
        let deadline = Instant::now() + timeout;
        let poll = self.config.timeouts.poll_interval();
        loop {
            match self.driver.current_url().await {
                Ok(url) if accept(&url) => return true,
                Ok(url) => debug!(%url, "Waiting for URL change"),
                Err(e) => debug!("Could not read URL: {}", e),
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            sleep(poll.min(deadline - now)).await;
        }
    }
}

fn not_found(chain: &LocatorChain) -> FielError {
    FielError::ElementNotFound {
        chain: chain.label.clone(),
    }
}

/// Validate credentials and make sure the download directory exists.
///
/// Runs before any browser session is opened so that a bad path never
/// costs a browser launch.
pub fn prepare_input(
    credentials: &Credentials,
    download_dir: &Path,
) -> Result<WorkflowInput, FielError> {
    let credentials = credentials.validate()?;
    std::fs::create_dir_all(download_dir)?;
    let download_dir: PathBuf = std::path::absolute(download_dir)?;
    Ok(WorkflowInput {
        credentials,
        download_dir,
    })
}

/// Run the workflow once and tear the session down on every exit path.
pub async fn run_workflow<D: Driver + ?Sized>(
    driver: &D,
    config: &FielConfig,
    input: &WorkflowInput,
) -> Result<ArtifactResult, FielError> {
    let mut workflow = Workflow::new(driver, config, input);
    let result = workflow.run().await;
    let main_window = workflow.main_window().map(str::to_string);
    teardown(driver, main_window.as_deref()).await;
    result
}

async fn teardown<D: Driver + ?Sized>(driver: &D, main_window: Option<&str>) {
    if let Some(main) = main_window
        && let (Ok(handles), Ok(current)) = (driver.windows().await, driver.window().await)
        && handles.len() > 1
        && current != main
    {
        if let Err(e) = driver.close_window().await {
            debug!("Could not close secondary window: {}", e);
        } else if let Err(e) = driver.switch_to_window(main).await {
            debug!("Could not return to main window: {}", e);
        }
    }

    if let Err(e) = driver.quit().await {
        warn!("Failed to end browser session: {}", e);
    }
}
