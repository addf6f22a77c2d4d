use super::locators::PortalLocators;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FielConfig {
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub pauses: PauseConfig,
    #[serde(default)]
    pub portal: PortalConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub locators: PortalLocators,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Page-level waits: login surface, authenticated return.
    #[serde(default = "default_global_ms")]
    pub global_ms: u64,
    /// Per locator in a chain.
    #[serde(default = "default_element_ms")]
    pub element_ms: u64,
    #[serde(default = "default_frame_switch_ms")]
    pub frame_switch_ms: u64,
    #[serde(default = "default_new_window_ms")]
    pub new_window_ms: u64,
    #[serde(default = "default_download_ms")]
    pub download_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_download_poll_ms")]
    pub download_poll_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            global_ms: default_global_ms(),
            element_ms: default_element_ms(),
            frame_switch_ms: default_frame_switch_ms(),
            new_window_ms: default_new_window_ms(),
            download_ms: default_download_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            download_poll_ms: default_download_poll_ms(),
        }
    }
}

impl TimeoutConfig {
    pub fn global(&self) -> Duration {
        Duration::from_millis(self.global_ms)
    }

    pub fn element(&self) -> Duration {
        Duration::from_millis(self.element_ms)
    }

    pub fn frame_switch(&self) -> Duration {
        Duration::from_millis(self.frame_switch_ms)
    }

    pub fn new_window(&self) -> Duration {
        Duration::from_millis(self.new_window_ms)
    }

    pub fn download(&self) -> Duration {
        Duration::from_millis(self.download_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn download_poll(&self) -> Duration {
        Duration::from_millis(self.download_poll_ms)
    }
}

fn default_global_ms() -> u64 {
    60000
}

fn default_element_ms() -> u64 {
    12000
}

fn default_frame_switch_ms() -> u64 {
    5000
}

fn default_new_window_ms() -> u64 {
    15000
}

fn default_download_ms() -> u64 {
    120000
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_download_poll_ms() -> u64 {
    1000
}

/// Settle delays that give the portal's scripts time to react.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PauseConfig {
    #[serde(default = "default_after_method_click_ms")]
    pub after_method_click_ms: u64,
    #[serde(default = "default_after_method_select_ms")]
    pub after_method_select_ms: u64,
    #[serde(default = "default_after_upload_ms")]
    pub after_upload_ms: u64,
    #[serde(default = "default_after_submit_ms")]
    pub after_submit_ms: u64,
    #[serde(default = "default_before_click_ms")]
    pub before_click_ms: u64,
    #[serde(default = "default_after_scroll_ms")]
    pub after_scroll_ms: u64,
}

impl Default for PauseConfig {
    fn default() -> Self {
        Self {
            after_method_click_ms: default_after_method_click_ms(),
            after_method_select_ms: default_after_method_select_ms(),
            after_upload_ms: default_after_upload_ms(),
            after_submit_ms: default_after_submit_ms(),
            before_click_ms: default_before_click_ms(),
            after_scroll_ms: default_after_scroll_ms(),
        }
    }
}

impl PauseConfig {
    pub fn after_method_click(&self) -> Duration {
        Duration::from_millis(self.after_method_click_ms)
    }

    pub fn after_method_select(&self) -> Duration {
        Duration::from_millis(self.after_method_select_ms)
    }

    pub fn after_upload(&self) -> Duration {
        Duration::from_millis(self.after_upload_ms)
    }

    pub fn after_submit(&self) -> Duration {
        Duration::from_millis(self.after_submit_ms)
    }

    pub fn before_click(&self) -> Duration {
        Duration::from_millis(self.before_click_ms)
    }

    pub fn after_scroll(&self) -> Duration {
        Duration::from_millis(self.after_scroll_ms)
    }
}

fn default_after_method_click_ms() -> u64 {
    1000
}

fn default_after_method_select_ms() -> u64 {
    1500
}

fn default_after_upload_ms() -> u64 {
    300
}

fn default_after_submit_ms() -> u64 {
    2000
}

fn default_before_click_ms() -> u64 {
    800
}

fn default_after_scroll_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default = "default_login_url")]
    pub login_url: String,
    /// Landing page with the "run online" link, used when the login URL
    /// does not redirect to the login surface.
    #[serde(default = "default_landing_url")]
    pub landing_url: String,
    #[serde(default = "default_login_url_markers")]
    pub login_url_markers: Vec<String>,
    /// Substring of the module URL the portal returns to after login.
    #[serde(default = "default_home_url_marker")]
    pub home_url_marker: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            login_url: default_login_url(),
            landing_url: default_landing_url(),
            login_url_markers: default_login_url_markers(),
            home_url_marker: default_home_url_marker(),
        }
    }
}

fn default_login_url() -> String {
    "https://wwwmat.sat.gob.mx/aplicacion/login/53027/genera-tu-constancia-de-situacion-fiscal"
        .to_string()
}

fn default_landing_url() -> String {
    "https://wwwmat.sat.gob.mx/aplicacion/53027/genera-tu-constancia-de-situacion-fiscal"
        .to_string()
}

fn default_login_url_markers() -> Vec<String> {
    vec!["login".to_string(), "nidp".to_string()]
}

fn default_home_url_marker() -> String {
    "genera-tu-constancia-de-situacion-fiscal".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_partial_marker")]
    pub partial_marker: String,
    #[serde(default = "default_final_name")]
    pub final_name: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            partial_marker: default_partial_marker(),
            final_name: default_final_name(),
        }
    }
}

fn default_extension() -> String {
    ".pdf".to_string()
}

fn default_partial_marker() -> String {
    ".crdownload".to_string()
}

fn default_final_name() -> String {
    "constancia_sat.pdf".to_string()
}
