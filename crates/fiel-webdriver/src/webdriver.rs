use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::wd::WindowHandle;
use fantoccini::{Client, ClientBuilder, Locator};
use fiel_engine::driver::{Driver, DriverError};
use fiel_engine::error::FielError;
use fiel_engine::locator::LocatorSpec;
use serde_json::{Map, Value};
use tracing::{debug, info};

/// True when the element's centre point hits the element itself or a
/// descendant. Points outside the viewport are not treated as covered.
const HIT_TEST_JS: &str = r#"
    const el = arguments[0];
    const r = el.getBoundingClientRect();
    if (r.width === 0 || r.height === 0) return false;
    const x = r.left + r.width / 2;
    const y = r.top + r.height / 2;
    if (x < 0 || y < 0 || x > window.innerWidth || y > window.innerHeight) return true;
    const hit = document.elementFromPoint(x, y);
    return !!hit && (hit === el || el.contains(hit));
"#;

pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    pub async fn connect(url: &str, capabilities: Map<String, Value>) -> Result<Self, FielError> {
        let status_url = format!("{}/status", url.trim_end_matches('/'));
        match reqwest::get(&status_url).await {
            Ok(resp) if resp.status().is_success() => debug!("WebDriver at {} is up", url),
            Ok(resp) => {
                return Err(FielError::DriverInit(format!(
                    "WebDriver at {} answered {}",
                    url,
                    resp.status()
                )));
            }
            Err(e) => {
                return Err(FielError::DriverInit(format!(
                    "No WebDriver reachable at {}: {}",
                    url, e
                )));
            }
        }

        let client = ClientBuilder::native()
            .capabilities(capabilities)
            .connect(url)
            .await
            .map_err(|e| {
                FielError::DriverInit(format!("Failed to connect to WebDriver at {}: {}", url, e))
            })?;
        info!("WebDriver session started at {}", url);

        Ok(Self { client })
    }
}

fn command(e: CmdError) -> DriverError {
    DriverError::Command(e.to_string())
}

fn script(e: CmdError) -> DriverError {
    DriverError::Script(e.to_string())
}

fn window(e: CmdError) -> DriverError {
    DriverError::Window(e.to_string())
}

fn element_arg(element: &Element) -> Result<Value, DriverError> {
    serde_json::to_value(element).map_err(|e| DriverError::Script(e.to_string()))
}

#[async_trait]
impl Driver for WebDriverSession {
    type Element = Element;

    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        info!("Navigating to: {}", url);
        self.client.goto(url).await.map_err(command)
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        self.client
            .current_url()
            .await
            .map(|u| u.to_string())
            .map_err(command)
    }

    async fn find_all(&self, locator: &LocatorSpec) -> Result<Vec<Element>, DriverError> {
        let found = match locator {
            LocatorSpec::Id(v) => self.client.find_all(Locator::Id(v)).await,
            LocatorSpec::Name(v) => {
                let selector = LocatorSpec::name_selector(v);
                self.client.find_all(Locator::Css(&selector)).await
            }
            LocatorSpec::Css(v) => self.client.find_all(Locator::Css(v)).await,
            LocatorSpec::XPath(v) => self.client.find_all(Locator::XPath(v)).await,
            LocatorSpec::LinkText(v) => self.client.find_all(Locator::LinkText(v)).await,
        };
        found.map_err(command)
    }

    async fn is_interactable(&self, element: &Element) -> Result<bool, DriverError> {
        if !element.is_displayed().await.map_err(command)? {
            return Ok(false);
        }
        if !element.is_enabled().await.map_err(command)? {
            return Ok(false);
        }
        let hit = self
            .client
            .execute(HIT_TEST_JS, vec![element_arg(element)?])
            .await
            .map_err(script)?;
        Ok(hit.as_bool().unwrap_or(false))
    }

    async fn click(&self, element: &Element) -> Result<(), DriverError> {
        element.click().await.map_err(command)
    }

    async fn clear(&self, element: &Element) -> Result<(), DriverError> {
        element.clear().await.map_err(command)
    }

    async fn send_keys(&self, element: &Element, text: &str) -> Result<(), DriverError> {
        element.send_keys(text).await.map_err(command)
    }

    async fn execute(&self, js: &str, args: Vec<Value>) -> Result<Value, DriverError> {
        self.client.execute(js, args).await.map_err(script)
    }

    async fn execute_on(
        &self,
        js: &str,
        element: &Element,
        args: Vec<Value>,
    ) -> Result<Value, DriverError> {
        let mut all = Vec::with_capacity(args.len() + 1);
        all.push(element_arg(element)?);
        all.extend(args);
        self.client.execute(js, all).await.map_err(script)
    }

    async fn enter_frame(&self, element: &Element) -> Result<(), DriverError> {
        element
            .enter_frame()
            .await
            .map_err(|e| DriverError::Frame(e.to_string()))
    }

    async fn enter_root(&self) -> Result<(), DriverError> {
        self.client
            .enter_frame(None)
            .await
            .map_err(|e| DriverError::Frame(e.to_string()))
    }

    async fn window(&self) -> Result<String, DriverError> {
        self.client.window().await.map(String::from).map_err(window)
    }

    async fn windows(&self) -> Result<Vec<String>, DriverError> {
        let handles = self.client.windows().await.map_err(window)?;
        Ok(handles.into_iter().map(String::from).collect())
    }

    async fn switch_to_window(&self, handle: &str) -> Result<(), DriverError> {
        let handle = WindowHandle::try_from(handle.to_string())
            .map_err(|e| DriverError::Window(e.to_string()))?;
        self.client.switch_to_window(handle).await.map_err(window)
    }

    async fn close_window(&self) -> Result<(), DriverError> {
        self.client.close_window().await.map_err(window)
    }

    async fn quit(&self) -> Result<(), DriverError> {
        self.client
            .clone()
            .close()
            .await
            .map_err(|e| DriverError::Session(e.to_string()))
    }
}
