//! Live browser control over the WebDriver protocol.
//! Gated behind the "webdriver" feature flag.
//!
//! fantoccini is async; the session owns a single-threaded runtime and blocks
//! on each command so the fill pass stays a plain synchronous loop.

use crate::driver::{DriverError, FormDriver};
use fantoccini::elements::Element;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Map, Value};
use std::str::FromStr;
use tokio::runtime::Runtime;
use tracing::{debug, info};

const FORM_CONTROLS_XPATH: &str = "//input | //textarea | //select";
const SET_VALUE_SCRIPT: &str = "arguments[0].value = arguments[1];";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Browser {
    Chrome,
    Firefox,
}

impl FromStr for Browser {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chrome" | "chromium" => Ok(Browser::Chrome),
            "firefox" => Ok(Browser::Firefox),
            other => Err(SessionError::UnsupportedBrowser(other.to_string())),
        }
    }
}

/// Where and how to launch the browser.
#[derive(Debug, Clone)]
pub struct WebDriverConfig {
    /// Address of the running chromedriver / geckodriver.
    pub url: String,
    pub browser: Browser,
    pub headless: bool,
    pub start_maximized: bool,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9515".to_string(),
            browser: Browser::Chrome,
            headless: false,
            start_maximized: true,
        }
    }
}

impl WebDriverConfig {
    fn capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        match self.browser {
            Browser::Chrome => {
                let mut args = Vec::new();
                if self.start_maximized {
                    args.push("--start-maximized");
                }
                if self.headless {
                    args.push("--headless=new");
                }
                caps.insert("browserName".to_string(), json!("chrome"));
                caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
            }
            Browser::Firefox => {
                let args: Vec<&str> = if self.headless { vec!["-headless"] } else { Vec::new() };
                caps.insert("browserName".to_string(), json!("firefox"));
                caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
            }
        }
        caps
    }
}

/// A browser window driven through WebDriver.
pub struct WebDriverSession {
    runtime: Runtime,
    client: Client,
}

impl WebDriverSession {
    /// Start a browser session. Fails if the WebDriver server is unreachable
    /// or refuses the capabilities.
    pub fn launch(config: &WebDriverConfig) -> Result<Self, SessionError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SessionError::Runtime(e.to_string()))?;

        let client = runtime
            .block_on(
                ClientBuilder::native()
                    .capabilities(config.capabilities())
                    .connect(&config.url),
            )
            .map_err(|e| SessionError::Connect(e.to_string()))?;

        info!(url = %config.url, browser = ?config.browser, "browser session started");
        Ok(Self { runtime, client })
    }

    pub fn goto(&mut self, url: &str) -> Result<(), SessionError> {
        self.runtime
            .block_on(self.client.goto(url))
            .map_err(|e| SessionError::Command(e.to_string()))
    }

    pub fn current_url(&mut self) -> Result<String, SessionError> {
        self.runtime
            .block_on(self.client.current_url())
            .map(|u| u.to_string())
            .map_err(|e| SessionError::Command(e.to_string()))
    }

    /// End the session and close the browser.
    pub fn quit(self) -> Result<(), SessionError> {
        let Self { runtime, client } = self;
        runtime
            .block_on(client.close())
            .map_err(|e| SessionError::Command(e.to_string()))?;
        info!("browser session closed");
        Ok(())
    }
}

fn driver_error(e: CmdError) -> DriverError {
    if let CmdError::Standard(ref wd) = e {
        match wd.error {
            ErrorStatus::StaleElementReference => return DriverError::StaleElement,
            ErrorStatus::ElementNotInteractable | ErrorStatus::InvalidElementState => {
                return DriverError::NotInteractable(wd.message.to_string())
            }
            _ => {}
        }
    }
    DriverError::Command(e.to_string())
}

impl FormDriver for WebDriverSession {
    type Element = Element;

    fn form_elements(&mut self) -> Result<Vec<Element>, DriverError> {
        let elements = self
            .runtime
            .block_on(self.client.find_all(Locator::XPath(FORM_CONTROLS_XPATH)))
            .map_err(driver_error)?;
        debug!(count = elements.len(), "found form controls");
        Ok(elements)
    }

    fn tag_name(&mut self, element: &Element) -> Result<String, DriverError> {
        self.runtime
            .block_on(element.tag_name())
            .map(|t| t.to_lowercase())
            .map_err(driver_error)
    }

    fn attribute(&mut self, element: &Element, name: &str) -> Result<Option<String>, DriverError> {
        self.runtime.block_on(element.attr(name)).map_err(driver_error)
    }

    fn option_texts(&mut self, element: &Element) -> Result<Vec<String>, DriverError> {
        self.runtime.block_on(async {
            let options = element.find_all(Locator::Css("option")).await?;
            let mut texts = Vec::with_capacity(options.len());
            for option in &options {
                texts.push(option.text().await?);
            }
            Ok::<_, CmdError>(texts)
        })
        .map_err(driver_error)
    }

    // By position: option labels are compared trimmed, while an XPath label
    // match would see the raw whitespace and break on quotes.
    fn select_option(&mut self, element: &Element, index: usize) -> Result<(), DriverError> {
        self.runtime
            .block_on(element.select_by_index(index))
            .map(|_| ())
            .map_err(|e| {
                if e.is_no_such_element() {
                    DriverError::NoSuchOption(index)
                } else {
                    driver_error(e)
                }
            })
    }

    fn clear(&mut self, element: &Element) -> Result<(), DriverError> {
        self.runtime.block_on(element.clear()).map_err(driver_error)
    }

    fn type_text(&mut self, element: &Element, text: &str) -> Result<(), DriverError> {
        self.runtime.block_on(element.send_keys(text)).map_err(driver_error)
    }

    fn set_value(&mut self, element: &Element, value: &str) -> Result<(), DriverError> {
        let handle =
            serde_json::to_value(element).map_err(|e| DriverError::Command(e.to_string()))?;
        self.runtime
            .block_on(self.client.execute(SET_VALUE_SCRIPT, vec![handle, json!(value)]))
            .map(|_| ())
            .map_err(driver_error)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Unsupported browser: {0}")]
    UnsupportedBrowser(String),
    #[error("Failed to start async runtime: {0}")]
    Runtime(String),
    #[error("Could not connect to WebDriver: {0}")]
    Connect(String),
    #[error("Browser command failed: {0}")]
    Command(String),
}
