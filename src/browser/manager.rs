use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpBrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::browser::session::{BrowserSession, PageElement, SessionLauncher};
use crate::browser::stealth::{generate_stealth_script, UserAgentGenerator, UNDETECTED_ARGS};
use crate::config::BrowserConfig;
use crate::error::{Result, ScrapingError};

pub type SessionId = Uuid;

const VISIBLE_TEXT_FN: &str = r#"function() {
    const style = window.getComputedStyle(this);
    if (style.display === 'none' || style.visibility === 'hidden' || this.getClientRects().length === 0) {
        return '';
    }
    return (this.innerText || '').trim();
}"#;

/// Launches one headless Chromium per session.
pub struct ChromiumLauncher {
    config: BrowserConfig,
    user_agent_generator: UserAgentGenerator,
}

impl ChromiumLauncher {
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            config,
            user_agent_generator: UserAgentGenerator::new(),
        }
    }

    fn build_cdp_config(&self, user_data_dir: &Path) -> Result<CdpBrowserConfig> {
        let mut builder = CdpBrowserConfig::builder()
            .no_sandbox()
            .user_data_dir(user_data_dir)
            .request_timeout(self.config.navigation_timeout())
            .arg("--disable-gpu");

        if !self.config.headless {
            builder = builder.with_head();
        }
        if self.config.stealth {
            builder = builder.args(UNDETECTED_ARGS.iter().copied());
        }
        if let Some(ref executable) = self.config.chrome_executable {
            builder = builder.chrome_executable(executable);
        }

        builder
            .build()
            .map_err(|e| ScrapingError::BrowserError(format!("Failed to create browser config: {}", e)))
    }

    async fn launch_browser(&self, user_data_dir: &Path) -> Result<(Browser, JoinHandle<()>)> {
        let cdp_config = self.build_cdp_config(user_data_dir)?;
        let attempts = self.config.launch_attempts;

        let mut last_error = None;
        for attempt in 1..=attempts {
            match Browser::launch(cdp_config.clone()).await {
                Ok((browser, mut handler)) => {
                    debug!("Browser launched on attempt {}", attempt);

                    let handle = tokio::spawn(async move {
                        while let Some(event) = handler.next().await {
                            if let Err(e) = event {
                                let error_msg = e.to_string();
                                if error_msg.contains("data did not match any variant")
                                    || error_msg.contains("untagged enum Message")
                                {
                                    debug!("Ignoring WebSocket deserialization error: {}", e);
                                } else {
                                    warn!("Browser handler error: {}", e);
                                }
                            }
                        }
                        debug!("Browser handler task ended");
                    });

                    return Ok((browser, handle));
                }
                Err(e) => {
                    error!("Browser launch attempt {} failed: {}", attempt, e);
                    last_error = Some(e.to_string());
                    if attempt < attempts {
                        tokio::time::sleep(Duration::from_secs(2)).await;
                    }
                }
            }
        }

        Err(ScrapingError::BrowserError(format!(
            "Failed to launch browser after {} attempts: {}",
            attempts,
            last_error.unwrap_or_default()
        )))
    }

    fn create_user_data_dir(&self) -> Result<TempDir> {
        let prefix = format!("realtor-scraper-{}-", std::process::id());
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);

        let dir = match self.config.user_data_root {
            Some(ref root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        };
        dir.map_err(|e| ScrapingError::BrowserError(format!("Failed to create user data dir: {}", e)))
    }

    async fn prepare_page(&self, page: &Page) -> Result<()> {
        let user_agent = self.user_agent_generator.random_user_agent();
        let user_agent_params = SetUserAgentOverrideParams::builder()
            .user_agent(user_agent)
            .accept_language("en-US,en;q=0.9")
            .build()
            .map_err(|e| ScrapingError::BrowserError(format!("Failed to build user agent params: {}", e)))?;

        page.execute(user_agent_params)
            .await
            .map_err(|e| ScrapingError::BrowserError(format!("Failed to set user agent: {}", e)))?;

        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(generate_stealth_script()))
            .await
            .map_err(|e| ScrapingError::BrowserError(format!("Failed to register stealth script: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl SessionLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let id = Uuid::new_v4();
        // deleted on drop, including every early return below
        let user_data_dir = self.create_user_data_dir()?;

        let (mut browser, handler) = self.launch_browser(user_data_dir.path()).await?;

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                shutdown_browser(id, &mut browser).await;
                handler.abort();
                return Err(ScrapingError::BrowserError(format!("Failed to create new page: {}", e)));
            }
        };

        let mut session = ChromiumSession {
            id,
            browser: Some(browser),
            page: Some(page),
            handler: Some(handler),
            user_data_dir: Some(user_data_dir),
            settle_delay: self.config.settle_delay(),
            navigation_timeout: self.config.navigation_timeout(),
        };

        if self.config.stealth {
            let prepared = match session.page.as_ref() {
                Some(page) => self.prepare_page(page).await,
                None => Ok(()),
            };
            if let Err(e) = prepared {
                if let Err(close_err) = session.close().await {
                    warn!("{}", close_err);
                }
                return Err(e);
            }
        }

        info!("Opened browser session {}", id);
        Ok(Box::new(session))
    }
}

pub struct ChromiumSession {
    id: SessionId,
    browser: Option<Browser>,
    page: Option<Page>,
    handler: Option<JoinHandle<()>>,
    user_data_dir: Option<TempDir>,
    settle_delay: Duration,
    navigation_timeout: Duration,
}

impl ChromiumSession {
    fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| ScrapingError::BrowserError(format!("Browser session {} is closed", self.id)))
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        let page = self.page()?;
        info!("Navigating browser session {} to {}", self.id, url);

        let navigation = async {
            page.goto(url).await?;
            page.wait_for_navigation().await?;
            Ok::<(), chromiumoxide::error::CdpError>(())
        };

        match tokio::time::timeout(self.navigation_timeout, navigation).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(ScrapingError::BrowserError(format!("Failed to navigate to {}: {}", url, e)));
            }
            Err(_) => {
                return Err(ScrapingError::BrowserError(format!("Timeout navigating to {}", url)));
            }
        }

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        debug!("Successfully navigated to {}", url);
        Ok(())
    }

    async fn find_element(&self, selector: &str) -> Result<Box<dyn PageElement>> {
        let element = self.page()?.find_element(selector).await.map_err(|e| {
            debug!("Lookup of {} failed: {}", selector, e);
            ScrapingError::element_not_found(selector)
        })?;
        Ok(Box::new(ChromiumElement { element }))
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<Box<dyn PageElement>>> {
        let elements = self.page()?.find_elements(selector).await?;
        Ok(wrap_elements(elements))
    }

    async fn close(&mut self) -> Result<()> {
        let mut first_error = None;

        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                debug!("Failed to close page of session {}: {}", self.id, e);
            }
        }

        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                first_error = Some(ScrapingError::BrowserError(format!(
                    "Failed to close browser session {}: {}",
                    self.id, e
                )));
            }
            if let Err(e) = browser.wait().await {
                debug!("Failed to reap browser process of session {}: {}", self.id, e);
            }

            if let Some(handler) = self.handler.take() {
                handler.abort();
            }

            info!("Closed browser session {}", self.id);
        }

        if let Some(user_data_dir) = self.user_data_dir.take() {
            let path = user_data_dir.path().to_path_buf();
            if let Err(e) = user_data_dir.close() {
                debug!("Failed to remove {:?}: {}", path, e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

pub struct ChromiumElement {
    element: Element,
}

impl ChromiumElement {
    async fn eval_string(&self, function: &str) -> Result<Option<String>> {
        let returns = self
            .element
            .call_js_fn(function, false)
            .await
            .map_err(|e| ScrapingError::BrowserError(format!("Script execution failed: {}", e)))?;

        Ok(returns.result.value.and_then(|value| match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }))
    }
}

#[async_trait]
impl PageElement for ChromiumElement {
    async fn text(&self) -> Result<String> {
        Ok(self.eval_string(VISIBLE_TEXT_FN).await?.unwrap_or_default())
    }

    async fn inner_text(&self) -> Result<String> {
        let text = self
            .element
            .inner_text()
            .await
            .map_err(|e| ScrapingError::BrowserError(format!("Script execution failed: {}", e)))?;
        Ok(text.unwrap_or_default())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        // DOM property first: `href` comes back absolute
        let name_literal = serde_json::to_string(name)
            .map_err(|e| ScrapingError::ParseError(format!("Invalid attribute name {}: {}", name, e)))?;
        let property_fn = format!("function() {{ return this[{}]; }}", name_literal);

        if let Some(value) = self.eval_string(&property_fn).await? {
            return Ok(Some(value));
        }

        Ok(self.element.attribute(name).await?)
    }

    async fn find_element(&self, selector: &str) -> Result<Box<dyn PageElement>> {
        let element = self.element.find_element(selector).await.map_err(|e| {
            debug!("Lookup of {} failed: {}", selector, e);
            ScrapingError::element_not_found(selector)
        })?;
        Ok(Box::new(ChromiumElement { element }))
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<Box<dyn PageElement>>> {
        let elements = self.element.find_elements(selector).await?;
        Ok(wrap_elements(elements))
    }
}

async fn shutdown_browser(id: SessionId, browser: &mut Browser) {
    if let Err(e) = browser.close().await {
        warn!("Failed to close browser of session {}: {}", id, e);
    }
    if let Err(e) = browser.wait().await {
        debug!("Failed to reap browser process of session {}: {}", id, e);
    }
}

fn wrap_elements(elements: Vec<Element>) -> Vec<Box<dyn PageElement>> {
    elements
        .into_iter()
        .map(|element| Box::new(ChromiumElement { element }) as Box<dyn PageElement>)
        .collect()
}
