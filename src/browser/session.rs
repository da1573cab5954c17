use async_trait::async_trait;

use crate::error::Result;

/// An element handle inside a live page.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageElement: Send + Sync {
    /// Text as rendered to the user; empty for hidden elements.
    async fn text(&self) -> Result<String>;

    /// `innerText` evaluated by script against this element.
    async fn inner_text(&self) -> Result<String>;

    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// Fails with `ElementNotFound` when nothing matches.
    async fn find_element(&self, selector: &str) -> Result<Box<dyn PageElement>>;

    async fn find_elements(&self, selector: &str) -> Result<Vec<Box<dyn PageElement>>>;
}

/// One controllable browser, used for a single page visit.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn navigate(&mut self, url: &str) -> Result<()>;

    async fn find_element(&self, selector: &str) -> Result<Box<dyn PageElement>>;

    async fn find_elements(&self, selector: &str) -> Result<Vec<Box<dyn PageElement>>>;

    /// Calling this on an already closed session is a no-op.
    async fn close(&mut self) -> Result<()>;
}

#[async_trait]
pub trait SessionLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}
