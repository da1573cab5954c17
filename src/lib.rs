pub mod browser;
pub mod config;
pub mod error;
pub mod parser;
pub mod scraper;
pub mod storage;

pub use browser::ChromiumLauncher;
pub use config::Config;
pub use error::{Result, ScrapingError};
pub use scraper::{AgentScraper, RunSummary};
pub use storage::AgentRecord;
