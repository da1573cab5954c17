use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::browser::{BrowserSession, SessionLauncher};
use crate::config::{Config, SelectorConfig};
use crate::error::Result;
use crate::parser::ResultCountParser;
use crate::scraper::extractor::AgentExtractor;
use crate::scraper::pagination::{expected_cards_on_page, page_cursors, page_url, total_pages};
use crate::storage::CsvSink;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total_found: u64,
    pub pages_visited: u64,
    pub records_written: u64,
}

/// Drives one directory scrape: count discovery, then every listing page in
/// order, each in its own browser session.
pub struct AgentScraper<L: SessionLauncher> {
    launcher: L,
    output_path: PathBuf,
    page_size: u32,
    selectors: SelectorConfig,
    count_parser: ResultCountParser,
    extractor: AgentExtractor,
}

impl<L: SessionLauncher> AgentScraper<L> {
    pub fn new(launcher: L, config: &Config) -> Result<Self> {
        Ok(Self {
            launcher,
            output_path: config.output.path.clone(),
            page_size: config.pagination.page_size,
            selectors: config.selectors.clone(),
            count_parser: ResultCountParser::new()?,
            extractor: AgentExtractor::new(config.selectors.clone()),
        })
    }

    pub async fn run(&self, origin: &str) -> Result<RunSummary> {
        info!("Starting scrape of {}", origin);
        let sink = CsvSink::create(&self.output_path)?;

        let total_found = self.discover_count(origin).await?;
        let mut summary = RunSummary {
            total_found,
            ..RunSummary::default()
        };

        if total_found == 0 {
            info!("Nothing to scrape, output holds the header only");
            return Ok(summary);
        }

        let pages = total_pages(total_found, self.page_size);
        info!("{} agents across {} pages", total_found, pages);

        for page in page_cursors(total_found, self.page_size) {
            let url = page_url(origin, page);
            let expected = expected_cards_on_page(total_found, page, self.page_size);

            let mut session = self.launcher.launch().await?;
            let outcome = self.scrape_page(session.as_mut(), &url, &sink, expected).await;
            release(session.as_mut()).await;

            summary.records_written += outcome?;
            summary.pages_visited += 1;
            info!("Finished page {}/{}", page, pages);
        }

        info!(
            "Scrape complete: {} rows from {} pages written to {:?}",
            summary.records_written,
            summary.pages_visited,
            sink.path()
        );
        Ok(summary)
    }

    /// Reads the result count from the origin page in a session of its own.
    pub async fn discover_count(&self, origin: &str) -> Result<u64> {
        let mut session = self.launcher.launch().await?;
        let outcome = self.read_count(session.as_mut(), origin).await;
        release(session.as_mut()).await;
        outcome
    }

    async fn read_count(&self, session: &mut dyn BrowserSession, origin: &str) -> Result<u64> {
        session.navigate(origin).await?;
        let summary = session.find_element(&self.selectors.summary).await?;
        let summary_text = summary.text().await?;
        debug!("Summary text: {:?}", summary_text);
        self.count_parser.extract_count(&summary_text)
    }

    async fn scrape_page(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
        sink: &CsvSink,
        expected: u64,
    ) -> Result<u64> {
        session.navigate(url).await?;
        let cards = session.find_elements(&self.selectors.agent_card).await?;

        if cards.len() as u64 != expected {
            warn!("Expected {} agent cards on {}, found {}", expected, url, cards.len());
        } else {
            debug!("Found {} agent cards on {}", cards.len(), url);
        }

        let mut writer = sink.open_page()?;
        for card in &cards {
            let record = self.extractor.extract_agent(card.as_ref()).await?;
            writer.write_record(&record)?;
        }
        writer.finish()
    }
}

async fn release(session: &mut dyn BrowserSession) {
    if let Err(e) = session.close().await {
        warn!("Failed to close browser session: {}", e);
    }
}
