pub mod extractor;
pub mod orchestrator;
pub mod pagination;


pub use extractor::{fill_phone_slots, AgentExtractor};
pub use orchestrator::{AgentScraper, RunSummary};
pub use pagination::{page_url, total_pages};
