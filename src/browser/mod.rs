pub mod manager;
pub mod session;
pub mod stealth;


pub use manager::{ChromiumElement, ChromiumLauncher, ChromiumSession, SessionId};
pub use session::{BrowserSession, PageElement, SessionLauncher};
pub use stealth::{generate_stealth_script, UserAgentGenerator};
