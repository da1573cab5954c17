pub mod count;
pub mod sanitize;

pub use count::ResultCountParser;
pub use sanitize::{clean_agent_name, clean_business_name};
