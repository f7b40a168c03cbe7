pub mod cli;
pub mod config;
pub mod flow;
pub mod llm;
pub mod search;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use flow::launch;
