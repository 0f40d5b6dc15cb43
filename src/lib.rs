pub mod cli;
pub mod config;
pub mod generator;
pub mod llm;
pub mod research;
pub mod resume;
pub mod session;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use generator::workflow::{generate_report, launch};
