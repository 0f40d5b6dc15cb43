pub mod context;
pub mod outlet;
pub mod prompts;
pub mod synthesizer;
pub mod workflow;
