pub mod error;
pub mod llm;
pub mod prompts;
pub mod service;
