//! Resume analyzer library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod llm;
pub mod output;
pub mod review;
pub mod storage;
pub mod server;

pub use error::{Result, ResumeAnalyzerError};
pub use config::Config;
