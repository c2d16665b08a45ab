//! CLI interface for the resume analyzer

use crate::config::PromptMode;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-analyzer")]
#[command(about = "Resume and job description analysis with keyword heuristics and LLM feedback")]
#[command(long_about = "Extract text from resumes, compare them against job descriptions with keyword, skill-gap and formatting checks, and ask Gemini for a written review")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a resume file against a job description
    Analyze {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Job description text, or a path to a TXT/MD/PDF file
        #[arg(short, long)]
        job: String,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Skip LLM feedback (keyword and skill analysis only)
        #[arg(long)]
        no_llm: bool,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,

        /// Prompt mode: general or detailed
        #[arg(short, long)]
        mode: Option<String>,
    },

    /// Create the database tables if they do not exist
    InitDb,

    /// Add a new user
    AddUser {
        name: String,
        email: String,
    },

    /// Add a new resume for a user from a PDF, TXT or MD file
    AddResume {
        user_id: i64,
        file_path: PathBuf,
    },

    /// Add a new job description
    AddJob {
        title: String,
        /// Description text, or a path to a file containing it
        description: String,
    },

    /// List all users
    ListUsers,

    /// List all resumes
    ListResumes,

    /// List all job descriptions
    ListJobs,

    /// Review a stored resume with the LLM and store the analysis
    AnalyzeResume {
        resume_id: i64,

        /// Stored job description to compare against
        #[arg(short, long)]
        job_id: Option<i64>,

        /// Prompt mode: general or detailed (defaults to the configured mode)
        #[arg(short, long)]
        mode: Option<String>,
    },

    /// Start the HTTP API
    Serve {
        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

/// The `--mode` flag when given, otherwise the configured mode
pub fn resolve_mode(value: Option<&str>, configured: PromptMode) -> Result<PromptMode, String> {
    match value {
        Some(v) => v.parse::<PromptMode>(),
        None => Ok(configured),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
