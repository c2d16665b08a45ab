//! Resume analyzer: keyword, skill-gap and LLM review of resumes against job descriptions

use anyhow::{bail, Context};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resume_analyzer::cli::{self, Cli, Commands, ConfigAction};
use resume_analyzer::config::Config;
use resume_analyzer::input::InputManager;
use resume_analyzer::llm::FeedbackOutcome;
use resume_analyzer::output::{save_report_to_file, AnalysisReport, ReportGenerator};
use resume_analyzer::review::{ReviewRequest, Reviewer};
use resume_analyzer::server::{self, AppState};
use resume_analyzer::storage::{self, NewAnalysis, Repository};
use resume_analyzer::{Result, ResumeAnalyzerError};
use std::future::Future;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            output,
            save,
            no_llm,
            detailed,
            mode,
        } => {
            info!("Starting resume analysis");

            cli::validate_file_extension(&resume, &["pdf", "txt", "md"])
                .map_err(|e| ResumeAnalyzerError::InvalidInput(format!("Resume file: {}", e)))?;

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(ResumeAnalyzerError::InvalidInput)?,
                None => config.output.format,
            };
            let mode = cli::resolve_mode(mode.as_deref(), config.llm.mode).map_err(ResumeAnalyzerError::InvalidInput)?;

            println!("🚀 Resume analysis");
            println!("📄 Resume: {}", resume.display());

            let mut input_manager = InputManager::new();
            let resume_text = input_manager
                .extract_text(&resume)
                .await
                .with_context(|| format!("Failed to read resume {}", resume.display()))?;
            let job_text = input_manager
                .text_or_file(&job)
                .await
                .context("Failed to read job description")?;
            let job_source = if PathBuf::from(&job).is_file() { job.clone() } else { "inline text".to_string() };
            println!("💼 Job Description: {}", job_source);

            if resume_text.trim().is_empty() {
                bail!("No text could be extracted from {}", resume.display());
            }

            let reviewer = Reviewer::from_config(&config)?;
            if no_llm {
                println!("⚠️  LLM feedback disabled");
            } else if !reviewer.has_llm() {
                println!("⚠️  GEMINI_API_KEY not set, running keyword analysis only");
            }

            let request = ReviewRequest {
                resume_text: &resume_text,
                job_text: Some(&job_text),
                resume_source: resume.display().to_string(),
                job_source: Some(job_source),
                mode,
                skip_llm: no_llm,
            };
            let report = if reviewer.has_llm() && !no_llm {
                with_spinner("🤖 Waiting for LLM feedback...", reviewer.review(request)).await
            } else {
                reviewer.review(request).await
            };

            let generator = ReportGenerator::with_options(
                config.output.color_output,
                detailed || config.output.detailed,
                true,
                true,
            );
            let rendered = generator.generate_report(&report, &output_format)?;
            println!("{}", rendered);

            if let Some(path) = save {
                // Saved files never carry color codes
                let plain = ReportGenerator::with_options(false, detailed || config.output.detailed, true, true)
                    .generate_report(&report, &output_format)?;
                save_report_to_file(&plain, &path)
                    .with_context(|| format!("Failed to save report to {}", path.display()))?;
                println!("💾 Report saved to {}", path.display());
            }
        }

        Commands::InitDb => {
            open_repository(&config).await?;
            println!("✅ Database initialized at {}", config.database.url);
        }

        Commands::AddUser { name, email } => {
            let repo = open_repository(&config).await?;
            let user = repo.add_user(&name, &email).await?;
            println!("User '{}' added with ID {}.", user.name, user.id);
        }

        Commands::AddResume { user_id, file_path } => {
            cli::validate_file_extension(&file_path, &["pdf", "txt", "md"])
                .map_err(|e| ResumeAnalyzerError::InvalidInput(format!("Resume file: {}", e)))?;

            let repo = open_repository(&config).await?;
            let content = InputManager::new()
                .extract_text(&file_path)
                .await
                .with_context(|| format!("Failed to read resume {}", file_path.display()))?;
            let resume = repo.add_resume(user_id, &content).await?;
            println!(
                "Resume from '{}' added for user ID {} (resume ID {}, version {}).",
                file_path.display(),
                user_id,
                resume.id,
                resume.version
            );
        }

        Commands::AddJob { title, description } => {
            let repo = open_repository(&config).await?;
            let description = InputManager::new()
                .text_or_file(&description)
                .await
                .context("Failed to read job description")?;
            let job = repo.add_job(&title, &description).await?;
            println!("Job '{}' added with ID {}.", job.title, job.id);
        }

        Commands::ListUsers => {
            let repo = open_repository(&config).await?;
            let users = repo.list_users().await?;
            if users.is_empty() {
                println!("No users found.");
            }
            for user in users {
                println!("ID: {}, Name: {}, Email: {}", user.id, user.name, user.email);
            }
        }

        Commands::ListResumes => {
            let repo = open_repository(&config).await?;
            let resumes = repo.list_resumes().await?;
            if resumes.is_empty() {
                println!("No resumes found.");
            }
            for resume in resumes {
                println!(
                    "ID: {}, User ID: {}, Created: {}, Version: {}",
                    resume.id,
                    resume.user_id,
                    resume.created_at.format("%Y-%m-%d %H:%M:%S"),
                    resume.version
                );
            }
        }

        Commands::ListJobs => {
            let repo = open_repository(&config).await?;
            let jobs = repo.list_jobs().await?;
            if jobs.is_empty() {
                println!("No job descriptions found.");
            }
            for job in jobs {
                println!("ID: {}, Title: {}", job.id, job.title);
            }
        }

        Commands::AnalyzeResume { resume_id, job_id, mode } => {
            if config.api_key().is_none() {
                bail!("GEMINI_API_KEY not found in config or environment. Please set it first.");
            }
            let mode = cli::resolve_mode(mode.as_deref(), config.llm.mode).map_err(ResumeAnalyzerError::InvalidInput)?;

            let repo = open_repository(&config).await?;
            let resume = repo.get_resume(resume_id).await?;
            let job = match job_id {
                Some(id) => Some(repo.get_job(id).await?),
                None => None,
            };

            let reviewer = Reviewer::from_config(&config)?;
            let request = ReviewRequest {
                resume_text: &resume.content,
                job_text: job.as_ref().map(|j| j.description.as_str()),
                resume_source: format!("resume #{}", resume.id),
                job_source: job.as_ref().map(|j| format!("job #{} ({})", j.id, j.title)),
                mode,
                skip_llm: false,
            };
            let report = with_spinner("🤖 Waiting for LLM feedback...", reviewer.review(request)).await;

            let analysis = NewAnalysis::from_report(resume.id, job.as_ref().map(|j| j.id), &report)?;
            let stored = repo.record_analysis(&analysis).await?;

            println!("Analysis completed for resume ID {} (analysis ID {})", resume_id, stored.id);
            println!("Feedback: {}", feedback_text(&report)?);
        }

        Commands::Serve { port } => {
            let reviewer = Reviewer::from_config(&config)?;
            let port = port.unwrap_or(config.server.port);
            let state = AppState {
                reviewer: Arc::new(reviewer),
                mode: config.llm.mode,
            };

            println!("🌐 Serving on http://{}:{}", config.server.host, port);
            server::serve(state, &config.server.host, port)
                .await
                .with_context(|| format!("Server on port {} stopped", port))?;
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("Config File: {}", config_path.unwrap_or_else(Config::config_path).display());
                println!("\nLLM:");
                println!("  Model: {}", config.llm.model);
                println!("  API Key: {}", if config.api_key().is_some() { "set" } else { "not set" });
                println!("  Mode: {}", config.llm.mode.as_str());
                println!("  Timeout: {}s, Retries: {}", config.llm.timeout_secs, config.llm.max_retries);
                println!("\nDatabase: {}", config.database.url);
                println!("\nAnalysis:");
                println!("  Top Keywords: {}", config.analysis.top_keywords);
                println!("  Include Adjectives: {}", config.analysis.include_adjectives);
                println!("  Missing Skills Named: {}", config.analysis.max_missing_skills);
                match &config.analysis.skill_catalog {
                    Some(path) => println!("  Skill Catalog: {}", path.display()),
                    None => println!("  Skill Catalog: built-in"),
                }
                println!("\nServer: {}:{}", config.server.host, config.server.port);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                let default_config = Config::default();
                match config_path {
                    Some(path) => default_config.save_to(&path)?,
                    None => default_config.save()?,
                }
                println!("✅ Configuration reset successfully!");
            }
        },
    }

    Ok(())
}

async fn open_repository(config: &Config) -> anyhow::Result<Repository> {
    storage::open(&config.database.url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.url))
}

/// Text stored and shown for a stored analysis
fn feedback_text(report: &AnalysisReport) -> Result<String> {
    match &report.feedback {
        FeedbackOutcome::Structured { feedback } => Ok(serde_json::to_string_pretty(feedback)?),
        FeedbackOutcome::FreeText { text } => Ok(text.clone()),
        FeedbackOutcome::Unavailable { reason } => Err(ResumeAnalyzerError::AnalysisFailed(reason.clone())),
    }
}

async fn with_spinner<F: Future>(message: &str, future: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = future.await;
    spinner.finish_and_clear();
    output
}
