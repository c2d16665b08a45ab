//! Output formatters for analysis reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::llm::feedback::{FeedbackOutcome, LlmFeedback};
use crate::output::report::{AnalysisReport, MatchLevel};
use crate::processing::keywords::KeywordEntry;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting analysis reports
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for API integration and structured data
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

const SUMMARY_KEYWORDS: usize = 10;

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: f64) -> String {
        let (badge, color) = match score {
            s if s >= 90.0 => ("EXCELLENT", Color::Green),
            s if s >= 75.0 => ("GOOD", Color::BrightGreen),
            s if s >= 50.0 => ("FAIR", Color::Yellow),
            _ => ("POOR", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn level_color(level: MatchLevel) -> Color {
        match level {
            MatchLevel::Strong => Color::Green,
            MatchLevel::Moderate => Color::Yellow,
            MatchLevel::Weak => Color::Red,
            MatchLevel::Unknown => Color::White,
        }
    }

    fn keyword_line(&self, keywords: &[KeywordEntry]) -> String {
        let limit = if self.detailed { keywords.len() } else { SUMMARY_KEYWORDS };
        let shown: Vec<String> = keywords
            .iter()
            .take(limit)
            .map(|k| format!("{} ({})", k.term, k.count))
            .collect();
        if shown.is_empty() {
            "none".to_string()
        } else {
            shown.join(", ")
        }
    }

    fn format_list(&self, output: &mut String, title: &str, items: &[String], color: Color) {
        if items.is_empty() {
            return;
        }
        output.push_str(&format!("{}\n", self.colorize(title, color)));
        for item in items {
            output.push_str(&format!("  • {}\n", item));
        }
    }

    fn format_feedback(&self, output: &mut String, feedback: &LlmFeedback) {
        output.push_str(&format!(
            "Match Score: {:.0}/100 {}\n",
            feedback.match_score,
            self.format_score_badge(feedback.match_score)
        ));
        output.push_str(&format!("Summary: {}\n\n", self.colorize(&feedback.summary, Color::Cyan)));

        self.format_list(output, "✅ Strengths", &feedback.strengths, Color::Green);
        self.format_list(output, "⚠️  Improvement Areas", &feedback.improvement_areas, Color::Yellow);
        self.format_list(output, "💡 Suggestions", &feedback.suggestions, Color::Cyan);

        if self.detailed {
            self.format_list(output, "Key Skills Matched", &feedback.key_skills_matched, Color::Green);
            self.format_list(output, "Missing Skills", &feedback.missing_skills, Color::Red);
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();
        let nlp = &report.nlp_analysis;
        let skills = &nlp.skill_analysis;

        output.push_str(&self.format_header("📊 RESUME ANALYSIS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));
        output.push_str(&format!("Resume: {}\n", report.metadata.resume_source));
        if let Some(job) = &report.metadata.job_source {
            output.push_str(&format!("Job: {}\n", job));
        }
        output.push_str(&format!(
            "Verdict: {}\n",
            self.colorize(&report.verdict(), Self::level_color(report.match_level()))
        ));

        output.push_str(&self.format_header("Skill Analysis", 2));
        output.push_str(&format!("Match: {:.2}%\n", skills.match_percentage));
        let matched: Vec<&str> = skills.matched.iter().map(String::as_str).collect();
        let missing: Vec<&str> = skills.missing.iter().map(String::as_str).collect();
        output.push_str(&format!(
            "✅ Matched: {}\n",
            if matched.is_empty() { "none".to_string() } else { self.colorize(&matched.join(", "), Color::Green) }
        ));
        output.push_str(&format!(
            "❌ Missing: {}\n",
            if missing.is_empty() { "none".to_string() } else { self.colorize(&missing.join(", "), Color::Red) }
        ));

        output.push_str(&self.format_header("Keywords", 2));
        output.push_str(&format!("Resume: {}\n", self.keyword_line(&nlp.resume_keywords)));
        output.push_str(&format!("Job: {}\n", self.keyword_line(&nlp.jd_keywords)));

        if self.detailed && !nlp.keyword_match.is_empty() {
            output.push_str(&self.format_header("Term Relevance (job minus resume)", 3));
            for (term, score) in nlp.keyword_match.iter() {
                let color = if score > 0.0 { Color::Red } else { Color::Green };
                output.push_str(&format!("  {:<24} {}\n", term, self.colorize(&format!("{:+.4}", score), color)));
            }
        }

        if !nlp.formatting_issues.is_empty() {
            output.push_str(&self.format_header("Formatting Issues", 2));
            for issue in &nlp.formatting_issues {
                output.push_str(&format!("  ⚠️  {}\n", issue));
            }
        }

        if !nlp.recommendations.is_empty() {
            output.push_str(&self.format_header("Recommendations", 2));
            for (i, rec) in nlp.recommendations.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, rec));
            }
        }

        output.push_str(&self.format_header("🤖 AI Feedback", 2));
        match &report.feedback {
            FeedbackOutcome::Structured { feedback } => self.format_feedback(&mut output, feedback),
            FeedbackOutcome::FreeText { text } => {
                output.push_str(text.trim());
                output.push('\n');
            }
            FeedbackOutcome::Unavailable { reason } => {
                output.push_str(&format!(
                    "{} {}\n",
                    self.colorize("Not available:", Color::Yellow),
                    reason
                ));
            }
        }
        if let Some(model) = &report.metadata.model {
            output.push_str(&format!("\nModel: {} ({} mode)\n", model, report.metadata.mode.as_str()));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn bullet_section(output: &mut String, title: &str, items: &[String]) {
        if items.is_empty() {
            return;
        }
        output.push_str(&format!("### {}\n\n", title));
        for item in items {
            output.push_str(&format!("- {}\n", item));
        }
        output.push('\n');
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();
        let nlp = &report.nlp_analysis;
        let skills = &nlp.skill_analysis;

        output.push_str("# 📊 Resume Analysis Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!("**Resume:** `{}`", report.metadata.resume_source));
            if let Some(job) = &report.metadata.job_source {
                output.push_str(&format!(" | **Job:** `{}`", job));
            }
            output.push_str("\n\n");
        }

        output.push_str(&format!("**Verdict:** {}\n\n", report.verdict()));

        output.push_str("## Skill Analysis\n\n");
        output.push_str("| Skill | Status |\n");
        output.push_str("|-------|--------|\n");
        for skill in &skills.matched {
            output.push_str(&format!("| {} | ✅ matched |\n", skill));
        }
        for skill in &skills.missing {
            output.push_str(&format!("| {} | ❌ missing |\n", skill));
        }
        output.push_str(&format!("\n**Match percentage:** {:.2}%\n\n", skills.match_percentage));

        output.push_str("## Keywords\n\n");
        output.push_str("| Resume | Count | Job | Count |\n");
        output.push_str("|--------|-------|-----|-------|\n");
        let rows = nlp.resume_keywords.len().max(nlp.jd_keywords.len());
        for i in 0..rows {
            let cell = |k: Option<&KeywordEntry>| match k {
                Some(k) => (k.term.clone(), k.count.to_string()),
                None => (String::new(), String::new()),
            };
            let (rt, rc) = cell(nlp.resume_keywords.get(i));
            let (jt, jc) = cell(nlp.jd_keywords.get(i));
            output.push_str(&format!("| {} | {} | {} | {} |\n", rt, rc, jt, jc));
        }
        output.push('\n');

        if !nlp.keyword_match.is_empty() {
            output.push_str("## Term Relevance\n\n");
            output.push_str("Positive scores are emphasized by the job description, negative by the resume.\n\n");
            output.push_str("| Term | Score |\n");
            output.push_str("|------|-------|\n");
            for (term, score) in nlp.keyword_match.iter() {
                output.push_str(&format!("| {} | {:+.4} |\n", term, score));
            }
            output.push('\n');
        }

        if !nlp.formatting_issues.is_empty() {
            let issues: Vec<String> = nlp.formatting_issues.iter().map(|i| i.to_string()).collect();
            output.push_str("## Formatting\n\n");
            Self::bullet_section(&mut output, "Issues", &issues);
        }

        if !nlp.recommendations.is_empty() {
            output.push_str("## Recommendations\n\n");
            for (i, rec) in nlp.recommendations.iter().enumerate() {
                output.push_str(&format!("{}. {}\n", i + 1, rec));
            }
            output.push('\n');
        }

        output.push_str("## 🤖 AI Feedback\n\n");
        match &report.feedback {
            FeedbackOutcome::Structured { feedback } => {
                output.push_str(&format!("**Match Score:** {:.0}/100\n\n", feedback.match_score));
                output.push_str(&format!("{}\n\n", feedback.summary));
                Self::bullet_section(&mut output, "Strengths", &feedback.strengths);
                Self::bullet_section(&mut output, "Improvement Areas", &feedback.improvement_areas);
                Self::bullet_section(&mut output, "Suggestions", &feedback.suggestions);
                Self::bullet_section(&mut output, "Key Skills Matched", &feedback.key_skills_matched);
                Self::bullet_section(&mut output, "Missing Skills", &feedback.missing_skills);
            }
            FeedbackOutcome::FreeText { text } => {
                output.push_str(text.trim());
                output.push_str("\n\n");
            }
            FeedbackOutcome::Unavailable { reason } => {
                output.push_str(&format!("_Not available: {}_\n\n", reason));
            }
        }

        if self.include_metadata {
            if let Some(model) = &report.metadata.model {
                output.push_str(&format!("---\n*Model: {} ({} mode), analyzer v{}*\n",
                    model,
                    report.metadata.mode.as_str(),
                    report.metadata.analyzer_version
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// Utility functions for saving reports
pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };
    format!("{}_analysis{}.{}", base_name, timestamp_suffix, extension)
}
