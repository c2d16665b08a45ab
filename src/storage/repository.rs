//! Queries over users, resumes, job descriptions and analyses

use crate::error::{Result, ResumeAnalyzerError};
use crate::storage::models::{Analysis, JobDescription, NewAnalysis, Resume, User};
use chrono::Utc;
use log::info;
use sqlx::SqlitePool;

const MAX_NAME_LEN: usize = 100;

#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn add_user(&self, name: &str, email: &str) -> Result<User> {
        let name = required("name", name)?;
        let email = required("email", email)?;
        if !email.contains('@') {
            return Err(ResumeAnalyzerError::InvalidInput(format!(
                "'{}' is not a valid email address",
                email
            )));
        }

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email) VALUES (?, ?) RETURNING id, name, email",
        )
        .bind(name)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                ResumeAnalyzerError::Conflict(format!("A user with email '{}' already exists", email))
            }
            other => ResumeAnalyzerError::Database(other),
        })?;

        info!("Added user {} ({})", user.id, user.email);
        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        Ok(sqlx::query_as::<_, User>("SELECT id, name, email FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn get_user(&self, id: i64) -> Result<User> {
        sqlx::query_as::<_, User>("SELECT id, name, email FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ResumeAnalyzerError::NotFound(format!("User with ID {} not found", id)))
    }

    /// Each new resume for a user gets the next version number
    pub async fn add_resume(&self, user_id: i64, content: &str) -> Result<Resume> {
        if content.trim().is_empty() {
            return Err(ResumeAnalyzerError::InvalidInput(
                "Resume content is empty".to_string(),
            ));
        }
        self.get_user(user_id).await?;

        let mut tx = self.pool.begin().await?;

        let current_max: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM resumes WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
        let version = current_max.unwrap_or(0) + 1;

        let resume = sqlx::query_as::<_, Resume>(
            r#"
            INSERT INTO resumes (user_id, content, created_at, version)
            VALUES (?, ?, ?, ?)
            RETURNING id, user_id, content, created_at, version
            "#,
        )
        .bind(user_id)
        .bind(content)
        .bind(Utc::now())
        .bind(version)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Added resume {} (version {}) for user {}", resume.id, version, user_id);
        Ok(resume)
    }

    pub async fn list_resumes(&self) -> Result<Vec<Resume>> {
        Ok(sqlx::query_as::<_, Resume>(
            "SELECT id, user_id, content, created_at, version FROM resumes ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn get_resume(&self, id: i64) -> Result<Resume> {
        sqlx::query_as::<_, Resume>(
            "SELECT id, user_id, content, created_at, version FROM resumes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ResumeAnalyzerError::NotFound(format!("Resume with ID {} not found", id)))
    }

    pub async fn add_job(&self, title: &str, description: &str) -> Result<JobDescription> {
        let title = required("title", title)?;
        if description.trim().is_empty() {
            return Err(ResumeAnalyzerError::InvalidInput(
                "Job description is empty".to_string(),
            ));
        }

        let job = sqlx::query_as::<_, JobDescription>(
            "INSERT INTO job_descriptions (title, description) VALUES (?, ?) RETURNING id, title, description",
        )
        .bind(title)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        info!("Added job description {} '{}'", job.id, job.title);
        Ok(job)
    }

    pub async fn list_jobs(&self) -> Result<Vec<JobDescription>> {
        Ok(sqlx::query_as::<_, JobDescription>(
            "SELECT id, title, description FROM job_descriptions ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn get_job(&self, id: i64) -> Result<JobDescription> {
        sqlx::query_as::<_, JobDescription>(
            "SELECT id, title, description FROM job_descriptions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ResumeAnalyzerError::NotFound(format!("Job description with ID {} not found", id)))
    }

    pub async fn record_analysis(&self, analysis: &NewAnalysis) -> Result<Analysis> {
        let stored = sqlx::query_as::<_, Analysis>(
            r#"
            INSERT INTO analyses
                (resume_id, job_description_id, score, feedback, analysis_type, keywords, ats_score, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, resume_id, job_description_id, score, feedback, analysis_type, keywords, ats_score, created_at
            "#,
        )
        .bind(analysis.resume_id)
        .bind(analysis.job_description_id)
        .bind(analysis.score)
        .bind(&analysis.feedback)
        .bind(&analysis.analysis_type)
        .bind(&analysis.keywords)
        .bind(analysis.ats_score)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => ResumeAnalyzerError::NotFound(
                format!("Resume {} or its job description does not exist", analysis.resume_id),
            ),
            other => ResumeAnalyzerError::Database(other),
        })?;

        info!("Stored {} analysis {} for resume {}", stored.analysis_type, stored.id, stored.resume_id);
        Ok(stored)
    }

    pub async fn list_analyses_for_resume(&self, resume_id: i64) -> Result<Vec<Analysis>> {
        Ok(sqlx::query_as::<_, Analysis>(
            r#"
            SELECT id, resume_id, job_description_id, score, feedback, analysis_type, keywords, ats_score, created_at
            FROM analyses
            WHERE resume_id = ?
            ORDER BY id
            "#,
        )
        .bind(resume_id)
        .fetch_all(&self.pool)
        .await?)
    }
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ResumeAnalyzerError::InvalidInput(format!("{} must not be empty", field)));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(ResumeAnalyzerError::InvalidInput(format!(
            "{} must be at most {} characters",
            field, MAX_NAME_LEN
        )));
    }
    Ok(value)
}
