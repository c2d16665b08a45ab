//! SQLite persistence for users, resumes, job descriptions and analyses

pub mod models;
pub mod repository;

pub use models::{Analysis, JobDescription, NewAnalysis, Resume, User};
pub use repository::Repository;

use crate::error::Result;
use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(100) NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS resumes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id),
        content TEXT NOT NULL,
        created_at TEXT NOT NULL,
        version INTEGER NOT NULL DEFAULT 1
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS job_descriptions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title VARCHAR(100) NOT NULL,
        description TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS analyses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        resume_id INTEGER NOT NULL REFERENCES resumes(id),
        job_description_id INTEGER REFERENCES job_descriptions(id),
        score REAL NOT NULL,
        feedback TEXT,
        analysis_type VARCHAR(50) NOT NULL DEFAULT 'general',
        keywords TEXT,
        ats_score REAL,
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_resumes_user ON resumes(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_analyses_resume ON analyses(resume_id)",
];

/// Open (creating if needed) the database at `database_url`
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    info!("Connecting to SQLite database...");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
    if !in_memory {
        // get_filename consumes the options
        let filename = options.clone().get_filename();
        if let Some(parent) = filename.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    // Every in-memory connection is its own database, so keep exactly one alive
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options.connect_with(options).await?;
    info!("SQLite connection pool established");
    Ok(pool)
}

/// Create all tables; safe to run repeatedly
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    debug!("Database schema is up to date");
    Ok(())
}

/// Connect and make sure the schema exists
pub async fn open(database_url: &str) -> Result<Repository> {
    let pool = connect(database_url).await?;
    init_schema(&pool).await?;
    Ok(Repository::new(pool))
}
