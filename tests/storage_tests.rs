//! Repository behavior against an in-memory SQLite database

use resume_analyzer::storage::{self, NewAnalysis, Repository};
use resume_analyzer::ResumeAnalyzerError;

async fn repo() -> Repository {
    storage::open("sqlite::memory:").await.unwrap()
}

fn analysis(resume_id: i64, job_description_id: Option<i64>) -> NewAnalysis {
    NewAnalysis {
        resume_id,
        job_description_id,
        score: 72.5,
        feedback: r#"{"match_score":72.5,"summary":"Solid fit"}"#.to_string(),
        analysis_type: "detailed".to_string(),
        keywords: "kubernetes,docker".to_string(),
        ats_score: 50.0,
    }
}

#[tokio::test]
async fn test_users_round_trip_in_insertion_order() {
    let repo = repo().await;
    let ada = repo.add_user("  Ada Lovelace ", "ada@example.com").await.unwrap();
    let alan = repo.add_user("Alan Turing", "alan@example.com").await.unwrap();

    assert_eq!(ada.name, "Ada Lovelace");
    let users = repo.list_users().await.unwrap();
    assert_eq!(users.iter().map(|u| u.id).collect::<Vec<_>>(), vec![ada.id, alan.id]);
    assert_eq!(repo.get_user(alan.id).await.unwrap().email, "alan@example.com");
}

#[tokio::test]
async fn test_duplicate_email_is_a_conflict() {
    let repo = repo().await;
    repo.add_user("Ada", "ada@example.com").await.unwrap();

    let err = repo.add_user("Someone Else", "ada@example.com").await.unwrap_err();
    assert!(matches!(err, ResumeAnalyzerError::Conflict(_)));
    assert_eq!(repo.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_user_validation() {
    let repo = repo().await;

    assert!(matches!(
        repo.add_user("", "ada@example.com").await.unwrap_err(),
        ResumeAnalyzerError::InvalidInput(_)
    ));
    assert!(matches!(
        repo.add_user("Ada", "not-an-email").await.unwrap_err(),
        ResumeAnalyzerError::InvalidInput(_)
    ));
    let long_name = "x".repeat(101);
    assert!(matches!(
        repo.add_user(&long_name, "ada@example.com").await.unwrap_err(),
        ResumeAnalyzerError::InvalidInput(_)
    ));
}

#[tokio::test]
async fn test_resume_versions_increase_per_user() {
    let repo = repo().await;
    let ada = repo.add_user("Ada", "ada@example.com").await.unwrap();
    let alan = repo.add_user("Alan", "alan@example.com").await.unwrap();

    let first = repo.add_resume(ada.id, "Resume v1").await.unwrap();
    let second = repo.add_resume(ada.id, "Resume v2").await.unwrap();
    let other = repo.add_resume(alan.id, "Alan's resume").await.unwrap();

    assert_eq!(first.version, 1);
    assert_eq!(second.version, 2);
    assert_eq!(other.version, 1);
    assert_eq!(repo.get_resume(second.id).await.unwrap().content, "Resume v2");
    assert_eq!(repo.list_resumes().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_resume_requires_existing_user_and_content() {
    let repo = repo().await;

    let err = repo.add_resume(42, "Resume").await.unwrap_err();
    assert!(matches!(err, ResumeAnalyzerError::NotFound(_)));

    let ada = repo.add_user("Ada", "ada@example.com").await.unwrap();
    let err = repo.add_resume(ada.id, "   ").await.unwrap_err();
    assert!(matches!(err, ResumeAnalyzerError::InvalidInput(_)));
    assert!(repo.list_resumes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_records_are_not_found() {
    let repo = repo().await;

    assert!(matches!(repo.get_user(1).await.unwrap_err(), ResumeAnalyzerError::NotFound(_)));
    assert!(matches!(repo.get_resume(1).await.unwrap_err(), ResumeAnalyzerError::NotFound(_)));
    assert!(matches!(repo.get_job(1).await.unwrap_err(), ResumeAnalyzerError::NotFound(_)));
}

#[tokio::test]
async fn test_jobs_round_trip() {
    let repo = repo().await;
    let job = repo.add_job("Platform Engineer", "Kubernetes and Terraform").await.unwrap();

    assert_eq!(repo.get_job(job.id).await.unwrap().title, "Platform Engineer");
    assert_eq!(repo.list_jobs().await.unwrap().len(), 1);
    assert!(matches!(
        repo.add_job("Empty", "").await.unwrap_err(),
        ResumeAnalyzerError::InvalidInput(_)
    ));
}

#[tokio::test]
async fn test_record_and_list_analyses() {
    let repo = repo().await;
    let ada = repo.add_user("Ada", "ada@example.com").await.unwrap();
    let resume = repo.add_resume(ada.id, "Python and Docker").await.unwrap();
    let job = repo.add_job("Platform Engineer", "Kubernetes and Docker").await.unwrap();

    let stored = repo.record_analysis(&analysis(resume.id, Some(job.id))).await.unwrap();
    repo.record_analysis(&analysis(resume.id, None)).await.unwrap();

    assert_eq!(stored.score, 72.5);
    assert_eq!(stored.ats_score, Some(50.0));
    assert_eq!(stored.job_description_id, Some(job.id));
    assert_eq!(stored.keywords.as_deref(), Some("kubernetes,docker"));

    let analyses = repo.list_analyses_for_resume(resume.id).await.unwrap();
    assert_eq!(analyses.len(), 2);
    assert_eq!(analyses[1].job_description_id, None);
}

#[tokio::test]
async fn test_analysis_for_unknown_resume_is_rejected() {
    let repo = repo().await;

    let err = repo.record_analysis(&analysis(99, None)).await.unwrap_err();
    assert!(matches!(err, ResumeAnalyzerError::NotFound(_)));
}
