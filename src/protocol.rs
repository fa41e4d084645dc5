//! Public request/response DTOs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{BacklogEntry, QuizSource, StoredQuiz};

/// Externally-facing quiz shape. Per-question `source_context` is
/// deliberately omitted; the top-level `source` tag is kept.
#[derive(Debug, Serialize)]
pub struct FrontendQuizConfig {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub topic: String,
    #[serde(rename = "questionCount")]
    pub question_count: usize,
    pub questions: Vec<FrontendQuestion>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub source: QuizSource,
}

#[derive(Debug, Serialize)]
pub struct FrontendQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct: usize,
    pub explanation: String,
}

/// Convert the full internal record to the public shape.
pub fn to_frontend(q: &StoredQuiz) -> FrontendQuizConfig {
    FrontendQuizConfig {
        id: q.id.clone(),
        title: q.title.clone(),
        description: q.description.clone(),
        difficulty: q.difficulty.clone(),
        topic: q.trending_topic.clone(),
        question_count: q.question_count,
        questions: q
            .questions
            .iter()
            .map(|question| FrontendQuestion {
                question: question.question.clone(),
                options: question.options.clone(),
                correct: question.correct,
                explanation: question.explanation.clone(),
            })
            .collect(),
        created_at: q.created_at,
        source: q.source,
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct AddBacklogIn {
    pub topic: String,
    #[serde(rename = "addedBy", default = "default_added_by")]
    pub added_by: String,
    /// Accepted for wire compatibility; ordering is strictly by added_at.
    #[serde(default)]
    #[allow(dead_code)]
    pub priority: Option<i64>,
}

fn default_added_by() -> String {
    "anonymous".into()
}

#[derive(Serialize)]
pub struct AddBacklogOut {
    pub success: bool,
    pub item: BacklogEntry,
    pub message: String,
}

#[derive(Serialize)]
pub struct BacklogOut {
    pub success: bool,
    pub items: Vec<BacklogEntry>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct CachedQuizzesOut {
    pub success: bool,
    pub quizzes: Vec<FrontendQuizConfig>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct CronOut {
    pub success: bool,
    pub source: QuizSource,
    pub quiz_count: usize,
}

#[derive(Serialize)]
pub struct InsertQuizOut {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::fixture_quiz;

    #[test]
    fn frontend_shape_drops_source_context_and_keeps_source() {
        let out = to_frontend(&fixture_quiz());
        let json = serde_json::to_value(&out).unwrap();

        assert_eq!(json["id"], "manual-test-quiz");
        assert_eq!(json["questionCount"], 3);
        assert_eq!(json["source"], "manual-test");
        assert_eq!(json["topic"], "Testing");
        let first = &json["questions"][0];
        assert!(first.get("source_context").is_none());
        assert_eq!(first["options"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn add_backlog_in_defaults_added_by_and_tolerates_priority() {
        let body: AddBacklogIn =
            serde_json::from_str(r#"{"topic": "Space", "priority": 5}"#).unwrap();
        assert_eq!(body.topic, "Space");
        assert_eq!(body.added_by, "anonymous");

        let body: AddBacklogIn =
            serde_json::from_str(r#"{"topic": "Space", "addedBy": "alice"}"#).unwrap();
        assert_eq!(body.added_by, "alice");
    }
}
