//! Domain models: backlog entries, quiz questions, and the daily quiz records
//! persisted in the cache store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every generated quiz has exactly this many questions.
pub const QUESTIONS_PER_QUIZ: usize = 3;
/// Every question has exactly this many answer options.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Where did a stored quiz come from?
///
/// The scheduled flow reads the backlog but picks its topic at random; the
/// backlog only decides which of the two `Random*` tags gets recorded.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum QuizSource {
  #[serde(rename = "random-with-backlog")]
  RandomWithBacklog,
  #[serde(rename = "random-empty-backlog")]
  RandomEmptyBacklog,
  #[serde(rename = "manual-test")]
  ManualTest,
}

impl QuizSource {
  pub fn as_str(&self) -> &'static str {
    match self {
      QuizSource::RandomWithBacklog => "random-with-backlog",
      QuizSource::RandomEmptyBacklog => "random-empty-backlog",
      QuizSource::ManualTest => "manual-test",
    }
  }
}

/// One pending topic submitted by a user or operator.
/// Immutable after creation; removed only by delete-by-id or full clear.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BacklogEntry {
  pub id: String,
  pub topic: String,
  #[serde(rename = "addedBy")]
  pub added_by: String,
  /// Sole ordering key for the backlog (oldest first).
  #[serde(rename = "addedAt")]
  pub added_at: DateTime<Utc>,
}

/// The whole backlog, stored as a single record under one fixed key.
/// `total_count` is recomputed from `items` on every write, never incremented.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BacklogList {
  pub items: Vec<BacklogEntry>,
  #[serde(rename = "totalCount")]
  pub total_count: usize,
  #[serde(rename = "lastUpdated")]
  pub last_updated: DateTime<Utc>,
}

impl BacklogList {
  pub fn empty() -> Self {
    Self { items: Vec::new(), total_count: 0, last_updated: Utc::now() }
  }
}

/// A single multiple-choice question. `options` order matters: it is the
/// answer-index space for `correct`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizQuestion {
  pub question: String,
  pub options: Vec<String>,
  pub correct: usize,
  pub explanation: String,
  pub source_context: String,
}

/// Raw structured output the generation adapter must produce.
/// Structure is checked by the orchestrator before anything is persisted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratedQuiz {
  pub title: String,
  pub description: String,
  pub trending_topic: String,
  pub questions: Vec<QuizQuestion>,
}

impl GeneratedQuiz {
  /// Structural validation: exactly 3 questions, 4 options each, correct
  /// index in range. Anything else is rejected and the caller falls back.
  pub fn check_structure(&self) -> Result<(), String> {
    if self.questions.len() != QUESTIONS_PER_QUIZ {
      return Err(format!(
        "expected exactly {} questions, got {}",
        QUESTIONS_PER_QUIZ,
        self.questions.len()
      ));
    }
    for (i, q) in self.questions.iter().enumerate() {
      if q.options.len() != OPTIONS_PER_QUESTION {
        return Err(format!(
          "question {} has {} options, expected {}",
          i,
          q.options.len(),
          OPTIONS_PER_QUESTION
        ));
      }
      if q.correct >= OPTIONS_PER_QUESTION {
        return Err(format!(
          "question {} correct index {} out of range 0..={}",
          i,
          q.correct,
          OPTIONS_PER_QUESTION - 1
        ));
      }
    }
    Ok(())
  }
}

/// Full internal quiz record, provenance fields included.
/// Created at generation time and immutable afterwards; the next cycle for
/// the same day key replaces it wholesale.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredQuiz {
  pub id: String,
  pub title: String,
  pub description: String,
  pub trending_topic: String,
  pub questions: Vec<QuizQuestion>,
  pub difficulty: String,
  #[serde(rename = "questionCount")]
  pub question_count: usize,
  #[serde(rename = "createdAt")]
  pub created_at: DateTime<Utc>,
  pub source: QuizSource,
}

/// The persisted day record. `expires_at` is informational; actual expiry is
/// the store TTL, which is deliberately longer than a day to tolerate late
/// cron runs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DailyQuizList {
  pub quizzes: Vec<StoredQuiz>,
  #[serde(rename = "generatedAt")]
  pub generated_at: DateTime<Utc>,
  #[serde(rename = "expiresAt")]
  pub expires_at: DateTime<Utc>,
}
