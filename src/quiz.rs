//! Daily Quiz Orchestrator: scheduled generation, cached reads, and the
//! manual insert path used for cache plumbing tests.
//!
//! Per UTC day the flow is: select topic → generate → validate → persist.
//! A failed generation is converted immediately to the deterministic
//! fallback quiz (no retry loop, bounding the scheduled job's latency);
//! store failures are fatal and propagate so the cron caller can retry the
//! whole run. Two overlapping runs for the same day simply overwrite each
//! other, last write wins.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::backlog::BacklogManager;
use crate::config::Prompts;
use crate::domain::{DailyQuizList, GeneratedQuiz, QuizQuestion, QuizSource, StoredQuiz};
use crate::error::AppError;
use crate::openai::OpenAI;
use crate::store::{CacheStore, DAILY_QUIZ_TTL_SECS, daily_quiz_key};
use crate::topics::{fallback_quiz, select_random_topic};

/// First instant of the next UTC calendar day.
fn next_utc_midnight(now: DateTime<Utc>) -> DateTime<Utc> {
    let tomorrow = now.date_naive() + Duration::days(1);
    tomorrow
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always a valid time")
        .and_utc()
}

#[derive(Clone)]
pub struct DailyQuizOrchestrator {
    store: Arc<dyn CacheStore>,
    backlog: BacklogManager,
    openai: Option<OpenAI>,
    prompts: Prompts,
}

impl DailyQuizOrchestrator {
    pub fn new(
        store: Arc<dyn CacheStore>,
        backlog: BacklogManager,
        openai: Option<OpenAI>,
        prompts: Prompts,
    ) -> Self {
        Self { store, backlog, openai, prompts }
    }

    /// The scheduled generation run.
    ///
    /// The backlog is observed but not consumed: the topic always comes from
    /// the built-in pool and backlog presence only changes the recorded
    /// source tag. This mirrors the product's current (flagged) behavior;
    /// do not "fix" it here.
    #[instrument(level = "info", skip(self))]
    pub async fn generate_scheduled(&self) -> Result<(StoredQuiz, QuizSource), AppError> {
        let backlog_list = self.backlog.list().await?;
        let source = if backlog_list.items.is_empty() {
            QuizSource::RandomEmptyBacklog
        } else {
            QuizSource::RandomWithBacklog
        };

        let topic = select_random_topic();
        info!(target: "quiz", %topic, source = source.as_str(), backlog_len = backlog_list.items.len(), "Topic selected");

        let generated = self.generate_or_fallback(topic).await;

        let now = Utc::now();
        let quiz = Self::wrap_stored(generated, source, now);
        let record = DailyQuizList {
            quizzes: vec![quiz.clone()],
            generated_at: now,
            expires_at: next_utc_midnight(now),
        };

        let key = daily_quiz_key(now.date_naive());
        let json = serde_json::to_string(&record)?;
        self.store.set_with_ttl(&key, &json, DAILY_QUIZ_TTL_SECS).await?;

        info!(target: "quiz", %key, quiz_id = %quiz.id, source = source.as_str(), "Daily quiz persisted");
        Ok((quiz, source))
    }

    /// Generation with the degraded-mode branch. Adapter errors and invalid
    /// structure both land on the deterministic fallback so the daily cache
    /// is never left empty.
    async fn generate_or_fallback(&self, topic: &str) -> GeneratedQuiz {
        let Some(oa) = &self.openai else {
            warn!(target: "quiz", %topic, "OPENAI_API_KEY not set; using fallback quiz");
            return fallback_quiz(topic);
        };

        Self::validate_or_fallback(topic, oa.generate_quiz(&self.prompts, topic).await)
    }

    /// The validate step as a plain branch on the adapter's typed result.
    /// Anything but a structurally valid quiz becomes the fallback.
    fn validate_or_fallback(
        topic: &str,
        generated: Result<GeneratedQuiz, String>,
    ) -> GeneratedQuiz {
        match generated {
            Ok(quiz) => match quiz.check_structure() {
                Ok(()) => quiz,
                Err(e) => {
                    error!(target: "quiz", %topic, error = %e, "Generated quiz failed validation; using fallback");
                    fallback_quiz(topic)
                }
            },
            Err(e) => {
                error!(target: "quiz", %topic, error = %e, "Quiz generation failed; using fallback");
                fallback_quiz(topic)
            }
        }
    }

    fn wrap_stored(generated: GeneratedQuiz, source: QuizSource, now: DateTime<Utc>) -> StoredQuiz {
        let question_count = generated.questions.len();
        StoredQuiz {
            id: Uuid::new_v4().to_string(),
            title: generated.title,
            description: generated.description,
            trending_topic: generated.trending_topic,
            questions: generated.questions,
            difficulty: "medium".into(),
            question_count,
            created_at: now,
            source,
        }
    }

    /// Read today's record. Absent or expired is `None`, not an error.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_cached(&self) -> Result<Option<DailyQuizList>, AppError> {
        let key = daily_quiz_key(Utc::now().date_naive());
        match self.store.get(&key).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Administrative/test path: append a quiz to today's record without
    /// touching generation. Exercises the cache plumbing end to end.
    #[instrument(level = "info", skip(self, quiz), fields(quiz_id = %quiz.id))]
    pub async fn insert_manual(&self, quiz: StoredQuiz) -> Result<(), AppError> {
        let now = Utc::now();
        let mut record = self.get_cached().await?.unwrap_or(DailyQuizList {
            quizzes: Vec::new(),
            generated_at: now,
            expires_at: next_utc_midnight(now),
        });
        record.quizzes.push(quiz);

        let key = daily_quiz_key(now.date_naive());
        let json = serde_json::to_string(&record)?;
        self.store.set_with_ttl(&key, &json, DAILY_QUIZ_TTL_SECS).await?;
        Ok(())
    }
}

/// Fixed fixture quiz served by `GET /test/insert-quiz`.
pub fn fixture_quiz() -> StoredQuiz {
    let question = QuizQuestion {
        question: "Which network introduced smart contracts at scale?".into(),
        options: vec![
            "Ethereum".into(),
            "SMTP".into(),
            "BitTorrent".into(),
            "IRC".into(),
        ],
        correct: 0,
        explanation: "Ethereum popularized general-purpose smart contracts.".into(),
        source_context: "fixture".into(),
    };
    StoredQuiz {
        id: "manual-test-quiz".into(),
        title: "Manual Test Quiz".into(),
        description: "Fixture quiz for exercising the cache plumbing.".into(),
        trending_topic: "Testing".into(),
        questions: vec![question.clone(), question.clone(), question],
        difficulty: "medium".into(),
        question_count: 3,
        created_at: Utc::now(),
        source: QuizSource::ManualTest,
    }
}
