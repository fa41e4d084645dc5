//! Application state: injected cache store, backlog manager, orchestrator,
//! prompts, and the cron gate secret.
//!
//! The store client's lifecycle is owned by the process entry point; the
//! components here only borrow it through the `CacheStore` trait object.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::backlog::BacklogManager;
use crate::config::{Config, load_quiz_config_from_env};
use crate::openai::OpenAI;
use crate::quiz::DailyQuizOrchestrator;
use crate::store::CacheStore;

#[derive(Clone)]
pub struct AppState {
    pub backlog: BacklogManager,
    pub quizzes: DailyQuizOrchestrator,
    pub cron_secret: Option<String>,
}

impl AppState {
    /// Wire the components: load prompts, init the optional OpenAI client,
    /// and hand the injected store to both consumers.
    #[instrument(level = "info", skip_all)]
    pub fn new(config: &Config, store: Arc<dyn CacheStore>) -> Self {
        let prompts = load_quiz_config_from_env()
            .map(|c| c.prompts)
            .unwrap_or_default();

        let openai = OpenAI::from_env();
        if let Some(oa) = &openai {
            info!(target: "quiz_backend", base_url = %oa.base_url, model = %oa.model, "OpenAI enabled.");
        } else {
            info!(target: "quiz_backend", "OpenAI disabled (no OPENAI_API_KEY). Scheduled runs will use the fallback quiz.");
        }

        let backlog = BacklogManager::new(store.clone());
        let quizzes =
            DailyQuizOrchestrator::new(store, backlog.clone(), openai, prompts);

        Self {
            backlog,
            quizzes,
            cron_secret: config.cron_secret.clone(),
        }
    }
}
