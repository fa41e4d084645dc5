//! Runtime configuration (env) and generation prompts (optional TOML file).
//!
//! See `Config` for the env schema and `Prompts` for the prompt schema.

use serde::Deserialize;
use tracing::{info, error};

/// Process-level configuration, read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
  pub port: u16,
  pub redis_url: String,
  /// When set, `GET /cron/daily-quiz` requires `Authorization: Bearer <secret>`.
  pub cron_secret: Option<String>,
}

impl Config {
  pub fn from_env() -> Self {
    let port = std::env::var("PORT")
      .ok()
      .and_then(|p| p.parse::<u16>().ok())
      .unwrap_or(3000);
    let redis_url =
      std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into());
    let cron_secret = std::env::var("CRON_SECRET").ok().filter(|s| !s.is_empty());
    Self { port, redis_url, cron_secret }
  }
}

/// TOML wrapper accepted at QUIZ_CONFIG_PATH.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct QuizConfig {
  #[serde(default)]
  pub prompts: Prompts,
}

/// Prompts used by the OpenAI client. Defaults produce the strict quiz JSON
/// shape the orchestrator validates. Override in TOML to tune tone/structure,
/// but keep the output schema intact.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  pub generation_system: String,
  pub generation_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      generation_system: "You are a trivia quiz generator. Respond ONLY with strict JSON, no markdown fences.".into(),
      generation_user_template: "Create a multiple-choice quiz about '{topic}'. Return JSON with fields: title (string), description (string), trending_topic (string, the quiz subject), questions (array of EXACTLY 3 objects). Each question object has: question (string), options (array of EXACTLY 4 strings), correct (integer 0-3, index of the right option), explanation (string justifying the right answer), source_context (string describing what inspired the question). Keep questions factual and self-contained.".into(),
    }
  }
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any parsing/IO
/// error, returns None and the defaults apply.
pub fn load_quiz_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<QuizConfig>(&s) {
      Ok(cfg) => {
        info!(target: "quiz_backend", %path, "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "quiz_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "quiz_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_prompts_carry_topic_placeholder_and_schema() {
    let p = Prompts::default();
    assert!(p.generation_user_template.contains("{topic}"));
    assert!(p.generation_user_template.contains("EXACTLY 3"));
    assert!(p.generation_user_template.contains("EXACTLY 4"));
  }

  #[test]
  fn quiz_config_toml_overrides_prompts() {
    let toml = r#"
      [prompts]
      generation_system = "sys"
      generation_user_template = "quiz on {topic}"
    "#;
    let cfg: QuizConfig = toml::from_str(toml).unwrap();
    assert_eq!(cfg.prompts.generation_system, "sys");
    assert_eq!(cfg.prompts.generation_user_template, "quiz on {topic}");
  }
}
