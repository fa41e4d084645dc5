//! Minimal OpenAI client for quiz generation.
//!
//! We only call chat.completions and request a strict JSON object decoding
//! into `GeneratedQuiz`. Calls are instrumented and log model names,
//! latencies, and response sizes (not contents).
//!
//! NOTE: We never log the API key and we keep payload truncations short.
//!
//! Failures come back as a typed `Result`, never an exception path: the
//! orchestrator's fallback logic is a plain branch on `Err`.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{instrument, info, error};

use crate::config::Prompts;
use crate::domain::GeneratedQuiz;
use crate::util::{fill_template, trunc_for_log};

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok()?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(20))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, model })
  }

  /// JSON-object chat completion. Generic over the target type T.
  #[instrument(level = "info", skip(self, system, user), fields(model = %model))]
  async fn chat_json<T: for<'a> Deserialize<'a>>(
    &self,
    model: &str,
    system: &str,
    user: &str,
    temperature: f32,
  ) -> Result<T, String> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: model.to_string(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      response_format: Some(ResponseFormat { r#type: "json_object".into() }),
    };

    let res = self.client.post(&url)
      .header(USER_AGENT, "chainquiz-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await.map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_openai_error(&body).unwrap_or(body);
      return Err(format!("OpenAI HTTP {}: {}", status, msg));
    }

    let body: ChatCompletionResponse = res.json().await.map_err(|e| e.to_string())?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body.choices.first()
      .and_then(|c| c.message.content.clone())
      .unwrap_or_default();

    serde_json::from_str::<T>(&text)
      .map_err(|e| format!("JSON parse error: {} (body: {})", e, trunc_for_log(&text, 160)))
  }

  /// Generate a quiz for the given topic. The caller still has to run
  /// `GeneratedQuiz::check_structure` before persisting anything.
  #[instrument(
    level = "info",
    skip(self, prompts),
    fields(%topic, model = %self.model, tpl_len = prompts.generation_user_template.len())
  )]
  pub async fn generate_quiz(
    &self,
    prompts: &Prompts,
    topic: &str,
  ) -> Result<GeneratedQuiz, String> {
    let system = &prompts.generation_system;
    let user = fill_template(&prompts.generation_user_template, &[("topic", topic)]);

    let start = std::time::Instant::now();
    let result = self.chat_json::<GeneratedQuiz>(&self.model, system, &user, 0.8).await;
    let elapsed = start.elapsed();

    match &result {
      Ok(quiz) => {
        info!(
          ?elapsed,
          title_preview = %quiz.title.chars().take(40).collect::<String>(),
          questions = quiz.questions.len(),
          "Quiz generation response received"
        );
      }
      Err(e) => {
        error!(?elapsed, error = %e, "Model call failed during quiz generation");
      }
    }

    result
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  response_format: Option<ResponseFormat>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }
#[derive(Serialize)]
struct ResponseFormat { #[serde(rename = "type")] r#type: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}
