//! Built-in topic set and the deterministic fallback quiz.

use rand::seq::SliceRandom;

use crate::domain::{GeneratedQuiz, QuizQuestion};

/// Fixed topic pool for scheduled generation. The quiz subject is decoupled
/// from user-submitted backlog topics on purpose; the backlog only colors the
/// recorded source tag.
pub const TOPICS: &[&str] = &[
  "Artificial Intelligence",
  "Blockchain Technology",
  "Climate Change",
  "Space Exploration",
  "Quantum Computing",
  "Renewable Energy",
  "Cybersecurity",
  "Electric Vehicles",
  "Gene Editing",
  "Virtual Reality",
  "Cryptocurrency Markets",
  "Ocean Conservation",
  "Robotics",
  "World History",
  "Astronomy",
  "Human Nutrition",
  "Internet Culture",
  "Modern Art",
  "Olympic Sports",
  "Ancient Civilizations",
];

/// Uniform-random pick over the built-in topic set.
pub fn select_random_topic() -> &'static str {
  TOPICS
    .choose(&mut rand::thread_rng())
    .copied()
    .unwrap_or("General Knowledge")
}

/// Deterministic placeholder quiz derived purely from the topic string.
/// Engaged when the generation adapter fails or returns invalid structure,
/// so the daily cache is never left empty. Low quality, correct is always
/// option 0 — an explicit degraded mode, not hidden.
pub fn fallback_quiz(topic: &str) -> GeneratedQuiz {
  let question = |prompt: String| QuizQuestion {
    question: prompt,
    options: vec![
      format!("A fact about {}", topic),
      "An unrelated statement".into(),
      "A common misconception".into(),
      "None of the above".into(),
    ],
    correct: 0,
    explanation: format!("Placeholder answer while generation for '{}' is unavailable.", topic),
    source_context: format!("fallback:{}", topic),
  };

  GeneratedQuiz {
    title: format!("Quick Quiz: {}", topic),
    description: format!("A placeholder quiz about {} (generation was unavailable).", topic),
    trending_topic: topic.to_string(),
    questions: vec![
      question(format!("Which statement relates to {}?", topic)),
      question(format!("Which of these belongs to the field of {}?", topic)),
      question(format!("Pick the option connected to {}.", topic)),
    ],
  }
}
