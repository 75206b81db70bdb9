pub mod attempt;
pub mod config;
pub mod error;
pub mod extract;
pub mod logger;
pub mod models;
pub mod prompt;
pub mod utils;

// Re-exports for convenience
pub use attempt::QuizAttempt;
pub use config::{ConfigError, ExtractorConfig, QuizConfig};
pub use error::{AttemptError, ExtractionError, QuestionError, QuizJsonError};
pub use extract::{extract, Extraction, Extractor, Phase};
pub use models::{Answer, Quiz, QuizQuestion, ScoreRecord};
pub use prompt::{generation_prompt, SYSTEM_PROMPT};
