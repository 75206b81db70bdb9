mod free_text;
mod structured;

use crate::config::ExtractorConfig;
use crate::error::ExtractionError;
use crate::models::Quiz;
use crate::utils::truncate_string;

/// Which parser produced the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Structured,
    FreeText,
}

/// A successful extraction plus everything that was dropped on the way.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub quiz: Quiz,
    pub phase: Phase,
    pub warnings: Vec<ExtractionError>,
}

/// Turns raw model output into a validated quiz. Holds configuration only.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Structured array first, enumerated free text second.
    ///
    /// Fails with `NoValidQuestions` only when neither phase yields a single
    /// valid question.
    pub fn run(&self, raw: &str) -> Result<Extraction, ExtractionError> {
        log::debug!(
            "extracting quiz from {} bytes: {}",
            raw.len(),
            truncate_string(raw, self.config.log_preview_chars)
        );

        let mut warnings = Vec::new();
        let mut failures = Vec::new();

        if raw.trim().is_empty() {
            return Err(self.no_valid_questions(raw, "model output was empty".to_string()));
        }

        match structured::find_structured_block(raw) {
            Some(items) => {
                let total = items.len();
                let (questions, dropped) = structured::parse_elements(&items, &self.config);
                warnings.extend(dropped);

                if let Some(quiz) = Quiz::new(questions) {
                    log::info!(
                        "extracted {} of {} structured questions",
                        quiz.len(),
                        total
                    );
                    return Ok(Extraction {
                        quiz,
                        phase: Phase::Structured,
                        warnings,
                    });
                }

                log::debug!("all {} structured elements rejected, trying free text", total);
                failures.push(format!("none of {} structured elements were valid", total));
            }
            None => {
                log::debug!("no structured block, trying free text");
                warnings.push(ExtractionError::NoStructuredBlockFound);
                failures.push("no structured array found".to_string());
            }
        }

        if !self.config.free_text_fallback {
            failures.push("free-text fallback disabled".to_string());
            return Err(self.no_valid_questions(raw, failures.join("; ")));
        }

        let blocks = free_text::split_blocks(raw);
        let (questions, dropped) = free_text::parse_blocks(&blocks);
        warnings.extend(dropped);

        match Quiz::new(questions) {
            Some(quiz) => {
                log::info!(
                    "extracted {} of {} free-text questions",
                    quiz.len(),
                    blocks.len()
                );
                Ok(Extraction {
                    quiz,
                    phase: Phase::FreeText,
                    warnings,
                })
            }
            None => {
                failures.push(format!("none of {} free-text blocks were valid", blocks.len()));
                Err(self.no_valid_questions(raw, failures.join("; ")))
            }
        }
    }

    fn no_valid_questions(&self, raw: &str, reason: String) -> ExtractionError {
        log::warn!("quiz extraction failed: {}", reason);
        ExtractionError::NoValidQuestions {
            raw: raw.to_string(),
            reason,
        }
    }
}

/// Extract a quiz with the default settings.
pub fn extract(raw: &str) -> Result<Quiz, ExtractionError> {
    Extractor::default().run(raw).map(|extraction| extraction.quiz)
}
