use crate::error::AttemptError;
use crate::models::{Quiz, ScoreRecord};

/// One student's pass through a quiz.
///
/// Selections are recorded by returning a new attempt, so a value handed to
/// the presentation layer is never changed behind its back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAttempt<'q> {
    quiz: &'q Quiz,
    selections: Vec<Option<String>>,
}

impl<'q> QuizAttempt<'q> {
    pub fn new(quiz: &'q Quiz) -> Self {
        Self {
            quiz,
            selections: vec![None; quiz.len()],
        }
    }

    pub fn quiz(&self) -> &'q Quiz {
        self.quiz
    }

    /// Record `option` as the choice for question `question`, replacing any earlier one.
    pub fn select(mut self, question: usize, option: &str) -> Result<Self, AttemptError> {
        let q = self.quiz.get(question).ok_or(AttemptError::UnknownQuestion {
            index: question,
            len: self.quiz.len(),
        })?;

        let option = option.trim();
        if !q.options().iter().any(|o| o == option) {
            return Err(AttemptError::UnknownOption {
                question,
                option: option.to_string(),
            });
        }

        self.selections[question] = Some(option.to_string());
        Ok(self)
    }

    pub fn selection(&self, question: usize) -> Option<&str> {
        self.selections.get(question)?.as_deref()
    }

    pub fn answered(&self) -> usize {
        self.selections.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.answered() == self.quiz.len()
    }

    /// Number of selections that name the correct option.
    pub fn score(&self) -> u32 {
        self.quiz
            .iter()
            .zip(&self.selections)
            .filter(|(q, s)| s.as_deref().is_some_and(|s| q.is_correct(s)))
            .count() as u32
    }

    /// Close the attempt and produce the record to be stored.
    pub fn finish(self, student_name: &str) -> Result<ScoreRecord, AttemptError> {
        let record = ScoreRecord::new(student_name, self.score(), self.quiz.len() as u32)?;
        log::info!(
            "{} scored {}/{}",
            record.student_name(),
            record.score(),
            record.total()
        );
        Ok(record)
    }
}
