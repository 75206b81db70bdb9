use crate::config::DEFAULT_OPTIONS_PER_QUESTION;
use crate::error::{AttemptError, QuestionError, QuizJsonError};
use crate::utils::normalize_answer;
use serde::ser::{Serialize, Serializer};

/// How the model designated the correct option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Zero-based position in `options`.
    Index(usize),
    /// Text of the correct option, exactly as stored in `options`.
    Text(String),
}

/// A single validated multiple-choice question.
///
/// Options keep the order the model produced; that order is the display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    text: String,
    options: Vec<String>,
    answer: Answer,
    correct: usize,
}

impl QuizQuestion {
    /// Build a question, trimming text and options.
    ///
    /// A text answer must match exactly one option (case and whitespace
    /// insensitive); it is stored as that option's text.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        answer: Answer,
    ) -> Result<Self, QuestionError> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }

        let options: Vec<String> = options.into_iter().map(|o| o.trim().to_string()).collect();
        if let Some(idx) = options.iter().position(|o| o.is_empty()) {
            return Err(QuestionError::EmptyOption(idx));
        }

        let correct = match &answer {
            Answer::Index(index) => {
                if *index >= options.len() {
                    return Err(QuestionError::IndexOutOfRange {
                        index: *index,
                        len: options.len(),
                    });
                }
                *index
            }
            Answer::Text(raw) => {
                let key = normalize_answer(raw);
                if key.is_empty() {
                    return Err(QuestionError::EmptyAnswer(raw.clone()));
                }
                let mut hits = options
                    .iter()
                    .enumerate()
                    .filter(|(_, o)| normalize_answer(o) == key)
                    .map(|(idx, _)| idx);
                match (hits.next(), hits.next()) {
                    (Some(idx), None) => idx,
                    (None, _) => return Err(QuestionError::UnmatchedAnswer(raw.clone())),
                    (Some(_), Some(_)) => {
                        return Err(QuestionError::AmbiguousAnswer(raw.clone()));
                    }
                }
            }
        };

        let answer = match answer {
            Answer::Index(index) => Answer::Index(index),
            Answer::Text(_) => Answer::Text(options[correct].clone()),
        };

        Ok(Self {
            text,
            options,
            answer,
            correct,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn answer(&self) -> &Answer {
        &self.answer
    }

    pub fn correct_index(&self) -> usize {
        self.correct
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct]
    }

    /// True only for the text of the correct option (surrounding whitespace ignored).
    pub fn is_correct(&self, candidate: &str) -> bool {
        candidate.trim() == self.correct_option()
    }
}

#[derive(serde::Serialize)]
#[serde(untagged)]
enum CorrectField<'a> {
    Index(usize),
    Text(&'a str),
}

#[derive(serde::Serialize)]
struct QuestionRecord<'a> {
    question: &'a str,
    options: &'a [String],
    correct: CorrectField<'a>,
}

impl Serialize for QuizQuestion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let correct = match &self.answer {
            Answer::Index(index) => CorrectField::Index(*index),
            Answer::Text(text) => CorrectField::Text(text),
        };
        QuestionRecord {
            question: &self.text,
            options: &self.options,
            correct,
        }
        .serialize(serializer)
    }
}

/// Ordered, non-empty sequence of validated questions.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct Quiz {
    questions: Vec<QuizQuestion>,
}

impl Quiz {
    /// `None` when there are no questions; an empty quiz is never handed out.
    pub fn new(questions: Vec<QuizQuestion>) -> Option<Self> {
        if questions.is_empty() {
            None
        } else {
            Some(Self { questions })
        }
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn get(&self, index: usize) -> Option<&QuizQuestion> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false; kept for the `len`/`is_empty` pair.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuizQuestion> {
        self.questions.iter()
    }

    /// Render back to the structured array format the model is asked for.
    ///
    /// Fails for quizzes whose questions do not all carry the default option
    /// count, since the structured phase would drop them on re-extraction.
    pub fn to_json(&self) -> Result<String, QuizJsonError> {
        self.to_json_with(DEFAULT_OPTIONS_PER_QUESTION)
    }

    /// `to_json` for an extractor configured with `options_per_question`.
    pub fn to_json_with(&self, options_per_question: usize) -> Result<String, QuizJsonError> {
        if let Some((question, q)) = self
            .questions
            .iter()
            .enumerate()
            .find(|(_, q)| q.options.len() != options_per_question)
        {
            return Err(QuizJsonError::OptionCount {
                question,
                expected: options_per_question,
                found: q.options.len(),
            });
        }
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<'a> IntoIterator for &'a Quiz {
    type Item = &'a QuizQuestion;
    type IntoIter = std::slice::Iter<'a, QuizQuestion>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

/// Outcome of one completed attempt. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ScoreRecord {
    student_name: String,
    score: u32,
    total: u32,
}

impl ScoreRecord {
    pub fn new(student_name: &str, score: u32, total: u32) -> Result<Self, AttemptError> {
        let student_name = student_name.trim();
        if student_name.is_empty() {
            return Err(AttemptError::EmptyStudentName);
        }
        Ok(Self {
            student_name: student_name.to_string(),
            score,
            total,
        })
    }

    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> u32 {
        self.total
    }
}
