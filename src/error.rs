use thiserror::Error;

/// Problems found while turning raw model output into a quiz.
///
/// Only `NoValidQuestions` ever reaches the caller as an `Err`; the other
/// kinds are recovered where they happen and collected as warnings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("structured element {index} rejected: {reason}")]
    MalformedStructuredBlock { index: usize, reason: String },
    #[error("no structured array found in model output")]
    NoStructuredBlockFound,
    #[error("free-text block {index} rejected: {reason}")]
    UnparsableBlock { index: usize, reason: String },
    #[error("could not generate questions: {reason}")]
    NoValidQuestions { raw: String, reason: String },
}

impl ExtractionError {
    /// Whether asking the model again is a sensible reaction.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExtractionError::NoValidQuestions { .. })
    }

    /// Original model output, when the error carries it.
    pub fn raw(&self) -> Option<&str> {
        match self {
            ExtractionError::NoValidQuestions { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("question text is empty")]
    EmptyText,
    #[error("question has no options")]
    NoOptions,
    #[error("option {0} is empty")]
    EmptyOption(usize),
    #[error("expected {expected} options, found {found}")]
    OptionCount { expected: usize, found: usize },
    #[error("correct index {index} out of range for {len} options")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("answer '{0}' is empty")]
    EmptyAnswer(String),
    #[error("answer '{0}' does not match any option")]
    UnmatchedAnswer(String),
    #[error("answer '{0}' matches more than one option")]
    AmbiguousAnswer(String),
    #[error("missing field '{0}'")]
    MissingField(&'static str),
    #[error("field '{0}' has the wrong type")]
    WrongType(&'static str),
}

/// Why a quiz cannot be written in the structured array format.
#[derive(Debug, Error)]
pub enum QuizJsonError {
    #[error("question {question} has {found} options, the structured format needs {expected}")]
    OptionCount {
        question: usize,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    #[error("question {index} does not exist (quiz has {len})")]
    UnknownQuestion { index: usize, len: usize },
    #[error("'{option}' is not an option of question {question}")]
    UnknownOption { question: usize, option: String },
    #[error("student name is empty")]
    EmptyStudentName,
}
