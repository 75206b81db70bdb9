//! Phase two: recover questions from loosely enumerated text such as
//!
//! ```text
//! 1. What is git?
//! a) tool
//! b) fruit
//! Answer: a
//! ```

use crate::error::{ExtractionError, QuestionError};
use crate::models::{Answer, QuizQuestion};
use crate::utils::{resolve_text_answer, split_option_marker};
use regex::Regex;

lazy_static::lazy_static! {
    /// `1.`, `2)`, `Question 3:`, `Q4.`, `Q.`
    static ref QUESTION_RE: Regex = Regex::new(concat!(
        r"(?i)^(?:question\b\s*\d*\s*[:.)\-]?",
        r"|q\s*\d*\s*[.:)]",
        r"|q\d+\b\s*[:.)\-]?",
        r"|\d+\s*[.)](?:\s|$))",
        r"\s*(.*)$"
    ))
    .unwrap();
    static ref ANSWER_RE: Regex =
        Regex::new(r"(?i)^(?:correct\s+answer|answer)\s*\**\s*[:\-]\s*\**\s*(.*)$").unwrap();
    /// `**bold**` spans anywhere in a line.
    static ref BOLD_RE: Regex = Regex::new(r"\*\*(.+?)\*\*").unwrap();
}

/// Strip markdown decoration the model likes to add: headings, bullets, bold.
fn clean_line(line: &str) -> String {
    let line = line.trim().trim_start_matches('#').trim();
    let line = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("+ "))
        .unwrap_or(line);
    BOLD_RE.replace_all(line, "$1").trim().to_string()
}

/// Text following a question-boundary marker, or `None` if the line is not one.
fn question_start(line: &str) -> Option<String> {
    QUESTION_RE
        .captures(line)
        .map(|caps| caps.get(1).map_or("", |m| m.as_str()).trim().to_string())
}

fn answer_text(line: &str) -> Option<String> {
    ANSWER_RE.captures(line).map(|caps| {
        caps.get(1)
            .map_or("", |m| m.as_str())
            .trim()
            .trim_end_matches('*')
            .trim_end()
            .to_string()
    })
}

/// Group cleaned lines into one block per question-boundary marker.
///
/// Text before the first marker is dropped as preamble. When no marker
/// appears at all, the whole input is treated as a single block.
pub(crate) fn split_blocks(raw: &str) -> Vec<Vec<String>> {
    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut seen_boundary = false;

    for line in raw.lines().map(clean_line) {
        if let Some(rest) = question_start(&line) {
            if seen_boundary {
                blocks.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
            seen_boundary = true;
            current.push(rest);
        } else {
            current.push(line);
        }
    }

    if seen_boundary || current.iter().any(|l| !l.is_empty()) {
        blocks.push(current);
    }

    blocks
}

/// Turn one block into a question.
///
/// The first non-empty line is the question, lettered lines are options in
/// order of appearance, and the first `Answer:` line names the correct one.
pub(crate) fn parse_block(lines: &[String]) -> Result<QuizQuestion, QuestionError> {
    let mut lines = lines.iter().map(String::as_str).filter(|l| !l.is_empty());

    let text = match lines.next() {
        Some(first) if split_option_marker(first).is_none() && answer_text(first).is_none() => {
            first
        }
        _ => return Err(QuestionError::EmptyText),
    };

    let mut options = Vec::new();
    let mut markers = Vec::new();
    let mut answer: Option<String> = None;

    for line in lines {
        if let Some(found) = answer_text(line) {
            if answer.is_none() {
                answer = Some(found);
            }
        } else if let Some((marker, option)) = split_option_marker(line) {
            markers.push(marker);
            options.push(option.to_string());
        }
    }

    if options.is_empty() {
        return Err(QuestionError::NoOptions);
    }

    let answer = answer.ok_or(QuestionError::MissingField("answer"))?;
    let idx = resolve_text_answer(&answer, &options, &markers)?;
    let correct = options[idx].clone();
    QuizQuestion::new(text, options, Answer::Text(correct))
}

/// Parse every block, keeping the accepted questions in order.
pub(crate) fn parse_blocks(
    blocks: &[Vec<String>],
) -> (Vec<QuizQuestion>, Vec<ExtractionError>) {
    let mut questions = Vec::new();
    let mut warnings = Vec::new();

    for (index, block) in blocks.iter().enumerate() {
        match parse_block(block) {
            Ok(q) => questions.push(q),
            Err(e) => {
                log::warn!("dropping free-text block {}: {}", index, e);
                warnings.push(ExtractionError::UnparsableBlock {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }

    (questions, warnings)
}
