use crate::error::QuestionError;
use regex::Regex;

lazy_static::lazy_static! {
    /// `a) text`, `(B) text`, `c. text`, `D: text`
    static ref OPTION_MARKER_RE: Regex =
        Regex::new(r"^\(?([A-Za-z])(?:\)\s*|[.:]\s+)(\S.*)$").unwrap();
    /// A lone option letter: `c`, `C)`, `(c)`, `c.`
    static ref BARE_LETTER_RE: Regex = Regex::new(r"^\(?([A-Za-z])[).:]?$").unwrap();
}

/// Shorten text for log lines without splitting a character.
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

/// Comparison key for answers: case folded, whitespace runs collapsed.
pub fn normalize_answer(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Split a lettered option line into its lowercase marker and the option text.
pub fn split_option_marker(line: &str) -> Option<(char, &str)> {
    let caps = OPTION_MARKER_RE.captures(line.trim())?;
    let letter = caps.get(1)?.as_str().chars().next()?.to_ascii_lowercase();
    let text = caps.get(2)?.as_str().trim();
    Some((letter, text))
}

pub fn bare_letter(s: &str) -> Option<char> {
    let caps = BARE_LETTER_RE.captures(s.trim())?;
    caps.get(1)?
        .as_str()
        .chars()
        .next()
        .map(|c| c.to_ascii_lowercase())
}

/// Positional markers `a`, `b`, `c`, ... for options that arrived without any.
pub fn positional_markers(count: usize) -> Vec<char> {
    ('a'..='z').take(count).collect()
}

fn unique_position<I>(mut hits: I, raw: &str) -> Result<Option<usize>, QuestionError>
where
    I: Iterator<Item = usize>,
{
    match (hits.next(), hits.next()) {
        (None, _) => Ok(None),
        (Some(idx), None) => Ok(Some(idx)),
        (Some(_), Some(_)) => Err(QuestionError::AmbiguousAnswer(raw.to_string())),
    }
}

fn match_text(key: &str, options: &[String], raw: &str) -> Result<Option<usize>, QuestionError> {
    let key = normalize_answer(key);
    let hits = options
        .iter()
        .enumerate()
        .filter(|(_, opt)| normalize_answer(opt) == key)
        .map(|(idx, _)| idx);
    unique_position(hits, raw)
}

/// Resolve a textual answer to the index of exactly one option.
///
/// Tried in order: the whole answer against option text, the answer with a
/// marker prefix removed (`b) fruit`), then a bare letter against `markers`.
/// No partial or fuzzy matching.
pub fn resolve_text_answer(
    raw: &str,
    options: &[String],
    markers: &[char],
) -> Result<usize, QuestionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(QuestionError::EmptyAnswer(raw.to_string()));
    }

    if let Some(idx) = match_text(trimmed, options, trimmed)? {
        return Ok(idx);
    }

    let mut letter = bare_letter(trimmed);
    if let Some((marker, rest)) = split_option_marker(trimmed) {
        if let Some(idx) = match_text(rest, options, trimmed)? {
            return Ok(idx);
        }
        letter = letter.or(Some(marker));
    }

    if let Some(letter) = letter {
        let hits = markers
            .iter()
            .take(options.len())
            .enumerate()
            .filter(|(_, m)| **m == letter)
            .map(|(idx, _)| idx);
        if let Some(idx) = unique_position(hits, trimmed)? {
            return Ok(idx);
        }
    }

    Err(QuestionError::UnmatchedAnswer(trimmed.to_string()))
}
