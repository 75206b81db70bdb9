//! Phase one: locate a JSON array of question objects inside the model output.

use crate::config::ExtractorConfig;
use crate::error::{ExtractionError, QuestionError};
use crate::models::{Answer, QuizQuestion};
use crate::utils::{positional_markers, resolve_text_answer};
use serde_json::{Map, Value};

const QUESTION_KEYS: &[&str] = &["question", "text"];
const OPTION_KEYS: &[&str] = &["options", "choices"];
const ANSWER_KEYS: &[&str] = &["correct", "correct_index", "answer", "correct_answer"];

/// Upper bound on `[` positions tried as the start of the structured block.
pub(crate) const MAX_BLOCK_CANDIDATES: usize = 64;

/// Byte offset of the `]` closing the `[` at `start`.
///
/// Brackets inside double-quoted strings are ignored and backslash escapes
/// are honoured. `None` when the bracket is never closed.
pub(crate) fn matching_bracket(raw: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in raw[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }

    None
}

/// Elements of the first bracketed span that parses as an array containing
/// at least one object. Prose, code fences and stray brackets around it are
/// skipped. Only the first `MAX_BLOCK_CANDIDATES` brackets are tried.
pub(crate) fn find_structured_block(raw: &str) -> Option<Vec<Value>> {
    for (tried, (start, _)) in raw.match_indices('[').enumerate() {
        if tried == MAX_BLOCK_CANDIDATES {
            log::debug!(
                "gave up on structured block after {} candidate brackets",
                MAX_BLOCK_CANDIDATES
            );
            break;
        }

        let Some(end) = matching_bracket(raw, start) else {
            continue;
        };

        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(&raw[start..=end])
            && items.iter().any(Value::is_object)
        {
            log::debug!(
                "structured block found at bytes {}..={} with {} elements",
                start,
                end,
                items.len()
            );
            return Some(items);
        }
    }

    None
}

fn field<'a>(
    obj: &'a Map<String, Value>,
    keys: &[&'static str],
) -> Result<&'a Value, QuestionError> {
    keys.iter()
        .find_map(|k| obj.get(*k))
        .ok_or(QuestionError::MissingField(keys[0]))
}

fn parse_answer(value: &Value, options: &[String]) -> Result<Answer, QuestionError> {
    match value {
        Value::Number(n) => {
            let index = n.as_u64().ok_or(QuestionError::WrongType("correct"))?;
            let index = usize::try_from(index).map_err(|_| QuestionError::IndexOutOfRange {
                index: usize::MAX,
                len: options.len(),
            })?;
            Ok(Answer::Index(index))
        }
        Value::String(s) => {
            let idx = resolve_text_answer(s, options, &positional_markers(options.len()))?;
            Ok(Answer::Text(options[idx].trim().to_string()))
        }
        _ => Err(QuestionError::WrongType("correct")),
    }
}

/// Validate one array element against the question schema.
pub(crate) fn parse_element(
    value: &Value,
    config: &ExtractorConfig,
) -> Result<QuizQuestion, QuestionError> {
    let obj = value.as_object().ok_or(QuestionError::WrongType("element"))?;

    let text = field(obj, QUESTION_KEYS)?
        .as_str()
        .ok_or(QuestionError::WrongType("question"))?;

    let options = field(obj, OPTION_KEYS)?
        .as_array()
        .ok_or(QuestionError::WrongType("options"))?
        .iter()
        .map(|o| o.as_str().map(str::to_string))
        .collect::<Option<Vec<String>>>()
        .ok_or(QuestionError::WrongType("options"))?;

    if options.len() != config.options_per_question {
        return Err(QuestionError::OptionCount {
            expected: config.options_per_question,
            found: options.len(),
        });
    }

    let answer = parse_answer(field(obj, ANSWER_KEYS)?, &options)?;
    QuizQuestion::new(text, options, answer)
}

/// Keep every valid element in order; each rejected one becomes a warning.
pub(crate) fn parse_elements(
    items: &[Value],
    config: &ExtractorConfig,
) -> (Vec<QuizQuestion>, Vec<ExtractionError>) {
    let mut questions = Vec::with_capacity(items.len());
    let mut warnings = Vec::new();

    for (index, item) in items.iter().enumerate() {
        match parse_element(item, config) {
            Ok(q) => questions.push(q),
            Err(e) => {
                log::warn!("dropping structured element {}: {}", index, e);
                warnings.push(ExtractionError::MalformedStructuredBlock {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }

    (questions, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_matching_bracket_nested() {
        let raw = r#"x [[1, 2], [3]] y"#;
        assert_eq!(matching_bracket(raw, 2), Some(14));
        assert_eq!(matching_bracket(raw, 3), Some(8));
    }

    #[test]
    fn test_matching_bracket_ignores_quoted_brackets() {
        let raw = r#"["a ] b", "c \" ] d"]"#;
        assert_eq!(matching_bracket(raw, 0), Some(raw.len() - 1));
    }

    #[test]
    fn test_matching_bracket_unclosed() {
        assert_eq!(matching_bracket("[1, [2]", 0), None);
    }

    #[test]
    fn test_find_block_in_prose() {
        let raw = r#"Sure! Here are your questions:
[{"question": "Q1", "options": ["a", "b", "c", "d"], "correct": 0}]
Good luck!"#;
        let items = find_structured_block(raw).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_find_block_in_code_fence() {
        let raw = concat!(
            "```json\n",
            r#"[{"question": "Q1", "options": ["a","b","c","d"], "correct": 1}]"#,
            "\n```"
        );
        assert!(find_structured_block(raw).is_some());
    }

    #[test]
    fn test_find_block_skips_non_json_brackets() {
        let raw = concat!(
            "[note] see below ",
            r#"[{"question": "Q1", "options": ["a","b","c","d"], "correct": 3}]"#
        );
        let items = find_structured_block(raw).unwrap();
        assert_eq!(items[0]["correct"], json!(3));
    }

    #[test]
    fn test_find_block_requires_objects() {
        assert!(find_structured_block(r#"["a", "b"]"#).is_none());
        assert!(find_structured_block("no brackets here").is_none());
    }

    #[test]
    fn test_find_block_stops_after_candidate_limit() {
        let noise = "[".repeat(40_000);
        assert!(find_structured_block(&noise).is_none());

        let element = r#"{"question": "Q1", "options": ["a","b","c","d"], "correct": 0}"#;
        let within = format!("{} [{}]", "[x] ".repeat(MAX_BLOCK_CANDIDATES - 1), element);
        assert!(find_structured_block(&within).is_some());

        let beyond = format!("{} [{}]", "[x] ".repeat(MAX_BLOCK_CANDIDATES), element);
        assert!(find_structured_block(&beyond).is_none());
    }

    #[test]
    fn test_parse_element_huge_index() {
        let config = ExtractorConfig::default();
        let v = json!({"question": "Q", "options": ["a", "b", "c", "d"], "correct": u64::MAX});
        assert_eq!(
            parse_element(&v, &config),
            Err(QuestionError::IndexOutOfRange {
                index: usize::MAX,
                len: 4
            })
        );

        let v = json!({"question": "Q", "options": ["a", "b", "c", "d"], "correct": 4294967298u64});
        assert!(matches!(
            parse_element(&v, &config),
            Err(QuestionError::IndexOutOfRange { len: 4, .. })
        ));
    }

    #[test]
    fn test_parse_element_index() {
        let v = json!({"question": "Q1", "options": ["a", "b", "c", "d"], "correct": 2});
        let q = parse_element(&v, &ExtractorConfig::default()).unwrap();
        assert!(q.is_correct("c"));
        assert_eq!(q.answer(), &Answer::Index(2));
    }

    #[test]
    fn test_parse_element_aliases_and_text_answer() {
        let v = json!({
            "text": "Which command records changes?",
            "choices": ["git add", "git commit", "git log", "git status"],
            "answer": "B"
        });
        let q = parse_element(&v, &ExtractorConfig::default()).unwrap();
        assert_eq!(q.answer(), &Answer::Text("git commit".to_string()));
        assert!(q.is_correct("git commit"));
    }

    #[test]
    fn test_parse_element_rejections() {
        let config = ExtractorConfig::default();
        let cases = [
            (json!("just a string"), QuestionError::WrongType("element")),
            (
                json!({"options": ["a", "b", "c", "d"], "correct": 0}),
                QuestionError::MissingField("question"),
            ),
            (
                json!({"question": "Q", "options": ["a", "b", "c"], "correct": 0}),
                QuestionError::OptionCount {
                    expected: 4,
                    found: 3,
                },
            ),
            (
                json!({"question": "Q", "options": ["a", "b", "c", "d"], "correct": 4}),
                QuestionError::IndexOutOfRange { index: 4, len: 4 },
            ),
            (
                json!({"question": "Q", "options": ["a", "b", "c", "d"], "correct": -1}),
                QuestionError::WrongType("correct"),
            ),
            (
                json!({"question": "Q", "options": ["a", "b", 3, "d"], "correct": 0}),
                QuestionError::WrongType("options"),
            ),
            (
                json!({"question": "Q", "options": ["a", "b", "c", "d"]}),
                QuestionError::MissingField("correct"),
            ),
        ];

        for (value, expected) in cases {
            assert_eq!(parse_element(&value, &config), Err(expected));
        }
    }

    #[test]
    fn test_parse_elements_drops_invalid_in_order() {
        let items = vec![
            json!({"question": "Q1", "options": ["a", "b", "c", "d"], "correct": 0}),
            json!({"question": "Q2", "options": ["a", "b"], "correct": 0}),
            json!({"question": "Q3", "options": ["a", "b", "c", "d"], "correct": 3}),
        ];
        let (questions, warnings) = parse_elements(&items, &ExtractorConfig::default());
        let texts: Vec<&str> = questions.iter().map(|q| q.text()).collect();
        assert_eq!(texts, vec!["Q1", "Q3"]);
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            ExtractionError::MalformedStructuredBlock { index: 1, .. }
        ));
    }
}
