use crate::config::QuizConfig;

pub const SYSTEM_PROMPT: &str =
    "You are a quiz author for a software bootcamp. Respond ONLY with valid JSON.";

/// Instruction sent to the model; its reply is what `extract` consumes.
pub fn generation_prompt(config: &QuizConfig) -> String {
    format!(
        r#"Create {count} multiple-choice questions about {topic}.

IMPORTANT:

- Provide exactly {options} options per question and indicate the correct answer.
- Respond ONLY with a valid JSON array (no markdown, no extra text) where each object is:
{{
    "question": "question text",
    "options": ["option 1", "option 2", ...],
    "correct": integer index of the correct option, starting from 0
}}
"#,
        count = config.question_count,
        topic = config.topic,
        options = config.extractor.options_per_question,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_uses_config() {
        let mut config = QuizConfig::default();
        config.question_count = 7;
        config.topic = "Git stash".to_string();

        let prompt = generation_prompt(&config);
        assert!(prompt.starts_with("Create 7 multiple-choice questions about Git stash."));
        assert!(prompt.contains("exactly 4 options"));
        assert!(prompt.contains("\"correct\": integer index"));
    }
}
