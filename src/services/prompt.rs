//! Prompt assembly for grounded, conversation-aware generation.

use std::fmt::Write as FmtWrite;

use crate::models::Turn;

const PREAMBLE: &str = "You are a friendly chatbot helping users with FAFSA and student aid.\n\
Keep responses concise, engaging, and helpful.";

/// Render the generation prompt from the session history, the new query, and
/// the retrieved content. Purely textual and deterministic: the same inputs
/// always produce the same prompt. History is serialized oldest-first as
/// `User:`/`Bot:` line pairs.
pub fn build_prompt(history: &[Turn], query: &str, content: &str, source_url: &str) -> String {
    let mut chat_history = String::new();
    for turn in history {
        let _ = writeln!(chat_history, "User: {}", turn.user);
        let _ = writeln!(chat_history, "Bot: {}", turn.bot);
    }

    format!(
        "{PREAMBLE}\n\n\
         Previous conversation:\n\
         {chat_history}\n\
         The user just asked: \"{query}\"\n\
         Here is relevant information from a trusted source:\n\
         {content}\n\n\
         Respond in a friendly, natural way and include the source link: {source_url}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_query_and_retrieved_content() {
        let prompt = build_prompt(
            &[],
            "How do I apply for FAFSA?",
            "Visit fafsa.gov to start...",
            "https://fafsa.gov",
        );

        assert!(prompt.contains("How do I apply for FAFSA?"));
        assert!(prompt.contains("Visit fafsa.gov to start..."));
        assert!(prompt.contains("https://fafsa.gov"));
    }

    #[test]
    fn history_is_serialized_oldest_first() {
        let history = vec![Turn::new("first question", "first answer"), Turn::new("second question", "second answer")];
        let prompt = build_prompt(&history, "third question", "context", "https://src.gov");

        let first = prompt.find("User: first question").unwrap();
        let second = prompt.find("User: second question").unwrap();
        assert!(first < second);
        assert!(prompt.contains("Bot: first answer"));
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let history = vec![Turn::new("q", "a")];
        let a = build_prompt(&history, "query", "content", "url");
        let b = build_prompt(&history, "query", "content", "url");
        assert_eq!(a, b);
    }
}
