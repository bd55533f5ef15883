//! Prompt and Narration Templates
//!
//! Fixed text sent to the backends. Everything here is a pure function of
//! its inputs.

/// System instruction sent with every idea request.
pub const SYSTEM_INSTRUCTION: &str = "You are an intelligent assistant.";

/// Number of ideas the prompt asks the model for.
pub const DEFAULT_IDEA_COUNT: usize = 5;

/// Output-format rules appended to every idea prompt.
pub const FORMAT_RULES: &str = "\
Each idea must be formatted as:
<number>. <Title>: <Description>

Rules:
- Always include a colon \":\" between the idea title and its description.
- Use exactly one blank line between ideas.
- Do not include bullet points or parentheses.
- Example format:

1. Smart Roofs: Solar panels that change color to adjust heat absorption.

2. Floating Stages: Modular stages that hover above crowds.

Return only the list, nothing else.";

/// Builds the idea prompt for `topic`, asking for [`DEFAULT_IDEA_COUNT`] ideas.
pub fn build_ideas_prompt(topic: &str) -> String {
    build_ideas_prompt_with_count(topic, DEFAULT_IDEA_COUNT)
}

/// Builds the idea prompt for `topic`, asking for `count` ideas.
pub fn build_ideas_prompt_with_count(topic: &str, count: usize) -> String {
    let message = format!(
        "Give me a list of {count} ideas for the future of {topic} in the context of convention centers.\n{FORMAT_RULES}"
    );
    message.trim().to_string()
}

/// Narration for the once-per-topic intro clip.
pub fn intro_narration(topic: &str) -> String {
    format!(
        "Beep Boop. Hello. I am a bot made for ImagineThat. You are interested in the future of {topic}. Beep Boop."
    )
}

/// Narration for a single idea, given its combined `"<title>: <description>"` text.
pub fn idea_narration(combined_text: &str) -> String {
    format!("Beep Boop. Beep Boop. Here is an idea. Consider {combined_text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_topic_and_rules() {
        let prompt = build_ideas_prompt("Arena");

        assert!(prompt.contains("future of Arena"));
        assert!(prompt.contains(FORMAT_RULES));
        assert!(prompt.starts_with("Give me a list of 5 ideas"));
        assert!(prompt.ends_with("Return only the list, nothing else."));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(
            build_ideas_prompt("Urban Park"),
            build_ideas_prompt("Urban Park")
        );
    }

    #[test]
    fn test_prompt_with_custom_count() {
        let prompt = build_ideas_prompt_with_count("Convention Center", 3);
        assert!(prompt.starts_with(
            "Give me a list of 3 ideas for the future of Convention Center in the context of convention centers."
        ));
    }

    #[test]
    fn test_prompt_keeps_topic_verbatim() {
        let prompt = build_ideas_prompt("{count} $5 stadiums");
        assert!(prompt.contains("future of {count} $5 stadiums"));
    }

    #[test]
    fn test_prompt_is_trimmed() {
        let prompt = build_ideas_prompt("  ");
        assert_eq!(prompt, prompt.trim());
    }

    #[test]
    fn test_narrations() {
        assert_eq!(
            intro_narration("Arena"),
            "Beep Boop. Hello. I am a bot made for ImagineThat. You are interested in the future of Arena. Beep Boop."
        );
        assert_eq!(
            idea_narration("Smart Roofs: Solar panels."),
            "Beep Boop. Beep Boop. Here is an idea. Consider Smart Roofs: Solar panels."
        );
    }
}
