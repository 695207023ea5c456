//! Rule-based replies used when no provider is configured or a provider fails.

pub const GREETING: &str = "Hello! I'm here to help. You can ask me questions about this application or configure me with an AI API key for more advanced responses.";

pub const HELP: &str = "I can answer questions and assist you with this application. Currently, I'm running in basic mode. To unlock AI-powered responses, add OPENAI_API_KEY or ANTHROPIC_API_KEY to your backend .env file.";

pub const FEATURES: &str = "This is a full-stack web application with authentication, database integration, and more. Feel free to explore the codebase or ask me specific questions!";

pub const CONFIGURE: &str = "To configure AI responses:

1. Get an API key from OpenAI or Anthropic
2. Add it to backend/.env:
   OPENAI_API_KEY=sk-...
   or
   ANTHROPIC_API_KEY=sk-ant-...
3. Restart the backend

Then I'll be powered by AI!";

pub const CLOSING: &str = "You're welcome! Let me know if you need anything else.";

pub const DEFAULT: &str = "I received your message! I'm currently in basic mode with limited responses. For more intelligent conversations, configure an AI API key (OpenAI or Anthropic) in your backend environment variables.";

/// A reply picked when any of its patterns occurs in the lowercased message.
struct Rule {
    patterns: &'static [&'static str],
    reply: &'static str,
}

// Order matters: the first matching rule wins.
const RULES: &[Rule] = &[
    Rule {
        patterns: &["hello", "hi", "hey", "greetings"],
        reply: GREETING,
    },
    Rule {
        patterns: &["help", "what can you do", "how do you work"],
        reply: HELP,
    },
    Rule {
        patterns: &["feature", "what", "how"],
        reply: FEATURES,
    },
    Rule {
        patterns: &["api", "configure", "setup", "install"],
        reply: CONFIGURE,
    },
    Rule {
        patterns: &["thank", "thanks", "bye", "goodbye"],
        reply: CLOSING,
    },
];

/// Pick a canned reply for `message`.
///
/// Patterns are plain substrings, so "hi" also matches inside "this" or
/// "anything".
pub fn basic_response(message: &str) -> &'static str {
    let lower = message.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.patterns.iter().any(|p| lower.contains(p)))
        .map_or(DEFAULT, |rule| rule.reply)
}
