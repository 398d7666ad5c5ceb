use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_INPUT_CHARS: usize = 2000;

pub const DEFAULT_GREETING: &str = "🚀 Hello! I'm your AI assistant powered by advanced NLP models. \
I can help you with questions, text analysis, and much more. How can I assist you today?";

pub const DEFAULT_RESET_GREETING: &str = "🚀 Hello! I'm your AI assistant. How can I help you today?";

/// Behaviour of the conversation controller
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationOptions {
    /// Welcome text seeded by `initialize()`
    pub greeting: String,
    /// Welcome text seeded by `clear()`
    pub reset_greeting: String,
    /// Longer inputs are rejected
    pub max_input_chars: usize,
    /// Pause between accepting a message and posting it
    pub reply_delay: Duration,
}

impl Default for ConversationOptions {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            reset_greeting: DEFAULT_RESET_GREETING.to_string(),
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            reply_delay: Duration::ZERO,
        }
    }
}

impl ConversationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn greeting(mut self, text: impl Into<String>) -> Self {
        self.greeting = text.into();
        self
    }

    pub fn reset_greeting(mut self, text: impl Into<String>) -> Self {
        self.reset_greeting = text.into();
        self
    }

    pub fn max_input_chars(mut self, max: usize) -> Self {
        self.max_input_chars = max;
        self
    }

    pub fn reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub poll_interval: Duration,
    pub conversation: ConversationOptions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            conversation: ConversationOptions::default(),
        }
    }
}

impl SessionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn conversation(mut self, options: ConversationOptions) -> Self {
        self.conversation = options;
        self
    }
}
