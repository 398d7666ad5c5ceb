use crate::analysis::Analysis;
use crate::reply::ChatReply;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Message key used for list diffing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out creation-time derived ids (epoch millis), bumped so that every
/// id is strictly greater than the previous one.
#[derive(Debug, Default)]
pub struct MessageIdGenerator {
    last: AtomicU64,
}

impl MessageIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> MessageId {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let bump = |last: u64| now.max(last + 1);
        let previous = match self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(bump(last)))
        {
            Ok(previous) | Err(previous) => previous,
        };
        MessageId(bump(previous))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One turn in the conversation
///
/// Only the constructors below can build a message, which keeps user turns
/// free of analysis, processing time and the error flag. Messages are never
/// mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    id: MessageId,
    text: String,
    sender: Sender,
    timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis: Option<Analysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    processing_time: Option<f64>,
    is_error: bool,
}

impl Message {
    /// User turn with the raw input text
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self::plain(id, Sender::User, text.into(), false)
    }

    /// Assistant turn with no analysis, e.g. the welcome message
    pub fn assistant(id: MessageId, text: impl Into<String>) -> Self {
        Self::plain(id, Sender::Assistant, text.into(), false)
    }

    /// Assistant turn built from a successful backend reply
    pub fn reply(id: MessageId, reply: ChatReply) -> Self {
        Self {
            id,
            text: reply.response,
            sender: Sender::Assistant,
            timestamp: Utc::now(),
            analysis: reply.analysis,
            processing_time: reply.processing_time,
            is_error: false,
        }
    }

    /// Synthesized assistant turn standing in for a failed send
    pub fn error(id: MessageId, text: impl Into<String>) -> Self {
        Self::plain(id, Sender::Assistant, text.into(), true)
    }

    fn plain(id: MessageId, sender: Sender, text: String, is_error: bool) -> Self {
        Self {
            id,
            text,
            sender,
            timestamp: Utc::now(),
            analysis: None,
            processing_time: None,
            is_error,
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    pub fn processing_time(&self) -> Option<f64> {
        self.processing_time
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}
