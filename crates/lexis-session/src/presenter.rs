//! Display derivation for analysis payloads, messages and connectivity.
//!
//! Everything here is a pure function of its inputs. Fields missing from an
//! [`Analysis`] produce no line at all, never placeholder text.

use chrono::{DateTime, Utc};
use lexis_types::{Analysis, Message, ModelStatus, SentimentLabel};
use serde::Serialize;

/// Entities beyond this count are not shown
pub const MAX_ENTITIES: usize = 3;
/// Keywords beyond this count are not shown
pub const MAX_KEYWORDS: usize = 4;

pub const INTENT_FALLBACK_EMOJI: &str = "💬";
pub const SENTIMENT_FALLBACK_EMOJI: &str = "🤖";
pub const ERROR_MARKER: &str = "❌";

/// Emoji, label and optional rounded confidence for intent or sentiment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorLine {
    pub emoji: &'static str,
    pub label: String,
    pub percent: Option<u32>,
}

impl IndicatorLine {
    fn new(emoji: &'static str, label: impl Into<String>, confidence: Option<f64>) -> Self {
        Self {
            emoji,
            label: label.into(),
            percent: confidence.map(to_percent),
        }
    }
}

impl std::fmt::Display for IndicatorLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.emoji, self.label)?;
        if let Some(percent) = self.percent {
            write!(f, " ({}%)", percent)?;
        }
        Ok(())
    }
}

/// Display-ready summary of one [`Analysis`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayBlock {
    pub intent: Option<IndicatorLine>,
    pub sentiment: Option<IndicatorLine>,
    /// `"{text} ({label})"` chips
    pub entities: Vec<String>,
    pub keywords: Vec<String>,
    pub stats: Option<String>,
}

impl DisplayBlock {
    pub fn is_empty(&self) -> bool {
        self.intent.is_none()
            && self.sentiment.is_none()
            && self.entities.is_empty()
            && self.keywords.is_empty()
            && self.stats.is_none()
    }

    /// Plain-text rendering, one line per present field
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(intent) = &self.intent {
            lines.push(format!("Intent: {}", intent));
        }
        if let Some(sentiment) = &self.sentiment {
            lines.push(format!("Sentiment: {}", sentiment));
        }
        if !self.entities.is_empty() {
            lines.push(format!("Entities: {}", self.entities.join(", ")));
        }
        if !self.keywords.is_empty() {
            lines.push(format!("Keywords: {}", self.keywords.join(", ")));
        }
        if let Some(stats) = &self.stats {
            lines.push(stats.clone());
        }
        lines
    }
}

pub fn present(analysis: &Analysis) -> DisplayBlock {
    DisplayBlock {
        intent: analysis.intent.as_ref().map(|intent| {
            IndicatorLine::new(
                intent_emoji(&intent.primary),
                intent.primary.clone(),
                Some(intent.confidence),
            )
        }),
        sentiment: analysis.sentiment.as_ref().map(|sentiment| {
            IndicatorLine::new(
                sentiment_emoji(sentiment.sentiment),
                sentiment.sentiment.as_str(),
                // A zero sentiment confidence means "not scored"
                sentiment.confidence.filter(|confidence| *confidence != 0.0),
            )
        }),
        entities: analysis
            .entities
            .iter()
            .take(MAX_ENTITIES)
            .map(|entity| format!("{} ({})", entity.text, entity.label))
            .collect(),
        keywords: analysis
            .keywords
            .iter()
            .take(MAX_KEYWORDS)
            .map(|keyword| keyword.word.clone())
            .collect(),
        stats: analysis.text_stats.as_ref().map(|stats| {
            format!(
                "{} words, {} chars, {} sentences",
                stats.word_count, stats.character_count, stats.sentence_count
            )
        }),
    }
}

pub fn intent_emoji(intent: &str) -> &'static str {
    match intent {
        "greeting" | "goodbye" => "👋",
        "question" => "❓",
        "request_help" => "🆘",
        "weather" => "🌤️",
        "time_date" => "⏰",
        "compliment" => "👍",
        "complaint" => "😞",
        _ => INTENT_FALLBACK_EMOJI,
    }
}

pub fn sentiment_emoji(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "😊",
        SentimentLabel::Negative => "😔",
        SentimentLabel::Neutral => "😐",
        SentimentLabel::Other => SENTIMENT_FALLBACK_EMOJI,
    }
}

fn to_percent(confidence: f64) -> u32 {
    if !confidence.is_finite() {
        return 0;
    }
    (confidence * 100.0).round().clamp(0.0, 100.0) as u32
}

/// "Just now", "{m}m ago", "{h}h ago", then the calendar date
pub fn relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - timestamp).num_minutes();
    match minutes {
        m if m < 1 => "Just now".to_string(),
        m if m < 60 => format!("{}m ago", m),
        m if m < 24 * 60 => format!("{}h ago", m / 60),
        _ => timestamp.format("%-m/%-d/%Y").to_string(),
    }
}

pub fn processing_badge(seconds: f64) -> String {
    format!("⚡ {}s", seconds)
}

/// Footer shown under a message bubble
pub fn message_footer(message: &Message, now: DateTime<Utc>) -> String {
    let mut parts = vec![relative_time(message.timestamp(), now)];
    if let Some(seconds) = message.processing_time() {
        parts.push(processing_badge(seconds));
    }
    if message.is_error() {
        parts.push(ERROR_MARKER.to_string());
    }
    parts.join("  ")
}

pub fn composer_placeholder(connected: bool, awaiting_response: bool) -> &'static str {
    if !connected {
        "Connecting to AI assistant..."
    } else if awaiting_response {
        "AI is thinking..."
    } else {
        "Type your message..."
    }
}

pub fn character_counter(input: &str, max_chars: usize) -> String {
    format!("{}/{}", input.chars().count(), max_chars)
}

pub fn connection_label(connected: bool) -> &'static str {
    if connected {
        "Connected"
    } else {
        "Disconnected"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelIndicator {
    pub name: &'static str,
    pub loaded: bool,
}

impl std::fmt::Display for ModelIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mark = if self.loaded { "●" } else { "○" };
        write!(f, "{} {}", mark, self.name)
    }
}

pub fn model_indicators(models: &ModelStatus) -> [ModelIndicator; 3] {
    [
        ModelIndicator {
            name: "spaCy",
            loaded: models.spacy,
        },
        ModelIndicator {
            name: "Transformers",
            loaded: models.transformers,
        },
        ModelIndicator {
            name: "NLTK",
            loaded: models.nltk,
        },
    ]
}
