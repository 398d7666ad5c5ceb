use serde::{Deserialize, Deserializer, Serialize};

/// NLP result attached to one assistant reply
///
/// Every part is independently optional; the backend omits whatever its
/// models could not produce.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,

    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<Entity>,

    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<Keyword>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_stats: Option<TextStats>,
}

impl Analysis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_intent(mut self, primary: impl Into<String>, confidence: f64) -> Self {
        self.intent = Some(Intent::new(primary, confidence));
        self
    }

    pub fn with_sentiment(mut self, label: SentimentLabel, confidence: Option<f64>) -> Self {
        self.sentiment = Some(Sentiment { sentiment: label, confidence });
        self
    }

    pub fn with_entity(mut self, text: impl Into<String>, label: impl Into<String>) -> Self {
        self.entities.push(Entity::new(text, label));
        self
    }

    pub fn with_keyword(mut self, word: impl Into<String>) -> Self {
        self.keywords.push(Keyword::new(word));
        self
    }

    pub fn with_text_stats(mut self, stats: TextStats) -> Self {
        self.text_stats = Some(stats);
        self
    }

    /// True when the backend sent nothing worth rendering
    pub fn is_empty(&self) -> bool {
        self.intent.is_none()
            && self.sentiment.is_none()
            && self.entities.is_empty()
            && self.keywords.is_empty()
            && self.text_stats.is_none()
    }
}

/// Classified conversational purpose (greeting, question, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub primary: String,
    /// In `[0, 1]`
    pub confidence: f64,
}

impl Intent {
    pub fn new(primary: impl Into<String>, confidence: f64) -> Self {
        Self {
            primary: primary.into(),
            confidence,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    /// Any label this client does not know about
    #[serde(other)]
    Other,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub sentiment: SentimentLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Named span extracted from the text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
}

impl Entity {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub word: String,
}

impl Keyword {
    pub fn new(word: impl Into<String>) -> Self {
        Self { word: word.into() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    #[serde(default)]
    pub word_count: u64,
    #[serde(default)]
    pub character_count: u64,
    #[serde(default)]
    pub sentence_count: u64,
}

impl TextStats {
    pub fn new(word_count: u64, character_count: u64, sentence_count: u64) -> Self {
        Self {
            word_count,
            character_count,
            sentence_count,
        }
    }
}

// The backend sends `null` instead of `[]` when a model is not loaded
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
