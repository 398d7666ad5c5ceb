use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Readiness of the backend's NLP model families
///
/// The names are backend-defined; the client only displays them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStatus {
    #[serde(default)]
    pub spacy: bool,
    #[serde(default)]
    pub transformers: bool,
    #[serde(default)]
    pub nltk: bool,
}

impl ModelStatus {
    pub fn new(spacy: bool, transformers: bool, nltk: bool) -> Self {
        Self {
            spacy,
            transformers,
            nltk,
        }
    }

    /// All flags false
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all_ready(&self) -> bool {
        self.spacy && self.transformers && self.nltk
    }

    pub fn ready_count(&self) -> usize {
        [self.spacy, self.transformers, self.nltk]
            .iter()
            .filter(|ready| **ready)
            .count()
    }
}

/// Body of `GET /api/health`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models_loaded: Option<ModelStatus>,
}

/// Last known backend reachability, as published by the health monitor
///
/// Always replaced wholesale. Before the first check `last_checked_at` and
/// `models` are `None`; after a failed check `models` is all-false rather than
/// the last good snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConnectivityState {
    pub connected: bool,
    pub models: Option<ModelStatus>,
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl ConnectivityState {
    /// State before any check has completed
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn reachable(models: ModelStatus) -> Self {
        Self {
            connected: true,
            models: Some(models),
            last_checked_at: Some(Utc::now()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            connected: false,
            models: Some(ModelStatus::none()),
            last_checked_at: Some(Utc::now()),
        }
    }

    pub fn is_checked(&self) -> bool {
        self.last_checked_at.is_some()
    }

    /// Model flags, all false when unknown
    pub fn models_ready(&self) -> ModelStatus {
        self.models.unwrap_or_default()
    }
}
