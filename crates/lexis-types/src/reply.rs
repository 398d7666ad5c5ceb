use crate::analysis::Analysis;
use serde::{Deserialize, Serialize};

/// Body of a successful `POST /api/chat`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
    /// Seconds spent on the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
}

impl ChatReply {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            analysis: None,
            processing_time: None,
        }
    }

    pub fn with_analysis(mut self, analysis: Analysis) -> Self {
        self.analysis = Some(analysis);
        self
    }

    pub fn with_processing_time(mut self, seconds: f64) -> Self {
        self.processing_time = Some(seconds);
        self
    }
}
