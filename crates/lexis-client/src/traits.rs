use crate::error::Result;
use async_trait::async_trait;
use lexis_types::{ChatReply, HealthStatus, ModelStatus};

/// Transport to the NLP backend
///
/// Implementations own request timeouts; a call that runs out of time fails
/// with [`GatewayError::Timeout`](crate::GatewayError::Timeout).
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Reachability and model readiness (`GET /api/health`)
    async fn get_health(&self) -> Result<HealthStatus>;

    /// Model readiness only (`GET /api/models/status`)
    async fn get_model_status(&self) -> Result<ModelStatus>;

    /// Submit one user message and wait for the analysed reply (`POST /api/chat`)
    async fn send_message(&self, text: &str) -> Result<ChatReply>;

    /// Drop server-side conversation memory (`POST /api/conversation/clear`)
    async fn clear_conversation(&self) -> Result<()>;
}
