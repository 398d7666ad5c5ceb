use anyhow::{anyhow, bail, Result};
use lexis_client::BackendGateway;
use lexis_types::ConnectivityState;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::conversation::{ConversationController, SendOutcome};
use crate::monitor::HealthMonitor;
use crate::options::{ConversationOptions, SessionOptions};

/// One chat session: a health monitor plus the conversation it gates
///
/// The monitor's state feed is wired into the controller at build time, so a
/// send is only accepted after a successful health check.
pub struct Session {
    monitor: HealthMonitor,
    conversation: ConversationController,
    options: SessionOptions,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Start health polling at the configured interval
    pub fn start(&self) {
        self.monitor.start(self.options.poll_interval);
    }

    pub fn stop(&self) {
        self.monitor.stop();
    }

    pub fn monitor(&self) -> &HealthMonitor {
        &self.monitor
    }

    pub fn conversation(&self) -> &ConversationController {
        &self.conversation
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn connectivity(&self) -> ConnectivityState {
        self.monitor.snapshot()
    }

    pub fn send(&self, text: &str) -> impl Future<Output = SendOutcome> + Send + 'static {
        self.conversation.send(text)
    }

    pub fn clear(&self) -> impl Future<Output = ()> + Send + 'static {
        self.conversation.clear()
    }

    /// Drop the banner error and probe the backend right away
    pub async fn retry_connection(&self) -> ConnectivityState {
        self.conversation.dismiss_error();
        let state = self.monitor.check_now().await;
        tracing::info!(connected = state.connected, "Connection retry finished");
        state
    }
}

/// Builder for [`Session`]; a gateway is required
pub struct SessionBuilder {
    gateway: Option<Arc<dyn BackendGateway>>,
    options: SessionOptions,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            gateway: None,
            options: SessionOptions::default(),
        }
    }

    pub fn gateway(mut self, gateway: Arc<dyn BackendGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.options.poll_interval = interval;
        self
    }

    pub fn conversation_options(mut self, options: ConversationOptions) -> Self {
        self.options.conversation = options;
        self
    }

    pub fn greeting(mut self, text: impl Into<String>) -> Self {
        self.options.conversation.greeting = text.into();
        self
    }

    pub fn build(self) -> Result<Session> {
        let gateway = self
            .gateway
            .ok_or_else(|| anyhow!("Backend gateway is required"))?;

        if self.options.poll_interval.is_zero() {
            bail!("Poll interval must be greater than zero");
        }
        if self.options.conversation.max_input_chars == 0 {
            bail!("Maximum input length must be greater than zero");
        }

        let monitor = HealthMonitor::new(Arc::clone(&gateway));
        let conversation = ConversationController::new(
            gateway,
            monitor.subscribe(),
            self.options.conversation.clone(),
        );

        Ok(Session {
            monitor,
            conversation,
            options: self.options,
        })
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
