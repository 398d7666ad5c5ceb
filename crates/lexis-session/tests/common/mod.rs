//! In-memory backend used by the session integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use lexis_client::{BackendGateway, GatewayError, Result};
use lexis_types::{Analysis, ChatReply, HealthStatus, ModelStatus, SentimentLabel};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Scripted gateway: queued results are consumed first, then defaults apply
///
/// Health and chat calls can be held at a gate to simulate a slow backend.
pub struct FakeGateway {
    health: Mutex<VecDeque<Result<HealthStatus>>>,
    model_status: Mutex<VecDeque<Result<ModelStatus>>>,
    chat: Mutex<VecDeque<Result<ChatReply>>>,
    clear_fails: AtomicBool,
    health_gate: watch::Sender<bool>,
    chat_gate: watch::Sender<bool>,
    health_calls: watch::Sender<usize>,
    model_status_calls: watch::Sender<usize>,
    chat_calls: watch::Sender<usize>,
    clear_calls: watch::Sender<usize>,
    last_message: Mutex<Option<String>>,
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            health: Mutex::new(VecDeque::new()),
            model_status: Mutex::new(VecDeque::new()),
            chat: Mutex::new(VecDeque::new()),
            clear_fails: AtomicBool::new(false),
            health_gate: watch::channel(true).0,
            chat_gate: watch::channel(true).0,
            health_calls: watch::channel(0).0,
            model_status_calls: watch::channel(0).0,
            chat_calls: watch::channel(0).0,
            clear_calls: watch::channel(0).0,
            last_message: Mutex::new(None),
        })
    }

    pub fn push_health(&self, result: Result<HealthStatus>) {
        self.health.lock().unwrap().push_back(result);
    }

    pub fn push_health_failure(&self, err: GatewayError) {
        self.push_health(Err(err));
    }

    pub fn push_model_status(&self, result: Result<ModelStatus>) {
        self.model_status.lock().unwrap().push_back(result);
    }

    pub fn push_chat(&self, result: Result<ChatReply>) {
        self.chat.lock().unwrap().push_back(result);
    }

    pub fn push_chat_failure(&self, err: GatewayError) {
        self.push_chat(Err(err));
    }

    pub fn fail_clear(&self) {
        self.clear_fails.store(true, Ordering::SeqCst);
    }

    pub fn hold_health(&self) {
        self.health_gate.send_replace(false);
    }

    pub fn release_health(&self) {
        self.health_gate.send_replace(true);
    }

    pub fn hold_chat(&self) {
        self.chat_gate.send_replace(false);
    }

    pub fn release_chat(&self) {
        self.chat_gate.send_replace(true);
    }

    pub fn health_calls(&self) -> usize {
        *self.health_calls.borrow()
    }

    pub fn model_status_calls(&self) -> usize {
        *self.model_status_calls.borrow()
    }

    pub fn chat_calls(&self) -> usize {
        *self.chat_calls.borrow()
    }

    pub fn clear_calls(&self) -> usize {
        *self.clear_calls.borrow()
    }

    pub fn last_message(&self) -> Option<String> {
        self.last_message.lock().unwrap().clone()
    }

    pub async fn wait_for_health_calls(&self, n: usize) {
        wait_for_count(&self.health_calls, n).await;
    }

    pub async fn wait_for_chat_calls(&self, n: usize) {
        wait_for_count(&self.chat_calls, n).await;
    }

    pub async fn wait_for_clear_calls(&self, n: usize) {
        wait_for_count(&self.clear_calls, n).await;
    }
}

#[async_trait]
impl BackendGateway for FakeGateway {
    async fn get_health(&self) -> Result<HealthStatus> {
        self.health_calls.send_modify(|n| *n += 1);
        pass(&self.health_gate).await;
        let scripted = self.health.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(healthy(ModelStatus::new(true, true, true))))
    }

    async fn get_model_status(&self) -> Result<ModelStatus> {
        self.model_status_calls.send_modify(|n| *n += 1);
        let scripted = self.model_status.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(ModelStatus::new(true, true, true)))
    }

    async fn send_message(&self, text: &str) -> Result<ChatReply> {
        *self.last_message.lock().unwrap() = Some(text.to_string());
        self.chat_calls.send_modify(|n| *n += 1);
        pass(&self.chat_gate).await;
        let scripted = self.chat.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(echo_reply(text)))
    }

    async fn clear_conversation(&self) -> Result<()> {
        self.clear_calls.send_modify(|n| *n += 1);
        if self.clear_fails.load(Ordering::SeqCst) {
            return Err(GatewayError::Status {
                status: 500,
                body: "clear failed".to_string(),
            });
        }
        Ok(())
    }
}

pub fn healthy(models: ModelStatus) -> HealthStatus {
    HealthStatus {
        status: "healthy".to_string(),
        models_loaded: Some(models),
    }
}

pub fn echo_reply(text: &str) -> ChatReply {
    ChatReply::new(format!("You said: {}", text))
        .with_analysis(
            Analysis::new()
                .with_intent("greeting", 0.93)
                .with_sentiment(SentimentLabel::Positive, Some(0.8)),
        )
        .with_processing_time(0.12)
}

pub fn server_unavailable() -> GatewayError {
    GatewayError::Status {
        status: 503,
        body: "Service Unavailable".to_string(),
    }
}

async fn pass(gate: &watch::Sender<bool>) {
    let mut rx = gate.subscribe();
    loop {
        let open = *rx.borrow_and_update();
        if open || rx.changed().await.is_err() {
            return;
        }
    }
}

async fn wait_for_count(counter: &watch::Sender<usize>, n: usize) {
    let mut rx = counter.subscribe();
    loop {
        let count = *rx.borrow_and_update();
        if count >= n || rx.changed().await.is_err() {
            return;
        }
    }
}
