use lexis_client::{classify, BackendGateway, ErrorCategory, GatewayError, SEND_FAILED_BANNER};
use lexis_types::{ChatReply, ConnectivityState, Message, MessageIdGenerator};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

use crate::options::ConversationOptions;

/// Immutable view of the conversation handed to readers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationSnapshot {
    pub messages: Vec<Message>,
    pub awaiting_response: bool,
    pub last_error: Option<String>,
    /// Bumped whenever the log is replaced wholesale
    #[serde(skip)]
    generation: u64,
    /// Sequence number of the send currently in flight
    #[serde(skip)]
    pending_send: Option<u64>,
    #[serde(skip)]
    send_seq: u64,
}

impl ConversationSnapshot {
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Why a send was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendRejection {
    #[error("message is empty")]
    EmptyInput,

    #[error("message exceeds {max_chars} characters")]
    TooLong { max_chars: usize },

    #[error("still waiting for the previous reply")]
    AwaitingResponse,

    #[error("backend is not connected")]
    Disconnected,
}

/// How a `send` ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Preconditions failed; the log is unchanged
    Rejected(SendRejection),
    /// The assistant reply was appended
    Replied,
    /// A synthesized error message was appended
    Failed(ErrorCategory),
    /// The log was cleared while the send was in flight, so the result was dropped
    Discarded,
}

impl SendOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// Owns the message log and the send/clear lifecycle
///
/// Cloning yields another handle to the same conversation. At most one send
/// is in flight per conversation: `awaiting_response` gates new sends until
/// the current one resolves, so the user message always precedes its reply.
#[derive(Clone)]
pub struct ConversationController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    gateway: Arc<dyn BackendGateway>,
    connectivity: watch::Receiver<ConnectivityState>,
    state: watch::Sender<ConversationSnapshot>,
    ids: MessageIdGenerator,
    options: ConversationOptions,
}

impl ConversationController {
    /// Controller seeded with the welcome message
    ///
    /// `connectivity` is the health monitor's feed; sends are refused while
    /// its latest value says disconnected.
    pub fn new(
        gateway: Arc<dyn BackendGateway>,
        connectivity: watch::Receiver<ConnectivityState>,
        options: ConversationOptions,
    ) -> Self {
        let ids = MessageIdGenerator::new();
        let welcome = Message::assistant(ids.next_id(), options.greeting.clone());
        let (state, _) = watch::channel(ConversationSnapshot {
            messages: vec![welcome],
            awaiting_response: false,
            last_error: None,
            generation: 0,
            pending_send: None,
            send_seq: 0,
        });

        Self {
            inner: Arc::new(ControllerInner {
                gateway,
                connectivity,
                state,
                ids,
                options,
            }),
        }
    }

    /// Reset to exactly one welcome message with nothing pending
    ///
    /// A reply still in flight is dropped when it arrives.
    pub fn initialize(&self) {
        let inner = &self.inner;
        inner.state.send_modify(|state| {
            state.generation += 1;
            state.messages = vec![Message::assistant(
                inner.ids.next_id(),
                inner.options.greeting.clone(),
            )];
            state.awaiting_response = false;
            state.pending_send = None;
            state.last_error = None;
        });
    }

    /// Check the send preconditions without sending
    pub fn can_send(&self, text: &str) -> Result<(), SendRejection> {
        self.inner.validate(text)?;
        if self.inner.state.borrow().awaiting_response {
            return Err(SendRejection::AwaitingResponse);
        }
        Ok(())
    }

    /// Submit `text` to the backend
    ///
    /// Acceptance happens at call time: the user message is appended and
    /// `awaiting_response` set before this returns. The returned future
    /// resolves once the reply or the synthesized error has been appended;
    /// dropping it does not cancel the request. Must be called within a Tokio
    /// runtime.
    pub fn send(&self, text: &str) -> impl Future<Output = SendOutcome> + Send + 'static {
        let accepted = self.inner.accept(text).map(|ticket| {
            let inner = Arc::clone(&self.inner);
            let text = text.to_string();
            tokio::spawn(async move { inner.deliver(ticket, text).await })
        });
        let inner = Arc::clone(&self.inner);

        async move {
            let task = match accepted {
                Ok(task) => task,
                Err(reason) => {
                    tracing::debug!("Send rejected: {}", reason);
                    return SendOutcome::Rejected(reason);
                }
            };

            match task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!("Send task failed: {}", e);
                    inner.release_all();
                    SendOutcome::Failed(ErrorCategory::Unknown)
                }
            }
        }
    }

    /// Replace the log with the reset welcome message and tell the backend
    /// to forget the conversation
    ///
    /// The local reset happens at call time and is never rolled back. The
    /// backend notification is best effort: failures are logged only. The
    /// returned future resolves when the notification finishes. Must be
    /// called within a Tokio runtime.
    pub fn clear(&self) -> impl Future<Output = ()> + Send + 'static {
        let inner = &self.inner;
        inner.state.send_modify(|state| {
            state.generation += 1;
            state.messages = vec![Message::assistant(
                inner.ids.next_id(),
                inner.options.reset_greeting.clone(),
            )];
            state.last_error = None;
        });
        tracing::debug!("Conversation cleared");

        let gateway = Arc::clone(&inner.gateway);
        let notify = tokio::spawn(async move {
            if let Err(e) = gateway.clear_conversation().await {
                tracing::warn!("Failed to clear backend conversation: {}", e);
            }
        });

        async move {
            if let Err(e) = notify.await {
                tracing::error!("Clear notification task failed: {}", e);
            }
        }
    }

    /// Clear the banner error; the log is untouched
    pub fn dismiss_error(&self) {
        self.inner
            .state
            .send_if_modified(|state| state.last_error.take().is_some());
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        self.inner.state.borrow().clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.inner.state.borrow().messages.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.state.borrow().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.state.borrow().messages.is_empty()
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.inner.state.borrow().awaiting_response
    }

    pub fn last_error(&self) -> Option<String> {
        self.inner.state.borrow().last_error.clone()
    }

    pub fn options(&self) -> &ConversationOptions {
        &self.inner.options
    }

    pub fn subscribe(&self) -> watch::Receiver<ConversationSnapshot> {
        self.inner.state.subscribe()
    }
}

/// Identifies an accepted send: which log it belongs to and which slot it holds
#[derive(Debug, Clone, Copy)]
struct Ticket {
    generation: u64,
    seq: u64,
}

impl ControllerInner {
    fn validate(&self, text: &str) -> Result<(), SendRejection> {
        if text.trim().is_empty() {
            return Err(SendRejection::EmptyInput);
        }
        let max_chars = self.options.max_input_chars;
        if text.chars().count() > max_chars {
            return Err(SendRejection::TooLong { max_chars });
        }
        if !self.connectivity.borrow().connected {
            return Err(SendRejection::Disconnected);
        }
        Ok(())
    }

    fn accept(&self, text: &str) -> Result<Ticket, SendRejection> {
        self.validate(text)?;

        let mut accepted = Err(SendRejection::AwaitingResponse);
        self.state.send_if_modified(|state| {
            if state.pending_send.is_some() {
                return false;
            }
            state.send_seq += 1;
            state.pending_send = Some(state.send_seq);
            state.awaiting_response = true;
            state.last_error = None;
            state.messages.push(Message::user(self.ids.next_id(), text));
            accepted = Ok(Ticket {
                generation: state.generation,
                seq: state.send_seq,
            });
            true
        });
        accepted
    }

    async fn deliver(&self, ticket: Ticket, text: String) -> SendOutcome {
        if !self.options.reply_delay.is_zero() {
            tokio::time::sleep(self.options.reply_delay).await;
        }

        tracing::debug!(chars = text.chars().count(), "Sending message");
        let result = self.gateway.send_message(&text).await;
        self.settle(ticket, result)
    }

    fn settle(&self, ticket: Ticket, result: Result<ChatReply, GatewayError>) -> SendOutcome {
        let (message, banner, kept) = match result {
            Ok(reply) => (Message::reply(self.ids.next_id(), reply), None, SendOutcome::Replied),
            Err(e) => {
                let category = classify(&e);
                tracing::warn!(category = %category, "Message send failed: {}", e);
                (
                    Message::error(self.ids.next_id(), category.user_message()),
                    Some(SEND_FAILED_BANNER),
                    SendOutcome::Failed(category),
                )
            }
        };

        let mut outcome = SendOutcome::Discarded;
        self.state.send_modify(|state| {
            if state.pending_send == Some(ticket.seq) {
                state.pending_send = None;
                state.awaiting_response = false;
            }
            if state.generation != ticket.generation {
                return;
            }
            state.messages.push(message);
            if let Some(banner) = banner {
                state.last_error = Some(banner.to_string());
            }
            outcome = kept;
        });

        if outcome == SendOutcome::Discarded {
            tracing::debug!("Conversation was reset during send, dropping result");
        }
        outcome
    }

    fn release_all(&self) {
        self.state.send_modify(|state| {
            state.pending_send = None;
            state.awaiting_response = false;
        });
    }
}
