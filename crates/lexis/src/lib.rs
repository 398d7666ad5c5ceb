//! # Lexis
//!
//! Session controller for chat clients that talk to a remote NLP service.
//!
//! ## Overview
//!
//! Lexis keeps the stateful part of a chat client out of the UI:
//!
//! - **Health polling** with in-flight coalescing and silent failure handling
//! - **Guarded sends**: one request in flight, user turn visible before the reply
//! - **Failure normalization** into apology messages the user can read
//! - **Analysis rendering** of intent, sentiment, entities, keywords and stats
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lexis::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let gateway = Arc::new(HttpGateway::new("http://localhost:5000")?);
//!
//!     let session = Session::builder().gateway(gateway).build()?;
//!     session.start();
//!     session.retry_connection().await;
//!
//!     match session.send("Hello!").await {
//!         SendOutcome::Replied => {
//!             if let Some(reply) = session.conversation().snapshot().last_message() {
//!                 println!("{}", reply.text());
//!                 if let Some(analysis) = reply.analysis() {
//!                     for line in present(analysis).lines() {
//!                         println!("  {}", line);
//!                     }
//!                 }
//!             }
//!         }
//!         other => println!("not sent: {:?}", other),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`lexis-types`**: messages, analysis payloads, health and connectivity shapes
//! - **`lexis-client`**: backend gateway trait, reqwest implementation, error classifier
//! - **`lexis-session`**: health monitor, conversation controller, presenter

pub mod prelude;

pub use lexis_types::{
    Analysis, ChatReply, ConnectivityState, Entity, HealthStatus, Intent, Keyword, Message,
    MessageId, ModelStatus, Sender, Sentiment, SentimentLabel, TextStats,
};

pub use lexis_client::{
    classify, BackendGateway, ErrorCategory, GatewayConfig, GatewayError, HttpGateway,
    HttpGatewayBuilder, APOLOGY_PREFIX, SEND_FAILED_BANNER,
};

pub use lexis_session::{
    present, ConversationController, ConversationOptions, ConversationSnapshot, DisplayBlock,
    HealthMonitor, IndicatorLine, ModelIndicator, SendOutcome, SendRejection, Session,
    SessionBuilder, SessionOptions,
};

pub use lexis_session::presenter;
