//! Session core of the Lexis chat client.
//!
//! Two state containers live here, each with a single owner:
//!
//! - [`HealthMonitor`] owns the [`ConnectivityState`](lexis_types::ConnectivityState)
//!   and refreshes it on a timer.
//! - [`ConversationController`] owns the message log and the send/clear
//!   lifecycle, gating sends on the monitor's latest snapshot.
//!
//! Both publish immutable snapshots over `tokio::sync::watch` channels. The
//! [`presenter`] module turns snapshots into display text and never mutates
//! anything.

pub mod conversation;
pub mod monitor;
pub mod options;
pub mod presenter;
pub mod session;

pub use conversation::{ConversationController, ConversationSnapshot, SendOutcome, SendRejection};
pub use monitor::HealthMonitor;
pub use options::{ConversationOptions, SessionOptions};
pub use presenter::{present, DisplayBlock, IndicatorLine, ModelIndicator};
pub use session::{Session, SessionBuilder};
