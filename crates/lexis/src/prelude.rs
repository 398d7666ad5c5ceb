//! Prelude module for convenient imports
//!
//! ```rust
//! use lexis::prelude::*;
//! ```

pub use crate::{
    Analysis, ChatReply, ConnectivityState, Message, ModelStatus, Sender,
    BackendGateway, ErrorCategory, GatewayConfig, GatewayError, HttpGateway,
    ConversationController, ConversationOptions, HealthMonitor, SendOutcome, SendRejection,
    Session, SessionBuilder, SessionOptions,
    present, DisplayBlock,
};
