pub mod analysis;
pub mod health;
pub mod message;
pub mod reply;

pub use analysis::{Analysis, Entity, Intent, Keyword, Sentiment, SentimentLabel, TextStats};
pub use health::{ConnectivityState, HealthStatus, ModelStatus};
pub use message::{Message, MessageId, MessageIdGenerator, Sender};
pub use reply::ChatReply;
