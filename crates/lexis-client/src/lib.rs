pub mod classifier;
pub mod config;
pub mod error;
pub mod http;
pub mod traits;

pub use classifier::{classify, ErrorCategory, APOLOGY_PREFIX, SEND_FAILED_BANNER};
pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use http::{HttpGateway, HttpGatewayBuilder};
pub use traits::BackendGateway;
