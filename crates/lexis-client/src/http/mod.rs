mod client;

pub use client::{HttpGateway, HttpGatewayBuilder};
