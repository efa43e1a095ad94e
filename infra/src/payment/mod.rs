//! Payment gateway client.

mod http_gateway;

pub use http_gateway::HttpPaymentGateway;
