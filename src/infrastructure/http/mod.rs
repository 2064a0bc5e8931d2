mod client;
mod envelope;

pub use client::HttpApiGateway;
pub use envelope::error_message;
