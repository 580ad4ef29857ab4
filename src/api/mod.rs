//! Pact API module: request/response types and the HTTP client.
//!
//! # Error Handling
//!
//! Every method returns [`SdkResult`](crate::error::SdkResult). Node-level
//! rejections arrive as [`SdkError::RemoteRejection`](crate::error::SdkError)
//! with the body untouched:
//!
//! ```rust,ignore
//! match client.send(&envelope, true).await {
//!     Ok(response) => println!("request keys: {:?}", response.request_keys),
//!     Err(SdkError::RemoteRejection { status, body }) => println!("{}: {}", status, body),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```

#[cfg(feature = "http")]
pub mod client;
pub mod types;

#[cfg(feature = "http")]
pub use client::{KadenaClient, KadenaClientBuilder};
pub use types::*;
