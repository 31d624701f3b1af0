//! The YouTube Data API v3 resource client.
//!
//! - [`YouTubeClient`]: list, get, insert, update and delete operations
//! - [`ApiError`]: errors of those operations

mod client;
mod errors;

pub use client::YouTubeClient;
pub use errors::ApiError;
