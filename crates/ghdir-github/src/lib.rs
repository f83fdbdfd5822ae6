pub mod client;
pub mod contents;

pub use client::{GitHubClient, GitHubClientConfig};
pub use contents::{ContentEntry, parse_listing};
