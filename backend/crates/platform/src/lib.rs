//! Platform Crate - Technical Infrastructure
//!
//! HTTP plumbing shared by backend crates:
//! - Cookie header building and parsing
//! - Client information extraction (IP, User-Agent)

pub mod client;
pub mod cookie;
