//! footydata - client library for the football-data.org API
//!
//! Exposes the API client, its response cache and the CLI parsing used by the
//! `footydata` binary.

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;

pub use cache::{CachedResponse, RequestCache, RequestFingerprint};
pub use client::{FootballDataClient, SeasonClient};
pub use config::ClientConfig;
pub use error::{FootballDataError, Result};
