//! Scrape a movie listing site, resolve download links and publish drafts
//! to WordPress.

pub mod config;
pub mod content;
pub mod error;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod publisher;
pub mod resolver;
pub mod traits;
pub mod utils;
pub mod web;

pub use error::{ReelError, Result};
