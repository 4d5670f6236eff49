//! Pattern-based extraction from listing and detail pages.
//!
//! Each extractor is a pure scan over raw HTML: no DOM is built and a pattern
//! miss yields an empty value rather than an error.

pub mod detail;
pub mod entities;
pub mod listing;

pub use detail::{DetailExtractor, PairingStrategy};
pub use listing::ListingExtractor;
