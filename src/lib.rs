//! Single-URL web content extraction.
//!
//! A URL is classified against a fixed registry of platform strategies, the
//! document is fetched (or scraped through an external job for platforms that
//! forbid direct access), cleaned, normalised and cut into sentence-aligned
//! chunks for downstream language-model consumption.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod jobs;
pub mod text;

pub use dispatch::{ContentExtractor, ExtractionHandle};
pub use error::ExtractionError;
pub use extractor::ExtractionResult;
