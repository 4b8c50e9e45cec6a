//! Client for the third-party scraping service used on platforms that cannot
//! be fetched directly.
//!
//! A job is submitted with the post URL, then the run's dataset is polled
//! until the scraper has written at least one item.

pub mod client;
pub mod types;

pub use client::ScrapeJobClient;
pub use types::{DatasetItem, JobInput, ScrapedPost};
