pub mod client;
pub mod errors;
pub mod frame;
pub mod pipeline;
pub mod types;

pub use client::fetch;
pub use errors::FetchError;
pub use frame::{FrameResolution, FrameResolutionDegraded, FrameRule};
pub use types::{Charset, PageResponse};
