//! Page sources.
//!
//! Defines the `PageSource` trait, the seam between the pipeline and the
//! network. The explorer client is the only production implementation;
//! tests plug in an in-memory source.

pub mod explorer;

use async_trait::async_trait;

use crate::types::TrackerError;

/// Something that can produce the markup of the pool balance page.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page body. Non-success responses are errors.
    async fn fetch_page(&self) -> Result<String, TrackerError>;

    /// Source name for logging.
    fn name(&self) -> &str;
}
