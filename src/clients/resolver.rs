//! Contract for turning an embed page into a direct media URL.
//!
//! Resolution is performed by a headless-browser collaborator that loads
//! the embed page, waits for the `video` element to appear, lets the
//! player script settle, and reads the element's `src` attribute. That
//! machinery lives outside this crate; callers depend only on this trait
//! and feed it the embed URLs carried by
//! [`LinkSource`](crate::models::LinkSource).

use crate::error::Result;

#[async_trait::async_trait]
pub trait VideoUrlResolver: Send + Sync {
    /// Resolves an embed page URL to a single direct media URL.
    async fn resolve(&self, embed_url: &str) -> Result<String>;
}
