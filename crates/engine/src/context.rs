//! Application context – holds the backend capability and its address.

use crate::platform::{ReqwestDeckApi, DEFAULT_BASE_URL};
use crate::traits::*;
use crate::view::DeckView;
use std::sync::Arc;

/// Central context every front end builds its view from.
///
/// Holds the backend as a trait object so callers (CLI / tests) can swap
/// the real HTTP client for a fake.
pub struct AppContext {
    api: Arc<dyn DeckApi>,
    /// Backend address, for display only once the client is built.
    pub base_url: String,
}

impl AppContext {
    pub fn new(api: Arc<dyn DeckApi>, base_url: impl Into<String>) -> Self {
        Self {
            api,
            base_url: base_url.into(),
        }
    }

    /// Create a context talking HTTP to `base_url`.
    pub fn with_base_url(base_url: &str) -> ApiResult<Self> {
        let api = ReqwestDeckApi::new(base_url)?;
        let base_url = api.base_url().to_string();
        Ok(Self::new(Arc::new(api), base_url))
    }

    /// Create a context for a backend on the default local address.
    pub fn default_platform() -> ApiResult<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn api(&self) -> Arc<dyn DeckApi> {
        Arc::clone(&self.api)
    }

    /// A fresh view with three empty response fields.
    pub fn view(&self) -> DeckView {
        DeckView::new(self.api())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDeckApi;

    #[test]
    fn test_default_platform_targets_localhost() {
        let ctx = AppContext::default_platform().expect("client should build");
        assert_eq!(ctx.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let ctx = AppContext::with_base_url("http://cards.test:9000/").unwrap();
        assert_eq!(ctx.base_url, "http://cards.test:9000");
    }

    #[tokio::test]
    async fn test_views_share_the_backend_not_the_fields() {
        let ctx = AppContext::new(Arc::new(FakeDeckApi::default()), "fake");
        let a = ctx.view();
        let b = ctx.view();

        a.open("abc").await.unwrap();

        assert!(a.snapshot().open.is_some());
        assert!(b.snapshot().open.is_none());
    }
}
