use crate::{cache::PageCache, config::Config, media::MediaStore, store::Store};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::{num::NonZeroU32, sync::Arc};

/// Key prefix of the home page cache entries.
pub const INDEX_CACHE_PREFIX: &str = "index_page";

// ============================================================================
// APPLICATION STATE - Shared data across all requests
// ============================================================================
/// `Arc` = Atomic Reference Counter
/// - Allows multiple threads to share ownership safely
/// - When last reference drops, data is cleaned up
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub config: Arc<Config>,
    pub index_cache: PageCache,
    pub media: MediaStore,
    /// Signup/login attempts, keyed by lowercased username.
    pub auth_limiter: Arc<DefaultKeyedRateLimiter<String>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_store(config, Store::new())
    }

    pub fn with_store(config: Config, store: Store) -> Self {
        let index_cache = PageCache::new(
            INDEX_CACHE_PREFIX,
            config.index_cache_ttl(),
            config.cache.max_capacity,
        );
        let media = MediaStore::new(config.media.root.clone());
        let per_minute =
            NonZeroU32::new(config.auth.requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let auth_limiter = RateLimiter::keyed(Quota::per_minute(per_minute));

        Self {
            store: Arc::new(store),
            config: Arc::new(config),
            index_cache,
            media,
            auth_limiter: Arc::new(auth_limiter),
        }
    }
}
