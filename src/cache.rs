use crate::templates::Format;
use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{HeaderMap, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

/// A fully buffered response, replayed byte for byte on a hit.
#[derive(Debug, Clone)]
pub struct CachedPage {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl IntoResponse for CachedPage {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Time-boxed cache of rendered pages.
///
/// Entries only leave through expiry or [`PageCache::clear`]; writes to the
/// store do not invalidate anything.
#[derive(Clone)]
pub struct PageCache {
    prefix: &'static str,
    pages: Cache<String, CachedPage>,
}

impl PageCache {
    pub fn new(prefix: &'static str, ttl: Duration, max_capacity: u64) -> Self {
        let pages = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { prefix, pages }
    }

    pub fn key(&self, format: Format, path_and_query: &str) -> String {
        format!("{}:{}:{}", self.prefix, format.as_str(), path_and_query)
    }

    pub async fn get(&self, key: &str) -> Option<CachedPage> {
        self.pages.get(key).await
    }

    pub async fn set(&self, key: String, page: CachedPage) {
        self.pages.insert(key, page).await;
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.pages.invalidate_all();
        debug!("Page cache '{}' cleared", self.prefix);
    }
}

/// Middleware memoizing successful GET responses keyed by request path.
pub async fn cache_page(State(cache): State<PageCache>, request: Request, next: Next) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let format = Format::from_headers(request.headers());
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let key = cache.key(format, path_and_query);

    if let Some(page) = cache.get(&key).await {
        debug!("Page cache hit: {}", key);
        return page.into_response();
    }
    debug!("Page cache miss: {}", key);

    let response = next.run(request).await;
    if response.status() != StatusCode::OK {
        return response;
    }

    let (parts, body) = response.into_parts();
    let body = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("Failed to buffer response for caching: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let page = CachedPage {
        status: parts.status,
        headers: parts.headers,
        body,
    };
    cache.set(key, page.clone()).await;
    page.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &'static str) -> CachedPage {
        CachedPage {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[tokio::test]
    async fn set_then_get_until_cleared() {
        let cache = PageCache::new("index_page", Duration::from_secs(60), 10);
        let key = cache.key(Format::Html, "/");

        cache.set(key.clone(), page("one")).await;
        assert_eq!(cache.get(&key).await.unwrap().body, "one");

        cache.clear();
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn entries_expire() {
        let cache = PageCache::new("index_page", Duration::from_millis(50), 10);
        let key = cache.key(Format::Html, "/");

        cache.set(key.clone(), page("one")).await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(cache.get(&key).await.is_none());
    }

    #[test]
    fn keys_separate_formats_and_queries() {
        let cache = PageCache::new("index_page", Duration::from_secs(1), 10);
        assert_ne!(cache.key(Format::Html, "/"), cache.key(Format::Json, "/"));
        assert_ne!(cache.key(Format::Html, "/"), cache.key(Format::Html, "/?page=2"));
    }
}
