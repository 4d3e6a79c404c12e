#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use blogfeed::{
    AppState,
    auth::create_token,
    config::Config,
    models::{Group, Post, User},
    routes,
    store::NewPost,
};
use tempfile::TempDir;
use tower::ServiceExt;

pub const SECRET: &str = "test-secret";
pub const BOUNDARY: &str = "X-BLOGFEED-BOUNDARY";

pub const SMALL_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
    0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x0C, 0x0A, 0x00, 0x3B,
];

pub struct TestApp {
    pub state: AppState,
    router: Router,
    _media: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn template(&self) -> Option<&str> {
        self.headers.get("x-template").and_then(|v| v.to_str().ok())
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).unwrap()
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(tweak: impl FnOnce(&mut Config)) -> Self {
        let media = tempfile::tempdir().unwrap();
        let mut config = Config::new(SECRET);
        config.media.root = media.path().to_path_buf();
        tweak(&mut config);

        let state = AppState::new(config);
        let router = routes::router(state.clone());
        Self {
            state,
            router,
            _media: media,
        }
    }

    pub fn media_root(&self) -> &std::path::Path {
        self._media.path()
    }

    pub fn user(&self, username: &str) -> User {
        self.state
            .store
            .create_user(&format!("{}@example.com", username), username, "!".into())
            .unwrap()
    }

    pub fn group(&self, title: &str, slug: &str) -> Group {
        self.state
            .store
            .create_group(title, slug, "Test description")
            .unwrap()
    }

    pub fn post(&self, author: &User, text: &str, group: Option<&Group>) -> Post {
        self.state.store.create_post(NewPost {
            author_id: author.id,
            text: text.into(),
            group_id: group.map(|g| g.id),
            image: None,
        })
    }

    fn request(&self, method: &str, uri: &str, as_user: Option<&User>) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = as_user {
            let token = create_token(&user.id, &user.username, SECRET, 1).unwrap();
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// GET rendering HTML.
    pub async fn get(&self, uri: &str, as_user: Option<&User>) -> TestResponse {
        let req = self.request("GET", uri, as_user).body(Body::empty()).unwrap();
        self.send(req).await
    }

    /// GET asking for the template context as JSON.
    pub async fn get_context(&self, uri: &str, as_user: Option<&User>) -> TestResponse {
        let req = self
            .request("GET", uri, as_user)
            .header(header::ACCEPT, "application/json")
            .body(Body::empty())
            .unwrap();
        self.send(req).await
    }

    pub async fn post_form(&self, uri: &str, form: &str, as_user: Option<&User>) -> TestResponse {
        let req = self
            .request("POST", uri, as_user)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::ACCEPT, "application/json")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(req).await
    }

    /// POST with an arbitrary (or missing) content type, asking for JSON.
    pub async fn post_raw(
        &self,
        uri: &str,
        content_type: Option<&str>,
        body: &str,
        as_user: Option<&User>,
    ) -> TestResponse {
        let mut builder = self
            .request("POST", uri, as_user)
            .header(header::ACCEPT, "application/json");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let req = builder.body(Body::from(body.to_string())).unwrap();
        self.send(req).await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> TestResponse {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(req).await
    }

    /// Multipart post form with a GIF attached as `image`.
    pub async fn post_with_image(
        &self,
        uri: &str,
        text: &str,
        group: Option<&Group>,
        as_user: Option<&User>,
    ) -> TestResponse {
        let mut body: Vec<u8> = Vec::new();
        let mut field = |name: &str, value: &str| {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                    BOUNDARY, name, value
                )
                .as_bytes(),
            );
        };
        field("text", text);
        field("group", &group.map(|g| g.id.to_string()).unwrap_or_default());

        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"small.gif\"\r\n\
                 Content-Type: image/gif\r\n\r\n",
                BOUNDARY
            )
            .as_bytes(),
        );
        body.extend_from_slice(SMALL_GIF);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        let req = self
            .request("POST", uri, as_user)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(req).await
    }
}
