//! Page rendering.
//!
//! Every page is a context struct implementing [`Template`]. The same context
//! renders to HTML for browsers, or to JSON when the client asks for
//! `application/json`, so tests and API clients see exactly what the page
//! was built from. The template name travels in the `x-template` header.

mod html;
mod posts;

pub use posts::{
    CreatePostContext, FollowContext, GroupListContext, IndexContext, PostDetailContext,
    ProfileContext,
};

use crate::errors::ApiError;
use axum::{
    extract::FromRequestParts,
    http::{
        HeaderMap, HeaderName, HeaderValue,
        header::{ACCEPT, CONTENT_TYPE},
        request::Parts,
    },
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::convert::Infallible;

pub const TEMPLATE_HEADER: HeaderName = HeaderName::from_static("x-template");

/// Representation negotiated from the `Accept` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Html,
    Json,
}

impl Format {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let wants_json = headers
            .get(ACCEPT)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|accept| accept.contains("application/json"));
        if wants_json { Format::Json } else { Format::Html }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Json => "json",
        }
    }
}

impl<S> FromRequestParts<S> for Format
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Format::from_headers(&parts.headers))
    }
}

/// A page context bound to a named template.
pub trait Template: Serialize {
    const NAME: &'static str;

    fn title(&self) -> String;

    /// Writes the page's `<main>` content.
    fn body(&self, out: &mut String);
}

/// A rendered page, ready to send.
#[derive(Debug)]
pub struct Rendered {
    pub template: &'static str,
    pub format: Format,
    pub body: String,
}

pub fn render<T: Template>(context: &T, format: Format) -> Result<Rendered, ApiError> {
    let body = match format {
        Format::Json => serde_json::to_string(context)
            .map_err(|e| ApiError::InternalError(format!("Context serialization failed: {}", e)))?,
        Format::Html => {
            let mut main = String::new();
            context.body(&mut main);
            html::layout(&context.title(), &main)
        }
    };

    Ok(Rendered {
        template: T::NAME,
        format,
        body,
    })
}

impl IntoResponse for Rendered {
    fn into_response(self) -> Response {
        let content_type = match self.format {
            Format::Html => "text/html; charset=utf-8",
            Format::Json => "application/json",
        };

        (
            [
                (CONTENT_TYPE, HeaderValue::from_static(content_type)),
                (TEMPLATE_HEADER, HeaderValue::from_static(self.template)),
            ],
            self.body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[derive(Serialize)]
    struct Hello {
        name: String,
    }

    impl Template for Hello {
        const NAME: &'static str = "tests/hello.html";

        fn title(&self) -> String {
            "Hello".into()
        }

        fn body(&self, out: &mut String) {
            out.push_str(&format!("<p>{}</p>", html::escape(&self.name)));
        }
    }

    #[test]
    fn accept_header_selects_format() {
        let mut headers = HeaderMap::new();
        assert_eq!(Format::from_headers(&headers), Format::Html);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        assert_eq!(Format::from_headers(&headers), Format::Json);
    }

    #[test]
    fn html_is_escaped_and_wrapped() {
        let page = render(&Hello { name: "<b>".into() }, Format::Html).unwrap();
        assert!(page.body.contains("<p>&lt;b&gt;</p>"));
        assert!(page.body.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn response_names_its_template() {
        let page = render(&Hello { name: "x".into() }, Format::Json).unwrap();
        let response = page.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[TEMPLATE_HEADER], "tests/hello.html");
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    }
}
