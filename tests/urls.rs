mod common;

use axum::http::StatusCode;
use common::TestApp;

struct Fixture {
    app: TestApp,
    author: blogfeed::models::User,
    user: blogfeed::models::User,
}

fn fixture() -> Fixture {
    let app = TestApp::new();
    let author = app.user("author");
    let user = app.user("HasNoName");
    app.group("Test title", "test-slug");
    let post = app.post(&author, "Test post", None);
    assert_eq!(post.id, 1);
    Fixture { app, author, user }
}

#[tokio::test]
async fn public_pages_are_available_to_guests() {
    let f = fixture();
    let pages = [
        ("/", "posts/index.html"),
        ("/group/test-slug/", "posts/group_list.html"),
        ("/profile/HasNoName/", "posts/profile.html"),
        ("/posts/1/", "posts/post_detail.html"),
    ];

    for (uri, template) in pages {
        let resp = f.app.get(uri, None).await;
        assert_eq!(resp.status, StatusCode::OK, "{}", uri);
        assert_eq!(resp.template(), Some(template), "{}", uri);
    }
}

#[tokio::test]
async fn create_page_is_available_to_authorized_user() {
    let f = fixture();
    let resp = f.app.get("/create/", Some(&f.user)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.template(), Some("posts/create_post.html"));
}

#[tokio::test]
async fn edit_page_is_available_to_post_author() {
    let f = fixture();
    let resp = f.app.get("/posts/1/edit/", Some(&f.author)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.template(), Some("posts/create_post.html"));
}

#[tokio::test]
async fn edit_page_sends_others_back_to_the_post() {
    let f = fixture();
    for user in [Some(&f.user), None] {
        let resp = f.app.get("/posts/1/edit/", user).await;
        assert_eq!(resp.status, StatusCode::SEE_OTHER);
        assert_eq!(resp.location(), Some("/posts/1/"));
    }
}

#[tokio::test]
async fn login_gated_pages_redirect_guests_to_login() {
    let f = fixture();
    let pages = [
        ("/create/", "/auth/login?next=%2Fcreate%2F"),
        ("/follow/", "/auth/login?next=%2Ffollow%2F"),
        (
            "/profile/author/follow/",
            "/auth/login?next=%2Fprofile%2Fauthor%2Ffollow%2F",
        ),
        (
            "/profile/author/unfollow/",
            "/auth/login?next=%2Fprofile%2Fauthor%2Funfollow%2F",
        ),
        ("/posts/1/comment/", "/auth/login?next=%2Fposts%2F1%2Fcomment%2F"),
    ];

    for (uri, login) in pages {
        let resp = f.app.get(uri, None).await;
        assert_eq!(resp.status, StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(resp.location(), Some(login), "{}", uri);
    }
}

#[tokio::test]
async fn unexisting_page_is_not_found() {
    let f = fixture();
    let resp = f.app.get("/unexisting_page/", None).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_identifiers_are_not_found() {
    let f = fixture();
    let guest_pages = [
        "/group/no-such-group/",
        "/profile/nobody/",
        "/posts/999/",
        "/posts/abc/",
        "/posts/999/edit/",
    ];
    for uri in guest_pages {
        let resp = f.app.get(uri, None).await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND, "{}", uri);
    }

    let member_pages = [
        "/profile/nobody/follow/",
        "/profile/nobody/unfollow/",
        "/posts/999/comment/",
    ];
    for uri in member_pages {
        let resp = f.app.get(uri, Some(&f.user)).await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND, "{}", uri);
    }

    let resp = f.app.post_form("/posts/999/comment/", "text=hi", Some(&f.user)).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_healthy() {
    let f = fixture();
    let resp = f.app.get("/health", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["status"], "healthy");
}
