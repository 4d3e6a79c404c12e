//! Named routes.
//!
//! Handlers redirect through these builders rather than formatting paths
//! inline, so the router table in [`crate::routes::router`] and every redirect
//! agree on the shape of each URL.

pub const INDEX: &str = "/";
pub const GROUP_LIST: &str = "/group/{slug}/";
pub const PROFILE: &str = "/profile/{username}/";
pub const PROFILE_FOLLOW: &str = "/profile/{username}/follow/";
pub const PROFILE_UNFOLLOW: &str = "/profile/{username}/unfollow/";
pub const POST_DETAIL: &str = "/posts/{post_id}/";
pub const POST_EDIT: &str = "/posts/{post_id}/edit/";
pub const ADD_COMMENT: &str = "/posts/{post_id}/comment/";
pub const POST_CREATE: &str = "/create/";
pub const FOLLOW_INDEX: &str = "/follow/";
pub const LOGIN: &str = "/auth/login";

pub fn index() -> String {
    INDEX.to_string()
}

pub fn group_list(slug: &str) -> String {
    format!("/group/{}/", urlencoding::encode(slug))
}

pub fn profile(username: &str) -> String {
    format!("/profile/{}/", urlencoding::encode(username))
}

pub fn profile_follow(username: &str) -> String {
    format!("/profile/{}/follow/", urlencoding::encode(username))
}

pub fn profile_unfollow(username: &str) -> String {
    format!("/profile/{}/unfollow/", urlencoding::encode(username))
}

pub fn post_detail(post_id: u64) -> String {
    format!("/posts/{}/", post_id)
}

pub fn post_edit(post_id: u64) -> String {
    format!("/posts/{}/edit/", post_id)
}

pub fn add_comment(post_id: u64) -> String {
    format!("/posts/{}/comment/", post_id)
}

pub fn post_create() -> String {
    POST_CREATE.to_string()
}

pub fn follow_index() -> String {
    FOLLOW_INDEX.to_string()
}

pub fn login_with_next(next: &str) -> String {
    format!("{}?next={}", LOGIN, urlencoding::encode(next))
}

pub fn media(path: &str) -> String {
    format!("/media/{}", path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_fill_route_patterns() {
        assert_eq!(
            group_list("test-slug"),
            GROUP_LIST.replace("{slug}", "test-slug")
        );
        assert_eq!(profile("auth"), PROFILE.replace("{username}", "auth"));
        assert_eq!(post_edit(7), POST_EDIT.replace("{post_id}", "7"));
        assert_eq!(add_comment(7), ADD_COMMENT.replace("{post_id}", "7"));
    }

    #[test]
    fn login_redirect_keeps_query_of_original_request() {
        assert_eq!(
            login_with_next("/follow/?page=2"),
            "/auth/login?next=%2Ffollow%2F%3Fpage%3D2"
        );
    }
}
