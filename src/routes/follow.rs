use crate::{
    AppState,
    auth::CurrentUser,
    errors::ApiError,
    pagination::PageQuery,
    routes::post_page,
    store::PostFilter,
    templates::{FollowContext, Format, Rendered, render},
    urls,
};
use axum::{
    extract::{Path, Query, State},
    response::Redirect,
};
use tracing::{debug, info};

const FOLLOW_TITLE: &str = "Posts by authors you follow";

/// GET /follow/
pub async fn follow_index(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    format: Format,
    Query(query): Query<PageQuery>,
) -> Result<Rendered, ApiError> {
    let context = FollowContext {
        title: FOLLOW_TITLE.to_string(),
        page_obj: post_page(&state, PostFilter::FollowedBy(user.id), &query),
    };
    render(&context, format)
}

/// GET|POST /profile/{username}/follow/
/// Self-follows and repeat follows are no-ops; always lands on the profile.
pub async fn profile_follow(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(username): Path<String>,
) -> Result<Redirect, ApiError> {
    let author = state
        .store
        .user_by_username(&username)
        .ok_or(ApiError::NotFound)?;

    if state.store.follow(user.id, author.id) {
        info!("{} followed {}", user.username, author.username);
    } else {
        debug!("{} -> {} follow skipped", user.username, author.username);
    }

    Ok(Redirect::to(&urls::profile(&author.username)))
}

/// GET|POST /profile/{username}/unfollow/
pub async fn profile_unfollow(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(username): Path<String>,
) -> Result<Redirect, ApiError> {
    let author = state
        .store
        .user_by_username(&username)
        .ok_or(ApiError::NotFound)?;

    if state.store.unfollow(user.id, author.id) {
        info!("{} unfollowed {}", user.username, author.username);
    }

    Ok(Redirect::to(&urls::profile(&author.username)))
}
