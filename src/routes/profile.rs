use crate::{
    AppState,
    auth::CurrentUser,
    dto::AuthorView,
    errors::ApiError,
    pagination::PageQuery,
    routes::post_page,
    store::PostFilter,
    templates::{Format, ProfileContext, Rendered, render},
};
use axum::extract::{Path, Query, State};

/// GET /profile/{username}/
/// `following` is always false for anonymous visitors.
pub async fn profile(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    format: Format,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Rendered, ApiError> {
    let author = state
        .store
        .user_by_username(&username)
        .ok_or(ApiError::NotFound)?;

    let following = user.is_some_and(|CurrentUser(viewer)| {
        state.store.is_following(viewer.id, author.id)
    });

    let context = ProfileContext {
        page_obj: post_page(&state, PostFilter::Author(author.id), &query),
        author: AuthorView::from(&author),
        following,
    };
    render(&context, format)
}
