use crate::{
    AppState,
    auth::CurrentUser,
    dto::CommentFields,
    errors::ApiError,
    routes::find_post,
    urls,
};
use axum::{
    Form,
    extract::{Path, State, rejection::FormRejection},
    response::Redirect,
};
use tracing::{debug, info};

/// POST /posts/{post_id}/comment/
/// Body: text
///
/// Invalid submissions are dropped without a message; the requester is
/// sent back to the post either way.
pub async fn add_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(post_id): Path<String>,
    form: Result<Form<CommentFields>, FormRejection>,
) -> Result<Redirect, ApiError> {
    let post = find_post(&state, &post_id)?;

    match form.ok().and_then(|Form(fields)| fields.into_valid_text()) {
        Some(text) => {
            let comment = state.store.create_comment(post.id, user.id, text);
            info!("Comment {} added to post {} by {}", comment.id, post.id, user.username);
        }
        None => debug!("Invalid comment on post {} discarded", post.id),
    }

    Ok(Redirect::to(&urls::post_detail(post.id)))
}

/// GET /posts/{post_id}/comment/
/// Nothing to submit; back to the post.
pub async fn comment_page(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(post_id): Path<String>,
) -> Result<Redirect, ApiError> {
    let post = find_post(&state, &post_id)?;
    Ok(Redirect::to(&urls::post_detail(post.id)))
}
