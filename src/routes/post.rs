use crate::{
    AppState,
    auth::CurrentUser,
    dto::{CommentForm, CommentView, PostForm, PostSubmission, PostView},
    errors::ApiError,
    models::{Post, PostChanges},
    pagination::PageQuery,
    routes::{find_post, post_page},
    store::{NewPost, PostFilter},
    templates::{
        CreatePostContext, Format, IndexContext, PostDetailContext, Rendered, render,
    },
    urls,
};
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, info};

const INDEX_TITLE: &str = "Latest updates on the site";

/// GET /
/// Every post, newest first. Served through the page cache.
pub async fn index(
    State(state): State<AppState>,
    format: Format,
    Query(query): Query<PageQuery>,
) -> Result<Rendered, ApiError> {
    let context = IndexContext {
        title: INDEX_TITLE.to_string(),
        page_obj: post_page(&state, PostFilter::All, &query),
    };
    render(&context, format)
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    State(state): State<AppState>,
    format: Format,
    Path(post_id): Path<String>,
) -> Result<Rendered, ApiError> {
    let post = find_post(&state, &post_id)?;
    let comments = state
        .store
        .comments_for(post.id)
        .into_iter()
        .map(|comment| CommentView::build(&state.store, comment))
        .collect();

    let context = PostDetailContext {
        post: PostView::build(&state.store, post),
        comments,
        form: CommentForm::default(),
    };
    render(&context, format)
}

/// GET /create/
pub async fn post_create_form(
    State(state): State<AppState>,
    _user: CurrentUser,
    format: Format,
) -> Result<Rendered, ApiError> {
    render(&CreatePostContext::create(PostForm::blank(&state.store)), format)
}

/// POST /create/
/// Body: text, group (id or empty), image (multipart only)
pub async fn post_create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    format: Format,
    submission: Result<PostSubmission, ApiError>,
) -> Result<Response, ApiError> {
    let valid = match readable(submission).validate(&state.store) {
        Ok(valid) => valid,
        Err(form) => {
            return Ok(render(&CreatePostContext::create(form), format)?.into_response());
        }
    };

    let image = match &valid.image {
        Some(upload) => Some(state.media.save_post_image(upload).await?),
        None => None,
    };

    let post = state.store.create_post(NewPost {
        author_id: user.id,
        text: valid.text,
        group_id: valid.group_id,
        image,
    });

    info!("Post created: {} by user {}", post.id, user.username);

    Ok(Redirect::to(&urls::profile(&user.username)).into_response())
}

/// A body that cannot be read as a post form counts as an empty one, so it
/// fails validation and the form is shown again.
fn readable(submission: Result<PostSubmission, ApiError>) -> PostSubmission {
    submission.unwrap_or_else(|e| {
        debug!("Unreadable post form treated as empty: {}", e);
        PostSubmission::default()
    })
}

fn is_author(user: &Option<CurrentUser>, post: &Post) -> bool {
    matches!(user, Some(CurrentUser(u)) if u.id == post.author_id)
}

/// GET /posts/{post_id}/edit/
/// Anyone but the author is sent back to the post.
pub async fn post_edit_form(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    format: Format,
    Path(post_id): Path<String>,
) -> Result<Response, ApiError> {
    let post = find_post(&state, &post_id)?;
    if !is_author(&user, &post) {
        return Ok(Redirect::to(&urls::post_detail(post.id)).into_response());
    }

    let form = PostForm::for_post(&state.store, &post);
    let context = CreatePostContext::edit(form, PostView::build(&state.store, post));
    Ok(render(&context, format)?.into_response())
}

/// POST /posts/{post_id}/edit/
pub async fn post_edit(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    format: Format,
    Path(post_id): Path<String>,
    submission: Result<PostSubmission, ApiError>,
) -> Result<Response, ApiError> {
    let post = find_post(&state, &post_id)?;
    if !is_author(&user, &post) {
        debug!("Edit of post {} by a non-author ignored", post.id);
        return Ok(Redirect::to(&urls::post_detail(post.id)).into_response());
    }

    let valid = match readable(submission).validate(&state.store) {
        Ok(valid) => valid,
        Err(mut form) => {
            form.image = post.image.clone();
            let context = CreatePostContext::edit(form, PostView::build(&state.store, post));
            return Ok(render(&context, format)?.into_response());
        }
    };

    let image = match &valid.image {
        Some(upload) => Some(state.media.save_post_image(upload).await?),
        None => None,
    };

    let changes = PostChanges {
        text: valid.text,
        group_id: valid.group_id,
        image,
    };
    let updated = state.store.update_post(post.id, changes).ok_or(ApiError::NotFound)?;

    info!("Post edited: {}", updated.id);

    Ok(Redirect::to(&urls::post_detail(updated.id)).into_response())
}
