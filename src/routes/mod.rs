pub mod comment;
pub mod follow;
pub mod group;
pub mod health;
pub mod post;
pub mod profile;
pub mod user;

use crate::{
    AppState,
    cache,
    dto::PostView,
    errors::ApiError,
    models::Post,
    pagination::{Page, PageQuery, paginate},
    store::PostFilter,
    urls,
};
use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use tower::{ServiceBuilder, limit::GlobalConcurrencyLimitLayer, timeout::error::Elapsed};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::warn;

/// Builds the application router with every named route.
pub fn router(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let limits = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .layer(GlobalConcurrencyLimitLayer::new(
            state.config.server.concurrency_limit,
        ))
        .timeout(state.config.request_timeout());

    let cached_index = get(post::index).layer(middleware::from_fn_with_state(
        state.index_cache.clone(),
        cache::cache_page,
    ));

    Router::new()
        // Accounts
        .route("/health", get(health::health_check))
        .route("/auth/signup", post(user::signup))
        .route(urls::LOGIN, get(user::login_page).post(user::login))
        .route("/auth/logout", post(user::logout))
        .route("/users/me", get(user::get_current_user))
        // Read views
        .route(urls::INDEX, cached_index)
        .route(urls::GROUP_LIST, get(group::group_posts))
        .route(urls::PROFILE, get(profile::profile))
        .route(urls::POST_DETAIL, get(post::post_detail))
        .route(urls::FOLLOW_INDEX, get(follow::follow_index))
        // Write views
        .route(
            urls::POST_CREATE,
            get(post::post_create_form).post(post::post_create),
        )
        .route(
            urls::POST_EDIT,
            get(post::post_edit_form).post(post::post_edit),
        )
        .route(
            urls::ADD_COMMENT,
            get(comment::comment_page).post(comment::add_comment),
        )
        .route(
            urls::PROFILE_FOLLOW,
            get(follow::profile_follow).post(follow::profile_follow),
        )
        .route(
            urls::PROFILE_UNFOLLOW,
            get(follow::profile_unfollow).post(follow::profile_unfollow),
        )
        .nest_service("/media", ServeDir::new(state.media.root()))
        .fallback(not_found)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(limits)
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<Elapsed>() {
        warn!("Request timed out");
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled internal error: {}", err),
        )
    }
}

/// Post ids arrive as raw path segments; anything non-numeric is a 404.
pub(crate) fn find_post(state: &AppState, raw_id: &str) -> Result<Post, ApiError> {
    let id = raw_id.parse::<u64>().map_err(|_| ApiError::NotFound)?;
    state.store.post(id).ok_or(ApiError::NotFound)
}

/// One page of posts matching `filter`, with relations resolved.
pub(crate) fn post_page(state: &AppState, filter: PostFilter, query: &PageQuery) -> Page<PostView> {
    let posts = state.store.posts(filter);
    paginate(posts, state.config.posts.per_page, query.number())
        .map(|post| PostView::build(&state.store, post))
}
