use crate::{
    AppState,
    dto::GroupView,
    errors::ApiError,
    pagination::PageQuery,
    routes::post_page,
    store::PostFilter,
    templates::{Format, GroupListContext, Rendered, render},
};
use axum::extract::{Path, Query, State};

/// GET /group/{slug}/
pub async fn group_posts(
    State(state): State<AppState>,
    format: Format,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Rendered, ApiError> {
    let group = state.store.group_by_slug(&slug).ok_or(ApiError::NotFound)?;

    let context = GroupListContext {
        page_obj: post_page(&state, PostFilter::Group(group.id), &query),
        group: GroupView::from(group),
    };
    render(&context, format)
}
