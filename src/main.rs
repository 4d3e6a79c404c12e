// ============================================================================
// SERVER-RENDERED BLOG WITH FOLLOW FEEDS
// ============================================================================

// - Posts with optional group and image, comments
// - Following authors and a personal feed
// - Cached home page
// - JWT sessions (cookie or bearer)
// - Structured logging

use blogfeed::{AppState, config::Config, fixtures::Fixtures, routes};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blogfeed=debug,tower_http=debug".into()),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::load()?;
    info!("Configuration loaded");

    let fixtures = match &config.fixtures {
        Some(path) => Some(Fixtures::load(path).await?),
        None => None,
    };

    let addr = config.addr();
    let state = AppState::new(config);
    if let Some(fixtures) = fixtures {
        fixtures.apply(&state.store)?;
    }

    let app = routes::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Pages:");
    info!("  GET      /                          - Latest posts (cached)");
    info!("  GET      /group/{{slug}}/             - Posts of a group");
    info!("  GET      /profile/{{username}}/       - Posts of an author");
    info!("  GET      /posts/{{id}}/               - Post with comments");
    info!("  GET|POST /create/                   - New post (auth)");
    info!("  GET|POST /posts/{{id}}/edit/          - Edit post (author)");
    info!("  POST     /posts/{{id}}/comment/       - Comment (auth)");
    info!("  GET      /follow/                   - Followed authors' posts (auth)");
    info!("  GET      /profile/{{username}}/follow/ - Follow (auth)");
    info!("Accounts:");
    info!("  POST     /auth/signup, /auth/login, /auth/logout");
    info!("  GET      /users/me");

    axum::serve(listener, app).await?;

    Ok(())
}
