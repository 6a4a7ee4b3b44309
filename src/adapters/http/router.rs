//! Top-level application router.

use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use axum::Router;

use crate::config::ServerConfig;

use super::comment::comment_routes;
use super::middleware::SessionPoolState;

/// Assemble the full application.
///
/// `/comments` is served by the comment handler. With a `static_dir`
/// configured, every other path is served from that directory; without one
/// they are 404.
pub fn app_router(pool: SessionPoolState, server: &ServerConfig) -> Router {
    let mut router = comment_routes(pool);

    if let Some(dir) = &server.static_dir {
        tracing::info!(dir = %dir.display(), "Serving static files");
        router = router.fallback_service(ServeDir::new(dir));
    }

    with_middleware(router, server)
}

/// Wrap `router` in the request-wide middleware stack.
///
/// A panicking handler becomes a 500 and a request running past
/// `request_timeout_secs` becomes a 408. Either way the handler's future is
/// dropped, which releases any session it was scoped to.
pub fn with_middleware(router: Router, server: &ServerConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(server.request_timeout()));

    router.layer(middleware)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::memory::InMemoryCommentStore;

    #[tokio::test]
    async fn unknown_path_without_static_dir_is_404() {
        let store = InMemoryCommentStore::new();
        let app = app_router(Arc::new(store.clone()), &ServerConfig::default());

        let response = app
            .oneshot(Request::get("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(store.stats().acquired, 0);
    }

    #[tokio::test]
    async fn static_dir_serves_other_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>comments</h1>").unwrap();
        let server = ServerConfig {
            static_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let store = InMemoryCommentStore::new();
        let app = app_router(Arc::new(store.clone()), &server);

        let response = app
            .oneshot(Request::get("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<h1>comments</h1>");
        assert_eq!(store.stats().acquired, 0);
    }

    #[tokio::test]
    async fn panicking_route_becomes_500() {
        async fn explode() -> StatusCode {
            panic!("route blew up")
        }
        let app = with_middleware(
            Router::new().route("/boom", axum::routing::get(explode)),
            &ServerConfig::default(),
        );

        let response = app
            .oneshot(Request::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn comments_route_is_scoped() {
        let store = InMemoryCommentStore::new();
        let app = app_router(Arc::new(store.clone()), &ServerConfig::default());

        let response = app
            .oneshot(Request::get("/comments").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let stats = store.stats();
        assert_eq!(stats.acquired, 1);
        assert_eq!(stats.released, 1);
    }
}
