//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `cors_origins` - Allowed CORS origins
pub(crate) fn create_router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let note_routes = Router::new()
        .route("/api/notes", get(handlers::notes::list_notes))
        .route("/api/notes/stats", get(handlers::notes::get_stats))
        .route("/api/notes/categories", get(handlers::notes::get_categories))
        .route("/api/notes/groups", get(handlers::notes::get_groups))
        .route("/api/notes/structure", get(handlers::notes::get_structure))
        .route("/api/notes/tree/{group}", get(handlers::notes::get_group_tree))
        .route("/api/notes/search", get(handlers::notes::search_notes))
        .route(
            "/api/notes/cache/invalidate",
            post(handlers::notes::invalidate_cache),
        )
        .route("/api/notes/{id}", get(handlers::notes::get_note));

    let quote_routes = Router::new()
        .route("/api/quotes", get(handlers::quotes::list_quotes))
        .route(
            "/api/quotes/categories",
            get(handlers::quotes::get_categories),
        )
        .route("/api/quotes/random", get(handlers::quotes::random_quote));

    let contact_routes = Router::new()
        .route("/api/contact", post(handlers::contact::submit_message))
        .route("/api/contact/messages", get(handlers::contact::list_messages));

    let service_routes = Router::new()
        .route("/", get(handlers::service::root))
        .route("/health", get(handlers::service::health));

    Router::new()
        .merge(note_routes)
        .merge(quote_routes)
        .merge(contact_routes)
        .merge(service_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::cors_layer(cors_origins))
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::test_support::{sample_storage, test_app};

    #[tokio::test]
    async fn test_security_headers_present() {
        let app = test_app(sample_storage());

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
        assert!(
            headers["content-security-policy"]
                .to_str()
                .unwrap()
                .contains("default-src 'none'")
        );
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let app = test_app(sample_storage());

        let response = app
            .oneshot(
                Request::get("/health")
                    .header("origin", "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:3000"
        );
        assert_eq!(
            response.headers()["access-control-allow-credentials"],
            "true"
        );
    }

    #[tokio::test]
    async fn test_cors_rejects_unknown_origin() {
        let app = test_app(sample_storage());

        let response = app
            .oneshot(
                Request::get("/health")
                    .header("origin", "http://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(
            !response
                .headers()
                .contains_key("access-control-allow-origin")
        );
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = test_app(sample_storage());

        let response = app
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
