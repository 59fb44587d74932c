//! API server initialization

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::middleware::{self, AllowedOrigins};
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::health;
use super::routes::sales::{self, SalesApiState};
use crate::core::CoreApp;

pub struct ApiServer {
    app: CoreApp,
    allowed_origins: AllowedOrigins,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        let allowed_origins = AllowedOrigins::from_config(&app.config.server);
        Self {
            app,
            allowed_origins,
        }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self {
            app,
            allowed_origins,
        } = self;

        let shutdown = app.shutdown.clone();

        let host = app.config.server.host.clone();
        let port = app.config.server.port;
        let addr = SocketAddr::new(
            host.parse()
                .with_context(|| format!("Invalid server.host '{}'", host))?,
            port,
        );

        let state = SalesApiState::new(
            app.analytics.clone(),
            app.lookups.clone(),
            app.config.cache.lookup_ttl_secs,
        );
        let router = build_router(state, &allowed_origins);

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        tracing::info!("Listening on http://{}", addr);

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}

/// Full application router
pub fn build_router(state: SalesApiState, allowed_origins: &AllowedOrigins) -> Router {
    Router::new()
        .route("/api/v1/health", get(health::health))
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/docs", get(swagger_ui_html))
        .route("/api/docs/", get(swagger_ui_html))
        .merge(sales::routes(state))
        .fallback(middleware::handle_404)
        .layer(CompressionLayer::new())
        .layer(middleware::cors(allowed_origins))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{HeaderMap, Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::core::config::{CacheConfig, LookupsConfig};
    use crate::data::cache::CacheService;
    use crate::data::duckdb::sales_repository::seed;
    use crate::data::{AnalyticsService, DuckdbService};
    use crate::domain::sales::LookupService;

    fn app_with(service: Arc<DuckdbService>) -> Router {
        let cache_config = CacheConfig::default();
        let cache = Arc::new(CacheService::new(&cache_config).unwrap());
        let lookups = Arc::new(LookupService::new(
            cache,
            &cache_config,
            &LookupsConfig::default(),
        ));
        let analytics = Arc::new(AnalyticsService::Duckdb(service));
        let state = SalesApiState::new(analytics, lookups, cache_config.lookup_ttl_secs);
        build_router(state, &AllowedOrigins::new("127.0.0.1", 5000, 8501))
    }

    fn seeded() -> Arc<DuckdbService> {
        let service = DuckdbService::open_in_memory(5).unwrap();
        {
            let conn = service.conn().unwrap();
            seed(
                &conn,
                &[(42, "Books"), (7, "Games")],
                &[
                    (42, "2023-01-05", 10.0),
                    (42, "2023-01-05", 5.0),
                    (42, "2023-01-20", 3.0),
                    (7, "2023-02-11", 99.0),
                ],
            )
            .unwrap();
        }
        Arc::new(service)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, HeaderMap, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, body)
    }

    #[tokio::test]
    async fn test_aggregate_end_to_end() {
        let app = app_with(seeded());
        let (status, headers, body) = get(
            app,
            "/aggregate?product_id=42&start_date=2023-01-01&end_date=2023-01-31&aggregate_type=sum&group_by=day",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");
        assert_eq!(
            body,
            serde_json::json!([
                {"time": "2023-01-05", "value": 15.0},
                {"time": "2023-01-20", "value": 3.0}
            ])
        );
    }

    #[tokio::test]
    async fn test_legacy_alias_with_russian_group_by() {
        let app = app_with(seeded());
        let (status, _, body) = get(
            app,
            "/get_aggregate?product_id=42&start_date=2023-01-01&end_date=2023-01-31&aggregate_type=count&group_by=%D0%BC%D0%B5%D1%81%D1%8F%D1%86",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!([{"time": "2023-01-01", "value": 3.0}])
        );
    }

    #[tokio::test]
    async fn test_aggregate_missing_parameter() {
        let app = app_with(seeded());
        let (status, _, body) = get(
            app,
            "/aggregate?product_id=42&start_date=2023-01-01&end_date=2023-01-31&aggregate_type=sum",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing parameters: group_by");
    }

    #[tokio::test]
    async fn test_aggregate_duplicate_parameter_is_json_error() {
        let app = app_with(seeded());
        let (status, headers, body) = get(
            app,
            "/aggregate?product_id=42&product_id=7&start_date=2023-01-01&end_date=2023-01-31&aggregate_type=sum&group_by=day",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert!(body["error"].as_str().unwrap().contains("product_id"));
    }

    #[tokio::test]
    async fn test_aggregate_reversed_range() {
        let app = app_with(seeded());
        let (status, _, body) = get(
            app,
            "/aggregate?product_id=42&start_date=2023-02-01&end_date=2023-01-01&aggregate_type=sum&group_by=day",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("start_date"));
    }

    #[tokio::test]
    async fn test_aggregate_unknown_product_is_empty() {
        let app = app_with(seeded());
        let (status, _, body) = get(
            app,
            "/aggregate?product_id=1000&start_date=2023-01-01&end_date=2023-12-31&aggregate_type=count&group_by=week",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_lookups() {
        let service = seeded();

        let (status, headers, body) = get(app_with(service.clone()), "/products").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CACHE_CONTROL], "private, max-age=300");
        assert_eq!(body, serde_json::json!(["7", "42"]));

        let (_, _, body) = get(app_with(service.clone()), "/get_categories").await;
        assert_eq!(body, serde_json::json!(["Books", "Games"]));

        let (_, _, body) = get(app_with(service), "/date_range").await;
        assert_eq!(
            body,
            serde_json::json!({"min_date": "2023-01-05", "max_date": "2023-02-11"})
        );
    }

    #[tokio::test]
    async fn test_date_range_fallback_when_empty() {
        let app = app_with(Arc::new(DuckdbService::open_in_memory(5).unwrap()));
        let (status, _, body) = get(app, "/get_date_range").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({"min_date": "2023-01-01", "max_date": "2023-12-31"})
        );
    }

    #[tokio::test]
    async fn test_closed_store_is_503() {
        let service = seeded();
        let app = app_with(service.clone());
        service.close().await.unwrap();

        let (status, _, body) = get(app, "/categories").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Failed to fetch categories");
    }

    #[tokio::test]
    async fn test_health_and_openapi() {
        let (status, _, body) = get(app_with(seeded()), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, _, body) = get(app_with(seeded()), "/api/openapi.json").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/aggregate"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _, body) = get(app_with(seeded()), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_cors_allows_dashboard_origin() {
        let app = app_with(seeded());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/products")
                    .header(header::ORIGIN, "http://localhost:8501")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:8501"
        );
    }
}
