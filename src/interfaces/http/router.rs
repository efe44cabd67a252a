//! API router with Swagger UI

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::ErrorResponse;
use super::modules::{health, metrics, request_id, uploads, users};
use crate::application::uploads::STATIC_PREFIX;
use crate::application::{UploadService, UserService};
use crate::infrastructure::DataStore;

/// Allowance on top of the file-size limit for multipart boundaries and part headers.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Everything the router needs from the running process.
#[derive(Clone)]
pub struct ApiContext {
    pub user_service: Arc<UserService>,
    pub upload_service: Arc<UploadService>,
    pub store: DataStore,
    /// `None` leaves `/metrics` unmounted.
    pub metrics: Option<PrometheusHandle>,
    pub started_at: Instant,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::list_users,
        users::get_user,
        users::create_user,
        users::delete_user,
        uploads::upload_file,
    ),
    components(
        schemas(
            ErrorResponse,
            users::UserDto,
            users::CreateUserRequest,
            uploads::UploadResponse,
            uploads::UploadForm,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and database reachability"),
        (name = "Users", description = "Create, list, fetch and delete users"),
        (name = "Uploads", description = "Multipart file upload; files are served under /static"),
    ),
    info(
        title = "Users Service API",
        version = "0.1.0",
        description = "CRUD over the users table plus file upload and static file serving"
    )
)]
pub struct ApiDoc;

/// Build the full HTTP surface.
pub fn create_api_router(ctx: ApiContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let user_routes = Router::new()
        .route("/users", get(users::list_users))
        .route("/users/{id}", get(users::get_user))
        .route("/addusers", post(users::create_user))
        .route("/deleteuser/{id}", delete(users::delete_user))
        .with_state(users::UserHandlerState {
            user_service: ctx.user_service,
        });

    let body_limit = ctx.upload_service.max_bytes().saturating_add(MULTIPART_OVERHEAD);
    let static_root: PathBuf = ctx.upload_service.store().root().to_path_buf();
    let upload_routes = Router::new()
        .route(
            "/uploadfile",
            post(uploads::upload_file).layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(uploads::UploadHandlerState {
            upload_service: ctx.upload_service,
        });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            store: ctx.store,
            started_at: Arc::new(ctx.started_at),
        });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(user_routes)
        .merge(upload_routes)
        .nest_service(STATIC_PREFIX, ServeDir::new(static_root));

    if let Some(handle) = ctx.metrics {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(metrics::MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(request_id::request_id_middleware))
}
