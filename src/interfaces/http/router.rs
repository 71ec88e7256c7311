//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::StudentQueryRepository;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::modules::health::{self, HealthState};
use crate::interfaces::http::modules::metrics::{
    http_metrics_middleware, prometheus_metrics, MetricsState,
};
use crate::interfaces::http::modules::request_id::request_id_middleware;
use crate::interfaces::http::modules::students::{self, StudentHandlerState};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        students::list_students,
        students::list_all_students,
        students::get_student,
        students::create_student,
        students::update_student,
        students::delete_student,
    ),
    components(
        schemas(
            ApiResponse<String>,
            ApiResponse<students::StudentDto>,
            students::StudentDto,
            students::CreateStudentRequest,
            students::UpdateStudentRequest,
            students::PageInfo,
            students::PaginationView<students::StudentDto>,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    tags(
        (name = "Health", description = "Service and database health"),
        (name = "Students", description = "Student records: CRUD, name search and paginated listing"),
    ),
    info(
        title = "Students Service API",
        version = "1.0.0",
        description = "REST API for student registration records",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes.
///
/// `db` is the connection behind the repository, used by `/health`;
/// `None` when the in-memory store is in use.
pub fn create_api_router(
    repository: Arc<StudentQueryRepository>,
    db: Option<DatabaseConnection>,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let student_state = StudentHandlerState { repository };
    let student_routes = Router::new()
        .route(
            "/api/v1/alunos",
            get(students::list_students).post(students::create_student),
        )
        .route("/api/v1/alunos/todos", get(students::list_all_students))
        .route(
            "/api/v1/alunos/{id}",
            get(students::get_student)
                .put(students::update_student)
                .patch(students::update_student)
                .delete(students::delete_student),
        )
        .with_state(student_state);

    let health_state = HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state);

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState {
            handle: prometheus_handle,
        });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .merge(student_routes)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
