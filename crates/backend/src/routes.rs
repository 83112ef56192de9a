use axum::{
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::api::{handlers, AppState};
use crate::system;

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    let api = Router::new()
        // A001 Supplier
        .route(
            "/suppliers",
            get(handlers::a001_supplier::list).post(handlers::a001_supplier::create),
        )
        .route("/suppliers/stats", get(handlers::a001_supplier::stats))
        .route(
            "/suppliers/:id",
            get(handlers::a001_supplier::get_by_id)
                .put(handlers::a001_supplier::update)
                .delete(handlers::a001_supplier::delete),
        )
        // A002 Employee
        .route(
            "/employees",
            get(handlers::a002_employee::list).post(handlers::a002_employee::create),
        )
        .route("/employees/stats", get(handlers::a002_employee::stats))
        .route(
            "/employees/:id",
            get(handlers::a002_employee::get_by_id)
                .put(handlers::a002_employee::update)
                .delete(handlers::a002_employee::delete),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            system::auth::middleware::require_api_token,
        ));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/api", api)
        // собранный frontend (trunk build → dist/)
        .fallback_service(ServeDir::new("dist"))
        .with_state(state)
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors)
}
