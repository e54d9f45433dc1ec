use crate::transport::http::handlers::{graphql, health};
use crate::transport::http::types::{ApiResponse, GraphqlRequestBody, GraphqlResponseBody};
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        graphql::graphql_handler,
        graphql::graphiql_handler
    ),
    components(schemas(ApiResponse, GraphqlRequestBody, GraphqlResponseBody))
)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/graphql",
            get(graphql::graphiql_handler).post(graphql::graphql_handler),
        )
        .with_state(app_state)
}
