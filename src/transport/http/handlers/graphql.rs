use crate::transport::graphql::CurrentUser;
use crate::transport::http::types::{AppState, GraphqlRequestBody, GraphqlResponseBody};
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse};

/// Extracts the token from `Authorization: Bearer <token>` (scheme is case-insensitive).
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[utoipa::path(
    post,
    path = "/graphql",
    request_body = GraphqlRequestBody,
    params(
        ("Authorization" = Option<String>, Header, description = "Bearer token; omit for anonymous access")
    ),
    responses(
        (status = 200, description = "GraphQL result; domain failures are reported in `errors`", body = GraphqlResponseBody)
    )
)]
pub async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let current_user = state
        .services
        .auth
        .resolve_current_user(bearer_token(&headers))
        .await;

    state
        .schema
        .execute(request.into_inner().data(CurrentUser(current_user)))
        .await
        .into()
}

#[utoipa::path(
    get,
    path = "/graphql",
    responses((status = 200, description = "GraphiQL explorer", content_type = "text/html"))
)]
pub async fn graphiql_handler() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
