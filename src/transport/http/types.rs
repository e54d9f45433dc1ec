use crate::app::Services;
use crate::infra::config::GraphqlLimits;
use crate::transport::graphql::{build_schema, StorefrontSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
    pub schema: StorefrontSchema,
}

impl AppState {
    pub fn new(services: Arc<Services>, limits: GraphqlLimits) -> Self {
        let schema = build_schema(services.clone(), limits);
        Self { services, schema }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Standard GraphQL-over-HTTP request body.
#[derive(Deserialize, Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequestBody {
    pub query: String,
    #[serde(default)]
    pub operation_name: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub variables: Option<JsonValue>,
}

/// Standard GraphQL response body. `errors[].extensions` carries `code` and `invalidArgs`.
#[derive(Serialize, Debug, ToSchema)]
pub struct GraphqlResponseBody {
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[schema(value_type = Vec<Object>)]
    pub errors: Option<Vec<JsonValue>>,
}
