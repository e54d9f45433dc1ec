//! Domain failures as client-facing GraphQL errors.

use crate::domain::StorefrontError;
use async_graphql::{Error, ErrorExtensions, Value};
use serde_json::Value as JsonValue;

/// Placeholder for secrets echoed back in `invalidArgs`.
pub const REDACTED: &str = "<redacted>";

/// Builds an error whose extensions carry `code` and the offending `invalidArgs`.
pub fn to_gql_error(err: StorefrontError, invalid_args: JsonValue) -> Error {
    let code = err.code();
    let args = Value::from_json(invalid_args).unwrap_or(Value::Null);
    Error::new(err.to_string()).extend_with(|_, ext| {
        ext.set("code", code.to_string());
        ext.set("invalidArgs", args);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extensions_carry_code_and_args() {
        let err = to_gql_error(
            StorefrontError::validation("Quantity can only be incremented by a positive integer"),
            json!({ "name": "Mug", "quantity": 0 }),
        );
        assert_eq!(
            err.message,
            "Quantity can only be incremented by a positive integer"
        );
        let ext = serde_json::to_value(err.extensions.unwrap()).unwrap();
        assert_eq!(ext["code"], "BAD_USER_INPUT");
        assert_eq!(ext["invalidArgs"]["quantity"], 0);
    }
}
